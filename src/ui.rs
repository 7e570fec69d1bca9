use std::{
    borrow::Cow,
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use color_eyre::eyre::{bail, Report, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame as TerminalFrame, Terminal,
};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::{
    binder::{self, Action},
    state::{view::Frame, wall::Wall, Stage, State},
};

mod layout;
mod style;

/// Two activations of the same frame within this window count as one double activation.
const DOUBLE_ACTIVATION_THRESHOLD: Duration = Duration::from_millis(350);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Editing(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    JsonUrl,
    File,
}

impl Field {
    fn submit_action(self) -> Action {
        match self {
            Field::JsonUrl => Action::LoadJsonUrl,
            Field::File => Action::SelectFile,
        }
    }

    fn text_mut(self, wall: &mut Wall) -> &mut String {
        match self {
            Field::JsonUrl => wall.json_url_mut(),
            Field::File => wall.file_mut(),
        }
    }
}

/// What a key press asks for in the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyIntent {
    Quit,
    Dispatch(Action),
    StartEditing(Field),
    StopEditing,
    /// Leave the field and run its action.
    Submit(Action),
    Type(Field, char),
    Backspace(Field),
    ActivateFocused,
    Ignore,
}

fn key_intent(mode: Mode, key: KeyEvent, fullscreen: bool) -> KeyIntent {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyIntent::Quit;
    }

    match mode {
        Mode::Editing(field) => match key.code {
            KeyCode::Char(c) => KeyIntent::Type(field, c),
            KeyCode::Backspace => KeyIntent::Backspace(field),
            KeyCode::Enter => KeyIntent::Submit(field.submit_action()),
            KeyCode::Esc => KeyIntent::StopEditing,
            _ => KeyIntent::Ignore,
        },
        Mode::Normal => match key.code {
            KeyCode::Char('q') => KeyIntent::Quit,
            // Only leaves full-viewport mode; quitting is `q` or Ctrl+C.
            KeyCode::Esc if fullscreen => KeyIntent::Dispatch(Action::ExitFullscreen),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => {
                KeyIntent::Dispatch(Action::PreviousPage)
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => {
                KeyIntent::Dispatch(Action::NextPage)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => KeyIntent::Dispatch(Action::LargerPageSize),
            KeyCode::Char('-') => KeyIntent::Dispatch(Action::SmallerPageSize),
            KeyCode::Char('l') => KeyIntent::Dispatch(Action::LoadJsonUrl),
            KeyCode::Tab => KeyIntent::Dispatch(Action::FocusNextFrame),
            KeyCode::BackTab => KeyIntent::Dispatch(Action::FocusPreviousFrame),
            KeyCode::Char('u') => KeyIntent::StartEditing(Field::JsonUrl),
            KeyCode::Char('o') => KeyIntent::StartEditing(Field::File),
            KeyCode::Enter => KeyIntent::ActivateFocused,
            _ => KeyIntent::Ignore,
        },
    }
}

pub struct Ui {
    mode: Mode,
    /// Frame positions and where they were drawn last, for mouse hit tests.
    frame_areas: Vec<(usize, Rect)>,
    viewport: (u16, u16),
    last_activation: Option<(usize, Instant)>,
}

impl Ui {
    pub fn new() -> Self {
        Ui {
            mode: Mode::Normal,
            frame_areas: Vec::new(),
            viewport: (0, 0),
            last_activation: None,
        }
    }

    pub async fn event_loop(&mut self, state: Arc<State>, tick: u64) -> Result<()> {
        let mut terminal = self.take_terminal()?;

        // Funnel any `Result` returned while the terminal is captured into one place,
        // release the terminal, and only then propagate. Otherwise backtraces print garbled.
        let result_while_captured_terminal = async {
            // Stream input events (Keyboard, Mouse, Resize)
            let mut event_stream = EventStream::new();

            // Prepare render tick interval
            let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(tick));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            self.render(&state, &mut terminal).await?;

            loop {
                tokio::select! {
                    biased;

                    // Handle streamed input events as they occur
                    maybe_event = event_stream.next() => match maybe_event {
                        Some(Ok(event)) => if !self.handle_event(&state, event).await { break },
                        // Event reader poll error, e.g. initialization failure, or interrupt
                        Some(Err(e)) => bail!(e),
                        // End of event stream
                        None => break,
                    },

                    // Render every N milliseconds
                    _ = interval.tick() => self.render(&state, &mut terminal).await?
                }
            }

            Ok::<(), Report>(())
        }
        .await;

        // First release the terminal, then propagate a possible `Err(Report)`.
        Self::release_terminal(terminal)?;

        result_while_captured_terminal?;

        Ok(())
    }

    pub(crate) fn make_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Terminal::new(backend)?)
    }

    fn take_terminal(&self) -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Self::make_terminal()
    }

    pub(crate) fn release_terminal(
        mut terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), io::Error> {
        terminal.show_cursor()?;
        execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    /// Returns `false` when the user asked to quit.
    async fn handle_event(&mut self, state: &Arc<State>, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(state, key).await,

            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some(position) = self.frame_at(column, row) {
                    self.activate(state, position).await;
                }
                true
            }

            // Key releases, other mouse events & resize
            _ => true,
        }
    }

    async fn handle_key(&mut self, state: &Arc<State>, key: KeyEvent) -> bool {
        let fullscreen = state.wall().await.fullscreen().is_some();

        match key_intent(self.mode, key, fullscreen) {
            KeyIntent::Quit => return false,
            KeyIntent::Dispatch(action) => {
                binder::dispatch(state, action).await;
            }
            KeyIntent::StartEditing(field) => self.mode = Mode::Editing(field),
            KeyIntent::StopEditing => self.mode = Mode::Normal,
            KeyIntent::Submit(action) => {
                self.mode = Mode::Normal;
                binder::dispatch(state, action).await;
            }
            KeyIntent::Type(field, c) => field.text_mut(&mut *state.wall_mut().await).push(c),
            KeyIntent::Backspace(field) => {
                field.text_mut(&mut *state.wall_mut().await).pop();
            }
            KeyIntent::ActivateFocused => {
                let focus = state.wall().await.focus();
                if let Some(position) = focus {
                    self.activate(state, position).await;
                }
            }
            KeyIntent::Ignore => {}
        }

        true
    }

    async fn activate(&mut self, state: &Arc<State>, position: usize) {
        if self.is_double_activation(position, Instant::now()) {
            debug!(position, "Double activation");
            binder::dispatch(
                state,
                Action::Fullscreen {
                    position,
                    viewport: self.viewport,
                },
            )
            .await;
        }
    }

    fn is_double_activation(&mut self, position: usize, now: Instant) -> bool {
        let double = matches!(
            self.last_activation,
            Some((last_position, at))
                if last_position == position
                    && now.saturating_duration_since(at) <= DOUBLE_ACTIVATION_THRESHOLD
        );

        // A third activation starts a new pair.
        self.last_activation = if double { None } else { Some((position, now)) };

        double
    }

    fn frame_at(&self, column: u16, row: u16) -> Option<usize> {
        self.frame_areas
            .iter()
            .find(|(_, area)| area.contains(Position::new(column, row)))
            .map(|(position, _)| *position)
    }

    async fn render(
        &mut self,
        state: &State,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        // The terminal's `draw()` method runs a sync closure, so we need to acquire all
        // read guards before we can start rendering.
        let stage = state.stage().await;
        let wall = state.wall().await;

        let app_title = match *stage {
            Stage::Idle => Cow::Borrowed(" VIDEO WALL "),
            Stage::Fetching(ref url) => Cow::Owned(format!(" FETCHING '{url}' ... ")),
            Stage::Reading(ref path) => Cow::Owned(format!(" READING '{path}' ... ")),
            Stage::Loaded(count) => Cow::Owned(format!(" VIDEO WALL - {count} VIDEOS ")),
            Stage::Failed(ref message) => Cow::Owned(format!(" LOAD FAILED: {message} ")),
        };

        let mode = self.mode;
        let mut frame_areas = Vec::with_capacity(wall.view().frames.len());
        let mut viewport = self.viewport;

        terminal.draw(|f| {
            let area = f.area();
            viewport = (area.width, area.height);

            // A fullscreen frame covers everything else.
            if let (Some(position), Some(frame)) = (wall.fullscreen(), wall.fullscreen_frame()) {
                Self::draw_frame(f, frame, area, true, true);
                frame_areas.push((position, area));
                return;
            }

            let chunks = layout::layout_chunks(area);

            // Application title and address bar
            f.render_widget(
                Paragraph::new(Span::styled(
                    wall.address().to_string(),
                    style::address_style(),
                ))
                .block(
                    Block::default()
                        .title(Span::styled(app_title, style::stage_style(&stage)))
                        .title_alignment(Alignment::Center)
                        .borders(Borders::TOP)
                        .border_style(style::border_style())
                        .border_type(BorderType::Thick),
                ),
                chunks.header,
            );

            let view = wall.view();
            if view.frames.is_empty() {
                let hint = if wall.collection().is_empty() {
                    "No videos loaded. Press 'u' to enter a JSON URL or 'o' to pick a file."
                } else {
                    "No videos on this page."
                };
                f.render_widget(
                    Paragraph::new(Span::styled(hint, style::hint_style()))
                        .alignment(Alignment::Center),
                    chunks.wall,
                );
            } else {
                let cells = layout::grid_cells(chunks.wall, view.frames.len());
                for (position, (frame, cell)) in view.frames.iter().zip(cells).enumerate() {
                    Self::draw_frame(f, frame, cell, wall.focus() == Some(position), false);
                    frame_areas.push((position, cell));
                }
            }

            // Navigation
            let navigation = layout::navigation_chunks(chunks.navigation);
            f.render_widget(
                Paragraph::new(Span::styled(
                    "[< Prev]",
                    style::control_style(view.prev_disabled),
                )),
                navigation[0],
            );
            f.render_widget(
                Paragraph::new(view.status.as_str()).alignment(Alignment::Center),
                navigation[1],
            );
            f.render_widget(
                Paragraph::new(format!("Cameras: {}", wall.camera().value())),
                navigation[2],
            );
            f.render_widget(
                Paragraph::new(Span::styled(
                    "[Next >]",
                    style::control_style(view.next_disabled),
                ))
                .alignment(Alignment::Right),
                navigation[3],
            );

            // Input fields
            for (field, label, value, chunk) in [
                (Field::JsonUrl, "JSON URL: ", wall.json_url(), chunks.json_url),
                (Field::File, "File:     ", wall.file(), chunks.file),
            ] {
                let editing = mode == Mode::Editing(field);
                let mut spans = vec![
                    Span::styled(label, style::field_label_style(editing)),
                    Span::raw(value),
                ];
                if editing {
                    spans.push(Span::styled("_", style::field_label_style(true)));
                }
                f.render_widget(Paragraph::new(Line::from(spans)), chunk);
            }

            let help = match mode {
                Mode::Normal => "q quit  esc leave full view  </> page  +/- cameras  u url  l load  o file  tab focus  enter x2 / double-click full view",
                Mode::Editing(_) => "enter submit  esc cancel",
            };
            f.render_widget(
                Paragraph::new(Span::styled(help, style::hint_style())),
                chunks.help,
            );
        })?;

        self.frame_areas = frame_areas;
        self.viewport = viewport;

        Ok(())
    }

    fn draw_frame(f: &mut TerminalFrame, frame: &Frame, area: Rect, focused: bool, fullscreen: bool) {
        let hint = if fullscreen {
            "esc to leave full view"
        } else {
            "double-click for full view"
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", frame.title()),
                style::frame_title_style(),
            ))
            .title_bottom(Span::styled(
                format!(" #{} ", frame.index + 1),
                style::hint_style(),
            ))
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(if focused {
                style::focused_border_style()
            } else {
                style::border_style()
            });

        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(frame.url(), style::frame_url_style())),
                Line::from(Span::styled(hint, style::hint_style())),
            ])
            .wrap(Wrap { trim: true })
            .block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_activation_needs_same_frame_within_threshold() {
        let mut ui = Ui::new();
        let start = Instant::now();

        assert!(!ui.is_double_activation(0, start));
        assert!(ui.is_double_activation(0, start + Duration::from_millis(200)));

        // The pair is consumed; the next activation starts over.
        assert!(!ui.is_double_activation(0, start + Duration::from_millis(300)));

        assert!(!ui.is_double_activation(1, start + Duration::from_millis(400)));
        assert!(!ui.is_double_activation(2, start + Duration::from_millis(450)));
        assert!(!ui.is_double_activation(2, start + Duration::from_millis(1000)));
    }

    #[test]
    fn frame_hit_test() {
        let mut ui = Ui::new();
        ui.frame_areas = vec![(0, Rect::new(0, 0, 10, 5)), (1, Rect::new(10, 0, 10, 5))];

        assert_eq!(ui.frame_at(3, 2), Some(0));
        assert_eq!(ui.frame_at(15, 4), Some(1));
        assert_eq!(ui.frame_at(25, 1), None);
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_in_fields_submits_their_load() {
        assert_eq!(
            key_intent(Mode::Editing(Field::JsonUrl), key(KeyCode::Enter), false),
            KeyIntent::Submit(Action::LoadJsonUrl)
        );
        assert_eq!(
            key_intent(Mode::Editing(Field::File), key(KeyCode::Enter), false),
            KeyIntent::Submit(Action::SelectFile)
        );
    }

    #[test]
    fn editing_captures_text_keys() {
        let mode = Mode::Editing(Field::JsonUrl);
        assert_eq!(
            key_intent(mode, key(KeyCode::Char('q')), false),
            KeyIntent::Type(Field::JsonUrl, 'q')
        );
        assert_eq!(
            key_intent(mode, key(KeyCode::Backspace), false),
            KeyIntent::Backspace(Field::JsonUrl)
        );
        assert_eq!(key_intent(mode, key(KeyCode::Esc), false), KeyIntent::StopEditing);
    }

    #[test]
    fn normal_keys_map_to_actions() {
        for (code, action) in [
            (KeyCode::Char('l'), Action::LoadJsonUrl),
            (KeyCode::Left, Action::PreviousPage),
            (KeyCode::Char('n'), Action::NextPage),
            (KeyCode::Char('+'), Action::LargerPageSize),
            (KeyCode::Char('-'), Action::SmallerPageSize),
            (KeyCode::Tab, Action::FocusNextFrame),
        ] {
            assert_eq!(
                key_intent(Mode::Normal, key(code), false),
                KeyIntent::Dispatch(action),
                "{code:?}"
            );
        }

        assert_eq!(
            key_intent(Mode::Normal, key(KeyCode::Char('u')), false),
            KeyIntent::StartEditing(Field::JsonUrl)
        );
        assert_eq!(
            key_intent(Mode::Normal, key(KeyCode::Enter), false),
            KeyIntent::ActivateFocused
        );
    }

    #[test]
    fn esc_leaves_full_view_and_never_quits() {
        assert_eq!(
            key_intent(Mode::Normal, key(KeyCode::Esc), true),
            KeyIntent::Dispatch(Action::ExitFullscreen)
        );
        assert_eq!(
            key_intent(Mode::Normal, key(KeyCode::Esc), false),
            KeyIntent::Ignore
        );
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            key_intent(Mode::Normal, key(KeyCode::Char('q')), false),
            KeyIntent::Quit
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_intent(Mode::Editing(Field::File), ctrl_c, false),
            KeyIntent::Quit
        );
    }
}
