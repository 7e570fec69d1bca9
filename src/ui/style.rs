use ratatui::style::{Color, Modifier, Style};

use crate::state::Stage;

#[inline]
pub fn application_title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

#[inline]
pub fn address_style() -> Style {
    Style::default().fg(Color::Gray)
}

#[inline]
pub fn border_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

#[inline]
pub fn focused_border_style() -> Style {
    Style::default()
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD)
}

#[inline]
pub fn frame_title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

#[inline]
pub fn frame_url_style() -> Style {
    Style::default().fg(Color::LightCyan)
}

#[inline]
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

#[inline]
pub fn control_style(disabled: bool) -> Style {
    if disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD)
    }
}

#[inline]
pub fn field_label_style(editing: bool) -> Style {
    if editing {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

#[inline]
pub fn stage_style(stage: &Stage) -> Style {
    Style::default()
        .fg(stage_color(stage))
        .add_modifier(Modifier::BOLD)
}

fn stage_color(stage: &Stage) -> Color {
    match stage {
        Stage::Idle => Color::White,
        Stage::Fetching(_) | Stage::Reading(_) => Color::LightYellow,
        Stage::Loaded(_) => Color::LightGreen,
        Stage::Failed(_) => Color::LightRed,
    }
}
