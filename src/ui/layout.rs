use std::rc::Rc;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen sections, top to bottom.
pub(crate) struct Chunks {
    pub(crate) header: Rect,
    pub(crate) wall: Rect,
    pub(crate) navigation: Rect,
    pub(crate) json_url: Rect,
    pub(crate) file: Rect,
    pub(crate) help: Rect,
}

pub(crate) fn layout_chunks(area: Rect) -> Chunks {
    let chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            // Application title and address bar
            Constraint::Length(2),
            // Frame grid
            Constraint::Min(0),
            // Previous / status / next
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    Chunks {
        header: chunks[0],
        wall: chunks[1],
        navigation: chunks[2],
        json_url: chunks[3],
        file: chunks[4],
        help: chunks[5],
    }
}

/// Previous button, status text, camera selector, next button.
pub(crate) fn navigation_chunks(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(0),
            Constraint::Length(16),
            Constraint::Length(12),
        ])
        .split(area)
}

/// Grid dimensions (columns, rows) that fit `frames` cells, as square as possible.
pub(crate) fn grid_dimensions(frames: usize) -> (usize, usize) {
    if frames == 0 {
        return (0, 0);
    }

    let mut columns = 1;
    while columns * columns < frames {
        columns += 1;
    }

    (columns, frames.div_ceil(columns))
}

/// One cell per frame, filled row by row.
pub(crate) fn grid_cells(area: Rect, frames: usize) -> Vec<Rect> {
    let (columns, rows) = grid_dimensions(frames);
    if frames == 0 {
        return Vec::new();
    }

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area)
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row)
                .to_vec()
        })
        .take(frames)
        .collect()
}
