use std::{path::PathBuf, sync::Arc};

use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use crate::{
    load,
    state::{page::PageSizeControl, State},
};

/// User intents, independent of the key or click that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LargerPageSize,
    SmallerPageSize,
    PreviousPage,
    NextPage,
    LoadJsonUrl,
    SelectFile,
    FocusNextFrame,
    FocusPreviousFrame,
    /// A double click or double `Enter` on a visible frame.
    Fullscreen {
        position: usize,
        viewport: (u16, u16),
    },
    ExitFullscreen,
}

/// Restores the view from the address, then starts the initial load, if any.
///
/// A pre-selected file wins over a pre-populated URL.
#[instrument(skip(state))]
pub async fn initialize(state: &Arc<State>) -> Option<JoinHandle<()>> {
    let (file, json_url) = {
        let mut wall = state.wall_mut().await;
        wall.restore_from_address();
        (wall.file().to_owned(), wall.json_url().to_owned())
    };

    if !file.is_empty() {
        Some(spawn_load_from_file(state, file))
    } else if !json_url.is_empty() {
        Some(spawn_load_from_url(state, json_url))
    } else {
        debug!("Nothing to load on startup");
        None
    }
}

/// Applies `action` to the wall. Loads run in the background; their handle is returned.
pub async fn dispatch(state: &Arc<State>, action: Action) -> Option<JoinHandle<()>> {
    debug!(?action, "Dispatch");

    let mut wall = state.wall_mut().await;

    match action {
        Action::LargerPageSize => wall.change_page_size(PageSizeControl::select_next),
        Action::SmallerPageSize => wall.change_page_size(PageSizeControl::select_previous),
        Action::PreviousPage => {
            wall.previous_page();
        }
        Action::NextPage => {
            wall.next_page();
        }
        Action::LoadJsonUrl => {
            let url = wall.json_url().trim().to_owned();
            if !url.is_empty() {
                return Some(spawn_load_from_url(state, url));
            }
        }
        Action::SelectFile => {
            let file = wall.file().trim().to_owned();
            if !file.is_empty() {
                return Some(spawn_load_from_file(state, file));
            }
        }
        Action::FocusNextFrame => wall.focus_next(),
        Action::FocusPreviousFrame => wall.focus_previous(),
        Action::Fullscreen { position, viewport } => {
            if let Err(e) = wall.request_fullscreen(position, viewport) {
                error!("Error attempting to enable full-viewport mode: {e}");
            }
        }
        Action::ExitFullscreen => {
            wall.exit_fullscreen();
        }
    }

    None
}

/// Takes the load ticket now, in request order, rather than when the task first runs.
fn spawn_load_from_url(state: &Arc<State>, url: String) -> JoinHandle<()> {
    let ticket = state.next_ticket();
    tokio::spawn(load::load_from_url(state.clone(), ticket, url))
}

fn spawn_load_from_file(state: &Arc<State>, file: String) -> JoinHandle<()> {
    let ticket = state.next_ticket();
    tokio::spawn(load::load_from_file(state.clone(), ticket, PathBuf::from(file)))
}
