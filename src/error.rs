use std::path::PathBuf;

use color_eyre::eyre::Result;
use thiserror::Error;

use crate::ui::Ui;

/// Reasons a load leaves the wall untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to '{url}' failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed video list: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e.to_string())
    }
}

impl From<json_dotpath::Error> for LoadError {
    fn from(e: json_dotpath::Error) -> Self {
        LoadError::Parse(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FullscreenError {
    #[error("full-viewport presentation is disabled")]
    Unsupported,

    #[error("frame {0} is not visible on this page")]
    NoSuchFrame(usize),

    #[error("viewport {width}x{height} is too small for full-viewport presentation")]
    ViewportTooSmall { width: u16, height: u16 },
}

pub(crate) fn color_eyre_install() -> Result<()> {
    // Replace the default `color_eyre::install()?` panic and error hooks.
    // The new hooks release the captured terminal first. This prevents garbled backtrace prints.
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();

    // Replace `eyre_hook.install()?`.
    //
    // Reports are not allowed to release the terminal here: failed loads are logged
    // while the wall keeps running. Reports from the UI loop are propagated
    // only after `Ui::event_loop` has released the terminal.
    let eyre_hook = eyre_hook.into_eyre_hook();
    color_eyre::eyre::set_hook(Box::new(move |e| eyre_hook(e)))?;

    // Replace `panic_hook.install()`.
    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let terminal = Ui::make_terminal().expect("make terminal for panic handler");
        Ui::release_terminal(terminal).expect("release terminal for panic handler");

        panic_hook(panic_info);
    }));

    Ok(())
}
