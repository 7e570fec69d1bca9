use std::sync::Arc;

use color_eyre::eyre::Result;
use tracing::{debug, info};

use state::{address::Address, wall::WallConfig, State};
use ui::Ui;

mod args;
mod binder;
mod error;
mod load;
mod state;
mod trace;
mod ui;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    error::color_eyre_install()?;

    let args = args::parse();

    let _appender_guard = trace::init(&args)?;
    debug!(?args, "Parsed arguments");

    let config = WallConfig {
        address: Address::parse(&args.address)?,
        camera: args.camera,
        camera_options: args.camera_options,
        json_url: args.json_url,
        file: args.file.map(|path| path.display().to_string()),
        fullscreen_enabled: !args.no_fullscreen,
    };

    let state = Arc::new(State::new(config));

    binder::initialize(&state).await;

    let mut ui = Ui::new();
    ui.event_loop(state.clone(), args.tick).await?;

    // Reproduces the same view when passed back via `--address`.
    let address = {
        let wall = state.wall().await;
        info!(page = wall.page().current(), "Final address: {}", wall.address());
        wall.address().as_str().to_owned()
    };
    println!("{address}");

    Ok(())
}
