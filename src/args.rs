use std::path::PathBuf;

use clap::{arg, command, Parser};

pub fn parse() -> Args {
    Args::parse()
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity,

    /// Export traces via OTLP over HTTP (see the `OTEL_EXPORTER_OTLP_*` environment variables)
    #[arg(long)]
    pub otlp_export: bool,

    /// UI refresh interval in milliseconds
    #[arg(short, long, default_value_t = 50)]
    pub tick: u64,

    /// Pre-populated JSON URL, fetched on startup unless `--file` is given
    #[arg(short = 'u', long)]
    pub json_url: Option<String>,

    /// Pre-selected local JSON file, loaded on startup
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Address to restore the view from, e.g. `?page=2&camera=3`
    #[arg(short, long, default_value = "http://localhost/")]
    pub address: String,

    /// Default number of frames per page
    #[arg(short, long, default_value_t = 4)]
    pub camera: usize,

    /// Page sizes offered by the camera selector
    #[arg(long, value_delimiter = ',', default_value = "1,2,4,6,9,12,16")]
    pub camera_options: Vec<usize>,

    /// Never present a frame in full-viewport mode
    #[arg(long)]
    pub no_fullscreen: bool,
}
