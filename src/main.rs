mod allocator;
mod app;
mod cli;
mod config;
mod consts;
mod error;
mod export;
mod model;
mod output;
mod results;
mod runs;
mod session;
mod upload;
mod utils;

use std::io;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let config = Config::load();
    let cli = Cli::parse().with_config(&config);
    init_tracing(cli.debug);

    if let Some(path) = &config.path {
        debug!("Loaded config from {}", path.display());
    }

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
