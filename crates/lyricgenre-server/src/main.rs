//! Lyricgenre Server
//!
//! Web front end that classifies pasted song lyrics into a musical genre.

use clap::Parser;
use lyricgenre_server::cli::Cli;
use lyricgenre_server::config::ServerConfig;
use lyricgenre_server::server::run_server;
use lyricgenre_server::telemetry::{init_metrics, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Model source: {}", config.model.source);
    info!("Image directory: {}", config.static_dir);

    let metrics_handle = init_metrics()?;

    run_server(config, Some(metrics_handle)).await
}
