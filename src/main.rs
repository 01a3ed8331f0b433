mod config;
mod error;
mod logging;
mod matching;
mod playlist;
mod ports;
mod services;
mod spotify_rs;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config,
    logging::init_tracing,
    playlist::{read_playlist, write_results},
    services::{
        batch::{BatchRunner, ErrorPolicy},
        catalog::{SpotifyCatalog, SpotifyTokenIssuer},
        credentials::ConfigCredentialProvider,
        pacing::{DEFAULT_REQUEST_INTERVAL, IntervalPacer},
    },
    spotify_rs::SpotifyClient,
};

/// Match a text playlist of "Artist - Title" lines against Spotify
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The playlist file, one song per line
    playlist: PathBuf,

    /// The JSON config file holding client credentials and the cached token
    #[arg(short, long, env = "PLAYLIST_MATCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Directory the output files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Minimum delay between search requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_INTERVAL.as_millis() as u64)]
    interval_ms: u64,

    /// Keep going when a song fails instead of aborting the run
    #[arg(long)]
    continue_on_error: bool,

    /// Write whatever was matched before an abort
    #[arg(long)]
    flush_on_abort: bool,

    /// Log filter (default: info)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args.log_level)?;

    log::info!("Reading playlist {}", args.playlist.display());
    let lines = read_playlist(&args.playlist).wrap_err("Failed to read playlist file")?;

    let config_path = args.config.unwrap_or_else(Config::default_path);
    log::info!("Loading config {}", config_path.display());
    let config =
        Config::load_or_create_template(&config_path).wrap_err("Failed to load config")?;

    let http = reqwest::Client::new();
    let catalog = SpotifyCatalog::new(SpotifyClient::new(http.clone(), config.api_base_url()));
    let issuer = SpotifyTokenIssuer::new(http, config.token_url());
    let credentials = ConfigCredentialProvider::new(config_path, config, Arc::new(issuer));

    let policy = if args.continue_on_error {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::Abort
    };
    let runner = BatchRunner::new(
        Arc::new(catalog),
        Arc::new(credentials),
        Box::new(IntervalPacer::new(Duration::from_millis(args.interval_ms))),
        policy,
    );

    log::info!("Matching songs");
    let result = match runner.run(lines.as_slice()).await {
        Ok(result) => result,
        Err(abort) => {
            if args.flush_on_abort {
                log::warn!("Saving results matched before the abort");
                write_results(&args.output_dir, &abort.partial)
                    .wrap_err("Failed to write partial output")?;
            }
            return Err(abort).wrap_err("Playlist matching failed");
        }
    };

    log::info!("Saving output to {}", args.output_dir.display());
    write_results(&args.output_dir, &result).wrap_err("Failed to write output")?;

    let (exact, partial, unmatched) = result.tally();
    log::info!(
        "Done: {} exact, {} partial, {} unmatched, {} failed",
        exact,
        partial,
        unmatched,
        result.failed.len()
    );

    Ok(())
}
