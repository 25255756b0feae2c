//! Command-line entry point
//!
//! Exit code contract: 1 for missing input or failed URL resolution,
//! otherwise the external downloader's exit code from whichever attempt
//! (primary or fallback) ran last.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vimeo_embed_dl::cli::{Cli, Config};
use vimeo_embed_dl::downloader::Downloader;
use vimeo_embed_dl::error::{Error, Result};
use vimeo_embed_dl::resolver;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            // Every fatal path is a one-line diagnostic, never a backtrace.
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = Config::from_cli(cli)?;

    let resolved = resolver::resolve(config.embed_html.as_deref(), config.embed_url.as_deref())
        .ok_or(Error::Resolution)?;
    tracing::info!(
        url = %resolved.url,
        provenance = ?resolved.provenance,
        "going to download video"
    );

    let downloader = Downloader::new(&config)?;
    let outcome = downloader.download_with_fallback(&resolved.url).await?;
    if !outcome.is_success() {
        tracing::warn!(
            url = %outcome.attempted_url,
            exit_code = outcome.exit_code,
            "downloader reported failure"
        );
    }

    Ok(u8::try_from(outcome.exit_code).unwrap_or(1))
}
