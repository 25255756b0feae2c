//! Command-line surface and startup configuration
//!
//! The binary is meant to be wired into a `patreon-dl` config file as an
//! embed downloader:
//!
//! ```text
//! [embed.downloader.vimeo]
//! exec = vimeo-embed-dl -o "{dest.dir}/%(title)s.%(ext)s" --embed-html "{embed.html}" --embed-url "{embed.url}"
//! ```
//!
//! Everything after a literal `--` is forwarded verbatim to the downloader,
//! e.g. `-- --cookies-from-browser firefox`.

use clap::Parser;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Resolve the player URL of an embedded Vimeo video and download it with yt-dlp
#[derive(Debug, Parser)]
#[command(name = "vimeo-embed-dl", version)]
pub struct Cli {
    /// Output path template forwarded to the downloader
    #[arg(short = 'o', value_name = "PATH")]
    pub output: Option<String>,

    /// Raw embed markup to extract the player URL from
    #[arg(long = "embed-html", value_name = "MARKUP")]
    pub embed_html: Option<String>,

    /// Fallback URL used when the markup yields nothing or the download fails
    #[arg(long = "embed-url", value_name = "URL")]
    pub embed_url: Option<String>,

    /// Password for protected videos, forwarded to the downloader
    #[arg(long = "video-password", value_name = "SECRET")]
    pub video_password: Option<String>,

    /// Path to the yt-dlp executable if it is not in PATH
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub ytdlp_path: Option<String>,

    /// Arguments after `--`, forwarded verbatim to the downloader
    #[arg(last = true, value_name = "ARGS")]
    pub downloader_args: Vec<String>,
}

/// Validated startup configuration
///
/// Built exactly once from the parsed command line and then passed by value
/// into the resolver and the download orchestrator. There is no other
/// process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolutized output path template for the downloader's `-o` option
    pub output_template: String,

    /// Raw embed markup, if supplied and non-blank
    pub embed_html: Option<String>,

    /// Fallback embed URL, if supplied and non-blank
    pub embed_url: Option<String>,

    /// Video password to forward to the downloader
    pub video_password: Option<String>,

    /// Explicit downloader path (PATH discovery is used when absent)
    pub downloader_path: Option<PathBuf>,

    /// Opaque tokens forwarded verbatim to the downloader
    pub downloader_args: Vec<String>,
}

impl Config {
    /// Validate parsed arguments and build the startup configuration
    ///
    /// Blank values are treated as absent. The output template and any
    /// explicit downloader path are absolutized against the current
    /// directory, since the parent process may invoke this tool from an
    /// arbitrary working directory.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let output = cli
            .output
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Input("no output file specified".to_string()))?;
        let output_template = std::path::absolute(output)?
            .to_string_lossy()
            .into_owned();

        let embed_html = non_blank(cli.embed_html);
        let embed_url = non_blank(cli.embed_url);
        if embed_html.is_none() && embed_url.is_none() {
            return Err(Error::Input("no embed HTML or URL provided".to_string()));
        }

        let downloader_path = match non_blank(cli.ytdlp_path) {
            Some(path) => Some(std::path::absolute(path)?),
            None => None,
        };

        Ok(Self {
            output_template,
            embed_html,
            embed_url,
            video_password: cli.video_password,
            downloader_path,
            downloader_args: cli.downloader_args,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
