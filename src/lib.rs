//! # vimeo-embed-dl
//!
//! External downloader helper for embedded Vimeo videos. A parent
//! content-archiving process (such as `patreon-dl`) invokes the binary once
//! per discovered embed, handing over the raw embed markup and/or the embed
//! URL; this crate resolves the canonical player URL and drives `yt-dlp` to
//! perform the actual fetch, retrying once with the embed URL when the
//! resolved URL fails to download.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vimeo_embed_dl::{Config, Downloader, resolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         output_template: "/downloads/%(title)s.%(ext)s".to_string(),
//!         embed_html: Some(
//!             r#"<iframe src="https://player.vimeo.com/video/123456789"></iframe>"#.to_string(),
//!         ),
//!         embed_url: Some("https://vimeo.com/123456789".to_string()),
//!         video_password: None,
//!         downloader_path: None,
//!         downloader_args: Vec::new(),
//!     };
//!
//!     let resolved = resolver::resolve(config.embed_html.as_deref(), config.embed_url.as_deref())
//!         .ok_or("no usable video URL")?;
//!
//!     let outcome = Downloader::new(&config)?
//!         .download_with_fallback(&resolved.url)
//!         .await?;
//!     std::process::exit(outcome.exit_code);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Command-line surface and startup configuration
pub mod cli;
/// Download orchestration with single-fallback retry
pub mod downloader;
/// Error types
pub mod error;
/// Player URL resolution from embed markup
pub mod resolver;

// Re-export commonly used types
pub use cli::{Cli, Config};
pub use downloader::{DownloadOutcome, Downloader};
pub use error::{Error, Result};
pub use resolver::{Provenance, ResolvedUrl, resolve};
