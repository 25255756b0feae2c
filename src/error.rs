//! Error types for vimeo-embed-dl
//!
//! The taxonomy is deliberately small: anything recoverable (such as a
//! malformed Embedly widget URL) is handled where it occurs and logged as a
//! warning rather than surfaced here. Every variant below is fatal to the
//! current run and ends up as a one-line diagnostic on stderr.

use thiserror::Error;

/// Result type alias for vimeo-embed-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vimeo-embed-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Required command-line input is missing or empty
    #[error("{0}")]
    Input(String),

    /// Neither the embed markup nor the fallback URL yielded a usable video URL
    #[error("failed to obtain video URL")]
    Resolution,

    /// The external downloader could not be located or started
    #[error("failed to start downloader: {0}")]
    ProcessStart(String),

    /// I/O error while waiting on the downloader or relaying its output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
