//! External downloader invocation with single-fallback retry
//!
//! The orchestrator assembles a yt-dlp command line, spawns the downloader,
//! relays its output as it arrives, and reports the exit code. On a failed
//! attempt it retries exactly once with the embed URL, provided that URL has
//! not already been attempted. There is no backoff and no retry budget
//! beyond the one extra attempt; an attempt runs until the downloader exits.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::cli::Config;
use crate::error::{Error, Result};

/// Downloader executable looked up on PATH when `--yt-dlp` is not given
const DEFAULT_DOWNLOADER: &str = "yt-dlp";

/// Referer header injected unless the passthrough arguments carry their own
const DEFAULT_REFERER: &str = "https://patreon.com/";

/// Stand-in for the password value in the echoed command line
const PASSWORD_MASK: &str = "******";

/// Result of one downloader run
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Exit code of the downloader process (0 on success)
    pub exit_code: i32,
    /// The URL this attempt was made with
    pub attempted_url: String,
}

impl DownloadOutcome {
    /// Whether the downloader reported success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Orchestrates downloader invocations for a single embedded video
///
/// Holds everything that stays fixed across attempts; only the URL varies
/// between the primary attempt and the fallback retry.
pub struct Downloader {
    binary: PathBuf,
    output_template: String,
    password: Option<String>,
    passthrough: Vec<String>,
    fallback_url: Option<String>,
}

impl Downloader {
    /// Build an orchestrator from the startup configuration
    ///
    /// An explicit `--yt-dlp` path wins; otherwise the default executable
    /// name is resolved via the system PATH. Failure to locate it is a
    /// startup error; no download is attempted.
    pub fn new(config: &Config) -> Result<Self> {
        let binary = match &config.downloader_path {
            Some(path) => path.clone(),
            None => which::which(DEFAULT_DOWNLOADER)
                .map_err(|e| Error::ProcessStart(format!("{DEFAULT_DOWNLOADER}: {e}")))?,
        };

        Ok(Self {
            binary,
            output_template: config.output_template.clone(),
            password: config.video_password.clone(),
            passthrough: config.downloader_args.clone(),
            fallback_url: config.embed_url.clone(),
        })
    }

    /// Download `primary_url`, retrying once with the embed URL on failure
    ///
    /// The fallback attempt happens only when the primary attempt exits
    /// non-zero and the embed URL differs from the URL just tried, so the
    /// same URL is never attempted twice in one invocation. The returned
    /// outcome is always the last attempt's.
    pub async fn download_with_fallback(&self, primary_url: &str) -> Result<DownloadOutcome> {
        let candidates = candidate_urls(primary_url, self.fallback_url.as_deref());

        let mut outcome = self.attempt(&candidates[0]).await?;
        for fallback in &candidates[1..] {
            if outcome.is_success() {
                break;
            }
            tracing::info!(url = %fallback, "download failed, retrying with embed URL");
            outcome = self.attempt(fallback).await?;
        }
        Ok(outcome)
    }

    /// Run the downloader once against `url` and wait for it to terminate
    ///
    /// Output streams are relayed line-by-line to this process's own stdout
    /// and stderr as they arrive. Both relay tasks are joined before the
    /// outcome is produced, on every exit path, so no listener outlives the
    /// attempt.
    pub async fn attempt(&self, url: &str) -> Result<DownloadOutcome> {
        let (args, echo_args) = self.build_args(url);
        tracing::info!(
            command = %command_string(&self.binary.to_string_lossy(), &echo_args),
            "invoking downloader"
        );

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::ProcessStart(format!("{}: {e}", self.binary.display())))?;

        let stdout_relay = tokio::spawn(relay(child.stdout.take(), false));
        let stderr_relay = tokio::spawn(relay(child.stderr.take(), true));

        let status = child.wait().await;

        // Drain and release both stream readers before inspecting the result.
        let _ = stdout_relay.await;
        let _ = stderr_relay.await;

        let status = status?;
        // A missing code means the process was killed by a signal.
        let exit_code = status.code().unwrap_or(1);
        Ok(DownloadOutcome {
            exit_code,
            attempted_url: url.to_string(),
        })
    }

    /// Assemble the downloader argument list and its loggable twin
    ///
    /// Defaults are injected only when the passthrough arguments do not
    /// already carry the corresponding option, and passthrough tokens are
    /// appended verbatim so callers can override downloader behavior. The
    /// URL is always the final positional argument. The echoed variant
    /// masks the password value.
    fn build_args(&self, url: &str) -> (Vec<String>, Vec<String>) {
        let mut args: Vec<String> = Vec::new();

        if !has_option(&self.passthrough, &["-o", "--output"]) {
            args.push("-o".to_string());
            args.push(self.output_template.clone());
        }
        if !has_option(&self.passthrough, &["--referer"]) {
            args.push("--referer".to_string());
            args.push(DEFAULT_REFERER.to_string());
        }
        args.extend(self.passthrough.iter().cloned());

        let mut echo_args = args.clone();
        if let Some(password) = &self.password
            && !has_option(&self.passthrough, &["--video-password"])
        {
            args.push("--video-password".to_string());
            args.push(password.clone());
            echo_args.push("--video-password".to_string());
            echo_args.push(PASSWORD_MASK.to_string());
        }

        args.push(url.to_string());
        echo_args.push(url.to_string());
        (args, echo_args)
    }
}

/// The ordered URLs to try: the primary, then the fallback if it differs
fn candidate_urls(primary: &str, fallback: Option<&str>) -> Vec<String> {
    let mut candidates = vec![primary.to_string()];
    if let Some(fallback) = fallback
        && fallback != primary
    {
        candidates.push(fallback.to_string());
    }
    candidates
}

/// Check whether any passthrough token spells one of the given options
///
/// Matches bare (`--output`) and assignment (`--output=x`) forms,
/// case-insensitively.
fn has_option(tokens: &[String], names: &[&str]) -> bool {
    tokens.iter().any(|token| {
        let flag = token
            .split_once('=')
            .map_or(token.as_str(), |(name, _)| name);
        names.iter().any(|name| flag.eq_ignore_ascii_case(name))
    })
}

/// Render a command line for logging, quoting arguments that contain spaces
fn command_string(program: &str, args: &[String]) -> String {
    let mut rendered = Vec::with_capacity(args.len() + 1);
    rendered.push(program.to_string());
    for arg in args {
        if arg.contains(' ') {
            rendered.push(format!("\"{arg}\""));
        } else {
            rendered.push(arg.clone());
        }
    }
    rendered.join(" ")
}

/// Forward one child stream to our own stdout or stderr, line by line
async fn relay<R>(pipe: Option<R>, to_stderr: bool)
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else { return };
    let mut lines = BufReader::new(pipe).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}
