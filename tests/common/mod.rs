//! Common test utilities for vimeo-embed-dl integration tests

#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// A scripted stand-in for yt-dlp, installed in its own scratch directory.
///
/// The script appends each invocation's arguments to a log file (one line
/// per invocation) and mirrors a marker line to stdout and stderr so relay
/// behavior can be observed. It exits 0 when the final argument (the URL)
/// contains `ok`, and 1 otherwise, which lets tests choose per-URL success.
pub struct FakeDownloader {
    /// Scratch directory keeping the script and log alive for the test
    pub dir: TempDir,
    /// Path to the executable script, for `downloader_path` / `--yt-dlp`
    pub script: PathBuf,
    log: PathBuf,
}

#[cfg(unix)]
impl FakeDownloader {
    pub fn install() -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("create temp dir");
        let log = dir.path().join("calls.log");
        let script = dir.path().join("fake-yt-dlp");
        let body = format!(
            r#"#!/bin/sh
echo "$@" >> "{log}"
echo "fake-downloader stdout"
echo "fake-downloader stderr" >&2
for last in "$@"; do :; done
case "$last" in
  *ok*) exit 0 ;;
  *) exit 1 ;;
esac
"#,
            log = log.display()
        );
        fs::write(&script, body).expect("write fake downloader script");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))
            .expect("mark fake downloader executable");

        Self { dir, script, log }
    }

    /// One line per downloader invocation, in order of arrival.
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }
}
