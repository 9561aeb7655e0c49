use crate::{
    core::inspect::inspect,
    error::Result,
    io::net::fetch_to_file,
    types::Report,
};
use reqwest::blocking::Client;
use std::{io::Write, path::Path};

#[derive(Clone, Debug, PartialEq)]
pub enum DownloadOutcome {
    Fetched { url: String, report: Report },
    Exhausted { attempted: usize },
}

/// Tries `urls` in order and keeps the first body that arrives in full.
///
/// A failing URL is reported and skipped. Running out of URLs is not an
/// error: `dest` is left untouched and [`DownloadOutcome::Exhausted`] is
/// returned. Only a failure to write to `out` surfaces as `Err`; if the
/// fetched file cannot be inspected, the report carries the byte count and
/// no duration.
pub fn download_first<W: Write + ?Sized>(
    client: &Client,
    urls: &[String],
    dest: &Path,
    out: &mut W,
) -> Result<DownloadOutcome> {
    writeln!(out, "📥 Downloading a free notification sound...")?;

    for url in urls {
        match fetch_to_file(client, url, dest) {
            Ok(bytes) => {
                tracing::info!(url = %url, bytes, "download succeeded");
                let report = inspect(dest).unwrap_or_else(|e| {
                    tracing::warn!(path = %dest.display(), error = %e, "could not inspect download");
                    Report {
                        path: dest.to_path_buf(),
                        size_bytes: bytes,
                        duration_secs: None,
                    }
                });
                writeln!(out, "✅ Downloaded from: {url}")?;
                return Ok(DownloadOutcome::Fetched {
                    url: url.clone(),
                    report,
                });
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "download failed");
                writeln!(out, "❌ Failed: {url}")?;
            }
        }
    }

    writeln!(out, "❌ Could not download a sound")?;
    Ok(DownloadOutcome::Exhausted {
        attempted: urls.len(),
    })
}
