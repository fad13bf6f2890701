//! # Rift Open
//!
//! Command-line front end for the Rift duplex encoder: encodes one file,
//! prints a summary line and a hex preview, and can dump the full output or
//! the index statistics.

pub mod config;
pub mod output;

pub use config::RiftConfig;

use anyhow::Context;
use rift_core::{try_transform_file, Polarity, TransformReport};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// What to do besides printing the summary
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Write the complete encoded stream here
    pub output: Option<PathBuf>,
    /// Print index statistics as JSON
    pub stats: bool,
}

/// Map a polarity argument: anything starting with `A` is polarity A,
/// everything else polarity B. The index tags `+` and `-` are accepted too.
pub fn parse_polarity(arg: &str) -> Polarity {
    match arg.bytes().next() {
        Some(b'A') => Polarity::Positive,
        Some(tag) => Polarity::from_byte(tag).unwrap_or(Polarity::Negative),
        None => Polarity::Negative,
    }
}

/// Encode `file` and write the report to `out`.
///
/// An unavailable input is reported as zero bytes encoded, not as an error.
pub fn run<W: Write>(
    file: &Path,
    polarity: Polarity,
    config: &RiftConfig,
    options: &RunOptions,
    out: &mut W,
) -> anyhow::Result<Option<TransformReport>> {
    let report = match try_transform_file(file, &config.pipeline(), polarity) {
        Ok(report) => Some(report),
        Err(e) if e.is_unavailable() => {
            warn!(error = %e, "input unavailable");
            None
        }
        Err(e) => return Err(e).context("transform failed"),
    };

    let encoded: &[u8] = report.as_ref().map_or(&[][..], |r| r.output.as_slice());
    writeln!(out, "{}", output::summary_line(encoded.len(), polarity))?;
    writeln!(out, "{}", output::hex_preview(encoded, config.preview_bytes))?;

    if let Some(path) = &options.output {
        std::fs::write(path, encoded)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if options.stats {
        if let Some(report) = &report {
            writeln!(out, "{}", serde_json::to_string_pretty(&report.index.stats())?)?;
        }
    }

    Ok(report)
}
