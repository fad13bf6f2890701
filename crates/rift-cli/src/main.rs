//! rift-open - encode a file with the 2-to-1 duplex encoder

use clap::Parser;
use rift_cli::{parse_polarity, run, RiftConfig, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rift-open")]
#[command(about = "2-to-1 duplex encoder with a pruned measurement index")]
#[command(version)]
struct Args {
    /// File to encode
    file: PathBuf,

    /// Polarity: A (default) or B, or the tags + and -
    #[arg(default_value = "A")]
    polarity: String,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, env = "RIFT_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of output bytes
    #[arg(long)]
    capacity: Option<usize>,

    /// Bytes read per chunk (must be even)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Number of output bytes shown as hex
    #[arg(long)]
    preview: Option<usize>,

    /// Write the full encoded stream to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print index statistics as JSON
    #[arg(long)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long, env = "RIFT_DEBUG")]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rift_cli={0},rift_core={0},rift_source={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = RiftConfig::load(args.config.as_deref())?;
    if let Some(capacity) = args.capacity {
        config.output_capacity = capacity;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(preview) = args.preview {
        config.preview_bytes = preview;
    }
    tracing::debug!(?config, "configuration loaded");

    let options = RunOptions {
        output: args.output,
        stats: args.stats,
    };
    let polarity = parse_polarity(&args.polarity);

    run(
        &args.file,
        polarity,
        &config,
        &options,
        &mut std::io::stdout().lock(),
    )?;
    Ok(())
}
