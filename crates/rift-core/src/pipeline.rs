//! Whole-stream transform: byte source -> duplex encoder -> index

use crate::config::PipelineConfig;
use crate::duplex::{encoded_len, DuplexEncoder};
use crate::index::{Polarity, RiftIndex};
use crate::Result;
use rift_source::ChunkReader;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Everything produced by one transform run
#[derive(Debug)]
pub struct TransformReport {
    /// Encoded bytes, never longer than the configured capacity
    pub output: Vec<u8>,
    /// Index holding one entry per output byte
    pub index: RiftIndex,
    /// Chunks pulled from the source
    pub chunks_read: usize,
    /// Bytes pulled from the source
    pub bytes_read: u64,
    /// Input was left unencoded because the output capacity ran out
    pub capacity_reached: bool,
    /// The source failed mid-stream; `output` holds what was produced before
    pub read_failed: bool,
}

impl TransformReport {
    /// Number of output bytes
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Whether nothing was produced
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }
}

/// Encode a whole file, returning the number of bytes produced.
///
/// An unavailable source yields 0 rather than an error; use
/// [`try_transform_file`] to tell it apart from an empty file.
pub fn transform_file(path: impl AsRef<Path>, output_capacity: usize, polarity: Polarity) -> usize {
    let config = PipelineConfig::with_capacity(output_capacity);
    match try_transform_file(path, &config, polarity) {
        Ok(report) => report.len(),
        Err(e) => {
            warn!(error = %e, "transform produced no output");
            0
        }
    }
}

/// Encode a whole file into `out`, returning the number of bytes written.
///
/// The capacity is `out.len()`. As with [`transform_file`], an unavailable
/// source yields 0.
pub fn transform_file_into(path: impl AsRef<Path>, out: &mut [u8], polarity: Polarity) -> usize {
    let config = PipelineConfig::with_capacity(out.len());
    match try_transform_file(path, &config, polarity) {
        Ok(report) => {
            let n = report.len();
            out[..n].copy_from_slice(&report.output);
            n
        }
        Err(e) => {
            warn!(error = %e, "transform produced no output");
            0
        }
    }
}

/// Encode a whole file, reporting why it could not be opened
#[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
pub fn try_transform_file(
    path: impl AsRef<Path>,
    config: &PipelineConfig,
    polarity: Polarity,
) -> Result<TransformReport> {
    config.validate()?;
    let chunks = ChunkReader::open(path, config.source.clone())?;
    run(chunks, config, polarity)
}

/// Encode everything a reader yields
pub fn transform_reader<R: Read>(
    reader: R,
    config: &PipelineConfig,
    polarity: Polarity,
) -> Result<TransformReport> {
    config.validate()?;
    run(
        ChunkReader::with_config(reader, config.source.clone()),
        config,
        polarity,
    )
}

fn run<R: Read>(
    mut chunks: ChunkReader<R>,
    config: &PipelineConfig,
    polarity: Polarity,
) -> Result<TransformReport> {
    let capacity = config.output_capacity;
    let mut index = RiftIndex::with_config(config.index.clone())?;
    let mut encoder = DuplexEncoder::new();
    let mut output = Vec::with_capacity(capacity.min(encoded_len(chunks.chunk_size())));
    let mut read_failed = false;
    let mut capacity_reached = false;

    while output.len() < capacity {
        let chunk = match chunks.next_chunk() {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, produced = output.len(), "source failed, ending stream");
                read_failed = true;
                break;
            }
        };

        // Cut at the last whole pair that still fits.
        let room = capacity - output.len();
        let take = chunk.len().min(room.saturating_mul(2));
        if take < chunk.len() {
            debug!(dropped = chunk.len() - take, "chunk cut at capacity");
            capacity_reached = true;
        }
        encoder.encode_into(&mut index, &chunk[..take], polarity, &mut output);
    }

    // A full output only matters if the source still has bytes left.
    if !capacity_reached && !read_failed && output.len() >= capacity {
        match chunks.has_more() {
            Ok(more) => capacity_reached = more,
            Err(e) => {
                warn!(error = %e, produced = output.len(), "source failed, ending stream");
                read_failed = true;
            }
        }
    }

    if capacity_reached {
        warn!(capacity, "output capacity reached before end of stream");
    }
    info!(
        produced = output.len(),
        chunks = chunks.chunks_read(),
        polarity = %polarity.letter(),
        "transform complete"
    );

    Ok(TransformReport {
        output,
        index,
        chunks_read: chunks.chunks_read(),
        bytes_read: chunks.bytes_read(),
        capacity_reached,
        read_failed,
    })
}
