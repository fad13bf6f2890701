//! Chunked reading of byte sources
//!
//! Splits an input stream into fixed-size blocks. Every block except the
//! last is exactly `chunk_size` bytes, no matter how short the underlying
//! reads are, so pair boundaries never fall across a chunk edge.

use crate::{Result, SourceError, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, instrument};

/// Configuration for the chunk reader
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Size of each chunk in bytes
    pub chunk_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SourceConfig {
    /// Create with a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        let config = Self { chunk_size };
        config.validate()?;
        Ok(config)
    }

    /// Check that the chunk size is usable.
    ///
    /// Odd sizes are rejected: the encoder pads the last byte of every odd
    /// buffer, so an odd chunk would inject a pad in the middle of the stream.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(SourceError::Configuration(format!(
                "chunk size must be between 1 and {} bytes",
                MAX_CHUNK_SIZE
            )));
        }
        if self.chunk_size % 2 != 0 {
            return Err(SourceError::Configuration(format!(
                "chunk size must be even, got {}",
                self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Iterator over fixed-size chunks of a reader
pub struct ChunkReader<R> {
    reader: R,
    config: SourceConfig,
    chunks_read: usize,
    bytes_read: u64,
    finished: bool,
    /// Byte pulled by [`ChunkReader::has_more`], served first by the next chunk
    peeked: Option<u8>,
}

impl ChunkReader<File> {
    /// Open a file as a chunked source
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(chunk_size = config.chunk_size, "source opened");
        Ok(Self::with_config(file, config))
    }
}

impl<R: Read> ChunkReader<R> {
    /// Wrap a reader with the default configuration
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, SourceConfig::default())
    }

    /// Wrap a reader with a custom configuration
    pub fn with_config(reader: R, config: SourceConfig) -> Self {
        Self {
            reader,
            config,
            chunks_read: 0,
            bytes_read: 0,
            finished: false,
            peeked: None,
        }
    }

    /// Get the chunk size
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Number of chunks yielded so far
    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    /// Number of bytes yielded so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the end of the stream (or a read error) has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether another chunk would be non-empty.
    ///
    /// Reads at most one byte ahead; that byte is not counted until the
    /// chunk holding it is returned.
    pub fn has_more(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(true);
        }
        if self.finished {
            return Ok(false);
        }

        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => {
                    self.finished = true;
                    return Ok(false);
                }
                Ok(_) => {
                    self.peeked = Some(byte[0]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(SourceError::Io(e));
                }
            }
        }
    }

    /// Read the next chunk, or `None` at end of stream.
    ///
    /// Keeps reading until the buffer is full or the reader reports EOF.
    pub fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.finished && self.peeked.is_none() {
            return Ok(None);
        }

        let mut buffer = vec![0u8; self.config.chunk_size];
        let mut filled = 0;
        if let Some(byte) = self.peeked.take() {
            buffer[0] = byte;
            filled = 1;
        }

        while filled < buffer.len() && !self.finished {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => {
                    self.finished = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.finished = true;
                    return Err(SourceError::Io(e));
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        buffer.truncate(filled);
        self.chunks_read += 1;
        self.bytes_read += filled as u64;
        debug!(chunk = self.chunks_read, len = filled, "chunk read");
        Ok(Some(Bytes::from(buffer)))
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
