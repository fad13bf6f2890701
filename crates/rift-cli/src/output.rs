//! Terminal output

use rift_core::Polarity;

/// `Encoded N bytes (polarity A)`
pub fn summary_line(produced: usize, polarity: Polarity) -> String {
    format!("Encoded {} bytes (polarity {})", produced, polarity.letter())
}

/// Upper-case hex of the first `limit` bytes, space separated
pub fn hex_preview(bytes: &[u8], limit: usize) -> String {
    bytes
        .iter()
        .take(limit)
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
