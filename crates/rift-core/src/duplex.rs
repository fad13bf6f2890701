//! 2-to-1 duplex encoding
//!
//! Input is consumed in pairs `(a, b)`. One operand of each pair is
//! conjugated, depending on polarity, and the two are XORed into a single
//! output byte:
//!
//! ```text
//! polarity A (Positive):  out = a ^ conjugate(b)
//! polarity B (Negative):  out = conjugate(a) ^ b
//! ```
//!
//! An odd trailing byte is paired with [`EPSILON_PAD`]. Every output byte is
//! recorded in a [`RiftIndex`] under its 1-based running position.

use crate::index::{Polarity, RiftIndex};
use tracing::trace;

/// Mask applied by [`conjugate`]; only the low nibble is complemented
pub const CONJUGATE_MASK: u8 = 0x0F;

/// Stand-in for the missing second byte of an odd-length input
pub const EPSILON_PAD: u8 = 0x00;

/// Confidence given to freshly encoded entries
pub const FULL_CONFIDENCE: f32 = 1.0;

/// Complement the low nibble, leaving the high nibble as is
#[inline]
pub fn conjugate(x: u8) -> u8 {
    CONJUGATE_MASK ^ x
}

/// Fold one input pair into an output byte
#[inline]
pub fn combine(a: u8, b: u8, polarity: Polarity) -> u8 {
    match polarity {
        Polarity::Positive => a ^ conjugate(b),
        Polarity::Negative => conjugate(a) ^ b,
    }
}

/// Number of output bytes produced for `input_len` input bytes
pub fn encoded_len(input_len: usize) -> usize {
    input_len.div_ceil(2)
}

/// Encoding session.
///
/// Owns the running output position, which carries across calls so that a
/// stream fed in several buffers gets consecutive keys. Independent sessions
/// use independent encoders.
#[derive(Clone, Debug, Default)]
pub struct DuplexEncoder {
    position: u32,
}

impl DuplexEncoder {
    /// Create a session starting at position 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the last emitted byte (0 before any output)
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Restart numbering from 1
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Encode `input` and return the output bytes
    pub fn encode(&mut self, index: &mut RiftIndex, input: &[u8], polarity: Polarity) -> Vec<u8> {
        let mut out = Vec::with_capacity(encoded_len(input.len()));
        self.encode_into(index, input, polarity, &mut out);
        out
    }

    /// Encode `input`, appending to `out`. Returns the number of bytes appended.
    ///
    /// Positions wrap after `u32::MAX`; a repeated key overwrites the older
    /// entry in place.
    pub fn encode_into(
        &mut self,
        index: &mut RiftIndex,
        input: &[u8],
        polarity: Polarity,
        out: &mut Vec<u8>,
    ) -> usize {
        let start = out.len();
        out.reserve(encoded_len(input.len()));
        for pair in input.chunks(2) {
            let a = pair[0];
            let b = pair.get(1).copied().unwrap_or(EPSILON_PAD);
            let byte = combine(a, b, polarity);
            out.push(byte);

            self.position = self.position.wrapping_add(1);
            index.insert(self.position, byte, FULL_CONFIDENCE, polarity);
        }
        let produced = out.len() - start;
        trace!(produced, position = self.position, %polarity, "pairs encoded");
        produced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00, 0x0F)]
    #[case(0x0F, 0x00)]
    #[case(0x42, 0x4D)]
    #[case(0x41, 0x4E)]
    #[case(0xF0, 0xFF)]
    fn test_conjugate_touches_low_nibble_only(#[case] input: u8, #[case] expected: u8) {
        assert_eq!(conjugate(input), expected);
        assert_eq!(conjugate(input) & 0xF0, input & 0xF0);
    }

    #[rstest]
    #[case(0x41, 0x42, Polarity::Positive, 0x0C)]
    #[case(0x41, 0x00, Polarity::Negative, 0x4E)]
    #[case(0x41, 0x00, Polarity::Positive, 0x4E)]
    #[case(0x41, 0x42, Polarity::Negative, 0x0C)]
    #[case(0xFF, 0xFF, Polarity::Positive, 0x0F)]
    fn test_combine(
        #[case] a: u8,
        #[case] b: u8,
        #[case] polarity: Polarity,
        #[case] expected: u8,
    ) {
        assert_eq!(combine(a, b, polarity), expected);
    }

    #[test]
    fn test_encode_pair_polarity_a() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();

        let out = encoder.encode(&mut index, &[0x41, 0x42], Polarity::Positive);
        assert_eq!(out, vec![0x0C]);

        let entry = index.find(1).unwrap();
        assert_eq!(entry.value, 0x0C);
        assert_eq!(entry.confidence, 1.0);
        assert_eq!(entry.polarity, Polarity::Positive);
    }

    #[test]
    fn test_encode_odd_input_polarity_b() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();

        let out = encoder.encode(&mut index, &[0x41], Polarity::Negative);
        assert_eq!(out, vec![0x4E]);
        assert_eq!(index.find(1).unwrap().polarity, Polarity::Negative);
    }

    #[test]
    fn test_encode_empty() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();
        assert!(encoder.encode(&mut index, &[], Polarity::Positive).is_empty());
        assert!(index.is_empty());
        assert_eq!(encoder.position(), 0);
    }

    #[test]
    fn test_position_carries_across_calls() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();

        encoder.encode(&mut index, &[1, 2, 3, 4], Polarity::Positive);
        encoder.encode(&mut index, &[5, 6], Polarity::Negative);

        assert_eq!(encoder.position(), 3);
        assert_eq!(index.len(), 3);
        assert_eq!(index.find(3).unwrap().polarity, Polarity::Negative);
        assert_eq!(index.find(3).unwrap().value, combine(5, 6, Polarity::Negative));
    }

    #[test]
    fn test_reset_rewrites_positions() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();

        encoder.encode(&mut index, &[0x41, 0x42], Polarity::Positive);
        encoder.reset();
        encoder.encode(&mut index, &[0x41], Polarity::Negative);

        assert_eq!(index.len(), 1);
        assert_eq!(index.find(1).unwrap().value, 0x4E);
    }

    #[test]
    fn test_position_wraps() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder { position: u32::MAX - 1 };

        encoder.encode(&mut index, &[1, 2, 3, 4], Polarity::Positive);
        assert_eq!(encoder.position(), 0);
        assert!(index.contains(u32::MAX));
        assert!(index.contains(0));
    }

    #[test]
    fn test_encode_into_appends() {
        let mut index = RiftIndex::new();
        let mut encoder = DuplexEncoder::new();
        let mut out = vec![0xEE];

        let input = [0x41, 0x42, 0x43];
        let n = encoder.encode_into(&mut index, &input, Polarity::Positive, &mut out);
        assert_eq!(n, 2);
        assert_eq!(out, vec![0xEE, 0x0C, 0x43 ^ 0x0F]);
    }

    proptest! {
        #[test]
        fn prop_encode_is_deterministic(
            input in proptest::collection::vec(any::<u8>(), 0..256),
            is_a in any::<bool>(),
        ) {
            let polarity = Polarity::from_is_a(is_a);
            let first = DuplexEncoder::new().encode(&mut RiftIndex::new(), &input, polarity);
            let second = DuplexEncoder::new().encode(&mut RiftIndex::new(), &input, polarity);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), encoded_len(input.len()));
        }

        #[test]
        fn prop_every_output_is_indexed(input in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut index = RiftIndex::new();
            let out = DuplexEncoder::new().encode(&mut index, &input, Polarity::Negative);
            prop_assert_eq!(index.len(), out.len());
            for (i, byte) in out.iter().enumerate() {
                let entry = index.find(i as u32 + 1).unwrap();
                prop_assert_eq!(entry.value, *byte);
                prop_assert_eq!(entry.polarity, Polarity::Negative);
            }
        }
    }
}
