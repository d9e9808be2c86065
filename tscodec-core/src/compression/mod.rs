//! Reversible codecs for time-series columns
//!
//! Every codec turns a column buffer into a self-describing encoded buffer
//! and back. Codecs hold no state between calls: bit writers, trees and
//! window histories are created inside each `encode`/`decode` and dropped on
//! return, so one codec value can be shared freely across threads.
//!
//! | Codec | Input | Technique |
//! |-------|-------|-----------|
//! | `DELTA_VARINT` | i64 | first value raw, zigzag varint deltas |
//! | `TS_2DIFF` | i64 | first value raw, varint delta-of-delta |
//! | `GORILLA` | f32 | XOR against the previous value |
//! | `CHIMP` | f32 | XOR with a history of 128 windows |
//! | `BIT_PACKING` | i64 >= 0 | minimal fixed width |
//! | `GOLOMB_RICE` | 0..=2047 | unary quotient, 3-bit remainder |
//! | `DICTIONARY` | i64 | value table plus 32-bit ids |
//! | `HUFFMAN` | bytes | deterministic Huffman tree |
//! | `RLE` | bytes | (value, count) pairs |

mod bitpack;
mod bitstream;
mod chimp;
mod delta;
mod delta_of_delta;
mod dictionary;
mod golomb;
mod huffman;
mod rle;
mod xor;

pub mod varint;

pub use bitpack::{bit_width, pack, unpack, BitPackCodec};
pub use bitstream::{BitReader, BitWriter};
pub use chimp::{WindowHistory, WindowedXorCodec};
pub use delta::DeltaCodec;
pub use delta_of_delta::DeltaOfDeltaCodec;
pub use dictionary::DictionaryCodec;
pub use golomb::GolombRiceCodec;
pub use huffman::{Code, FrequencyTable, HuffmanCodec, HuffmanTree};
pub use rle::RunLengthCodec;
pub use xor::{Window, XorFloatCodec};

use crate::Result;

/// A reversible transform over byte buffers
pub trait Codec: Send + Sync {
    /// Stable identifier used in configuration and reports
    fn name(&self) -> &str;

    /// Encode a column buffer
    fn encode(&self, input: &[u8]) -> Result<Vec<u8>>;

    /// Decode a buffer produced by [`Codec::encode`]
    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>>;
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        (**self).encode(input)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        (**self).decode(encoded)
    }
}

/// Baseline that returns its input unchanged (IDENTITY)
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCodec;

impl Codec for IdentityCodec {
    fn name(&self) -> &str {
        "IDENTITY"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(encoded.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let data = [3u8, 1, 4, 1, 5];
        assert_eq!(IdentityCodec.encode(&data).unwrap(), data);
        assert_eq!(IdentityCodec.decode(&data).unwrap(), data);
    }

    #[test]
    fn test_boxed_codec_delegates() {
        let codec: Box<dyn Codec> = Box::new(RunLengthCodec);
        assert_eq!(codec.name(), "RLE");
        assert_eq!(codec.encode(&[7, 7]).unwrap(), vec![7, 2]);
    }
}
