//! Golomb-Rice coding for small non-negative integer columns
//!
//! Stream: `[count:32]{unary quotient, '0', 3-bit remainder}*count`

use super::bitstream::{BitReader, BitWriter};
use super::Codec;
use crate::config::{GOLOMB_RICE_M, GOLOMB_RICE_REMAINDER_BITS, UNARY_QUOTIENT_CAP};
use crate::types;
use crate::{CodecError, Result};

/// Golomb-Rice codec with M = 8 (GOLOMB_RICE)
#[derive(Debug, Clone, Copy, Default)]
pub struct GolombRiceCodec;

impl GolombRiceCodec {
    /// Largest value the capped unary quotient can represent
    pub const MAX_VALUE: i64 = (UNARY_QUOTIENT_CAP as i64 + 1) * GOLOMB_RICE_M as i64 - 1;

    /// Encode a slice of values
    pub fn encode_values(values: &[i64]) -> Result<Vec<u8>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let count = u32::try_from(values.len()).map_err(|_| {
            CodecError::UnsupportedValue(format!("{} values exceed the 32-bit count", values.len()))
        })?;

        let mut writer = BitWriter::with_capacity(4 + values.len());
        writer.write_bits(count as u64, 32);

        for &value in values {
            if !(0..=Self::MAX_VALUE).contains(&value) {
                return Err(CodecError::UnsupportedValue(format!(
                    "{} is outside the Golomb-Rice range 0..={}",
                    value,
                    Self::MAX_VALUE
                )));
            }
            let value = value as u64;
            writer.write_unary((value / GOLOMB_RICE_M) as u32);
            writer.write_bits(value % GOLOMB_RICE_M, GOLOMB_RICE_REMAINDER_BITS);
        }
        Ok(writer.finish())
    }

    /// Decode into values
    pub fn decode_values(data: &[u8]) -> Result<Vec<i64>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = BitReader::new(data);
        let count = reader.read_bits(32)? as usize;

        // Each value takes at least four bits.
        let mut values = Vec::with_capacity(count.min(data.len() * 2));
        for _ in 0..count {
            let quotient = reader.read_unary(UNARY_QUOTIENT_CAP)? as u64;
            let remainder = reader.read_bits(GOLOMB_RICE_REMAINDER_BITS)?;
            values.push((quotient * GOLOMB_RICE_M + remainder) as i64);
        }
        Ok(values)
    }
}

impl Codec for GolombRiceCodec {
    fn name(&self) -> &str {
        "GOLOMB_RICE"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Self::encode_values(&types::timestamps_from_bytes(input)?)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::timestamps_to_bytes(&Self::decode_values(encoded)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_layout() {
        // 0 -> 0 000, 9 -> 10 001, 19 -> 110 011
        let encoded = GolombRiceCodec::encode_values(&[0, 9, 19]).unwrap();
        assert_eq!(
            encoded,
            vec![0, 0, 0, 3, 0b0000_1000, 0b1110_0110]
        );
        assert_eq!(GolombRiceCodec::decode_values(&encoded).unwrap(), vec![0, 9, 19]);
    }

    #[test]
    fn test_roundtrip_through_codec() {
        let values: Vec<i64> = (0..500).map(|i| (i * 37) % 300).collect();
        let input = types::timestamps_to_bytes(&values);
        let codec = GolombRiceCodec;
        let encoded = codec.encode(&input).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_quotient_cap_boundary() {
        let max = GolombRiceCodec::MAX_VALUE;
        assert_eq!(max, 2047);

        let encoded = GolombRiceCodec::encode_values(&[max, 0]).unwrap();
        assert_eq!(GolombRiceCodec::decode_values(&encoded).unwrap(), vec![max, 0]);

        assert!(matches!(
            GolombRiceCodec::encode_values(&[max + 1]),
            Err(CodecError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_negative_rejected() {
        let input = types::timestamps_to_bytes(&[3, -1]);
        assert!(matches!(
            GolombRiceCodec.encode(&input),
            Err(CodecError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_empty_and_truncated() {
        assert!(GolombRiceCodec.encode(&[]).unwrap().is_empty());
        assert!(GolombRiceCodec.decode(&[]).unwrap().is_empty());

        // Claims two values but holds one
        let data = [0, 0, 0, 2, 0b0000_1000];
        assert!(matches!(
            GolombRiceCodec::decode_values(&data),
            Err(CodecError::TruncatedStream(_))
        ));
    }
}
