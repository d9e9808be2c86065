//! Delta-of-delta encoding for timestamp columns
//!
//! Periodic timestamps have a near-constant spacing, so the second
//! difference is almost always zero and costs a single varint byte.
//!
//! Stream: `[first:8B][varint(delta1)][varint(deltaDelta_i)]...`
//!
//! Columns with fewer than two values are stored raw.

use super::{varint, Codec};
use crate::types;
use crate::Result;
use bytes::BufMut;

/// Delta-of-delta codec (TS_2DIFF)
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaOfDeltaCodec;

impl DeltaOfDeltaCodec {
    /// Encode a slice of values
    pub fn encode_values(values: &[i64]) -> Vec<u8> {
        if values.len() < 2 {
            return types::timestamps_to_bytes(values);
        }

        let mut out = Vec::with_capacity(8 + values.len());
        out.put_i64(values[0]);

        let mut prev = values[1];
        let mut prev_delta = values[1].wrapping_sub(values[0]);
        varint::encode_into(prev_delta, &mut out);

        for &curr in &values[2..] {
            let delta = curr.wrapping_sub(prev);
            varint::encode_into(delta.wrapping_sub(prev_delta), &mut out);
            prev_delta = delta;
            prev = curr;
        }
        out
    }

    /// Decode into values
    pub fn decode_values(data: &[u8]) -> Result<Vec<i64>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut cursor = data;
        let mut prev = types::take_i64(&mut cursor, "first value")?;
        let mut values = vec![prev];

        let mut offset = 8;
        let mut delta = 0i64;
        while offset < data.len() {
            let (residual, used) = varint::decode(data, offset)?;
            // The first residual is the plain delta; accumulating it onto
            // a zero delta handles both cases uniformly.
            delta = delta.wrapping_add(residual);
            prev = prev.wrapping_add(delta);
            values.push(prev);
            offset += used;
        }
        Ok(values)
    }
}

impl Codec for DeltaOfDeltaCodec {
    fn name(&self) -> &str {
        "TS_2DIFF"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let values = types::timestamps_from_bytes(input)?;
        Ok(Self::encode_values(&values))
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::timestamps_to_bytes(&Self::decode_values(encoded)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodecError;

    #[test]
    fn test_periodic_timestamps_layout() {
        let values = [1697040000000, 1697040000010, 1697040000020];
        let encoded = DeltaOfDeltaCodec::encode_values(&values);

        let mut expected = 1697040000000i64.to_be_bytes().to_vec();
        expected.extend(varint::encode(10));
        expected.extend(varint::encode(0));
        assert_eq!(encoded, expected);
        assert_eq!(encoded.len(), 10);

        assert_eq!(DeltaOfDeltaCodec::decode_values(&encoded).unwrap(), values);
    }

    #[test]
    fn test_constant_column_has_zero_residuals() {
        let encoded = DeltaOfDeltaCodec::encode_values(&[5; 6]);
        assert_eq!(&encoded[8..], &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_jittered_roundtrip() {
        let values: Vec<i64> = (0..200)
            .map(|i| {
                let jitter = match (i % 7, i % 11) {
                    (0, 0) => -2,
                    (0, _) => 3,
                    (_, 0) => -5,
                    _ => 0,
                };
                1_000_000 + i * 10 + jitter
            })
            .collect();
        let codec = DeltaOfDeltaCodec;
        let input = types::timestamps_to_bytes(&values);
        let encoded = codec.encode(&input).unwrap();
        assert!(encoded.len() < input.len() / 4);
        assert_eq!(codec.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_extreme_differences_wrap() {
        let values = [i64::MIN, i64::MAX, i64::MIN, 0, -1];
        let encoded = DeltaOfDeltaCodec::encode_values(&values);
        assert_eq!(DeltaOfDeltaCodec::decode_values(&encoded).unwrap(), values);
    }

    #[test]
    fn test_short_columns_stored_raw() {
        assert!(DeltaOfDeltaCodec::encode_values(&[]).is_empty());
        assert_eq!(
            DeltaOfDeltaCodec::encode_values(&[99]),
            99i64.to_be_bytes().to_vec()
        );
        assert_eq!(DeltaOfDeltaCodec::decode_values(&99i64.to_be_bytes()).unwrap(), vec![99]);

        let pair = DeltaOfDeltaCodec::encode_values(&[99, 90]);
        assert_eq!(DeltaOfDeltaCodec::decode_values(&pair).unwrap(), vec![99, 90]);
    }

    #[test]
    fn test_truncated_residual() {
        let mut encoded = DeltaOfDeltaCodec::encode_values(&[0, 1000, 2000]);
        encoded.push(0x80);
        assert!(matches!(
            DeltaOfDeltaCodec::decode_values(&encoded),
            Err(CodecError::TruncatedStream(_))
        ));
    }
}
