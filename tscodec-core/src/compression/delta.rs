//! Delta encoding for timestamp columns
//!
//! Stream: `[first:8B][varint(v1 - v0)][varint(v2 - v1)]...`

use super::{varint, Codec};
use crate::types;
use crate::Result;
use bytes::BufMut;

/// First value raw, then zigzag varint differences
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaCodec;

impl DeltaCodec {
    /// Encode a slice of values
    pub fn encode_values(values: &[i64]) -> Vec<u8> {
        let Some((&first, rest)) = values.split_first() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(8 + rest.len());
        out.put_i64(first);

        let mut prev = first;
        for &curr in rest {
            varint::encode_into(curr.wrapping_sub(prev), &mut out);
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
        while offset < data.len() {
            let (delta, used) = varint::decode(data, offset)?;
            prev = prev.wrapping_add(delta);
            values.push(prev);
            offset += used;
        }
        Ok(values)
    }
}

impl Codec for DeltaCodec {
    fn name(&self) -> &str {
        "DELTA_VARINT"
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
    fn test_delta_layout() {
        let encoded = DeltaCodec::encode_values(&[100, 110, 105]);
        let mut expected = 100i64.to_be_bytes().to_vec();
        expected.extend(varint::encode(10));
        expected.extend(varint::encode(-5));
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_delta_roundtrip() {
        let values = vec![1697040000000, 1697040000010, 1697040000007, 0, i64::MAX, i64::MIN];
        let codec = DeltaCodec;
        let input = types::timestamps_to_bytes(&values);
        let encoded = codec.encode(&input).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_constant_column_has_zero_deltas() {
        let encoded = DeltaCodec::encode_values(&[42; 10]);
        assert_eq!(encoded.len(), 8 + 9);
        assert!(encoded[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_and_single() {
        let codec = DeltaCodec;
        assert!(codec.encode(&[]).unwrap().is_empty());
        assert!(codec.decode(&[]).unwrap().is_empty());

        let input = types::timestamps_to_bytes(&[-7]);
        let encoded = codec.encode(&input).unwrap();
        assert_eq!(encoded, input);
        assert_eq!(codec.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn test_truncated_first_value() {
        assert!(matches!(
            DeltaCodec.decode(&[1, 2, 3]),
            Err(CodecError::TruncatedStream(_))
        ));
        assert!(matches!(
            DeltaCodec.encode(&[0u8; 9]),
            Err(CodecError::MalformedInput { len: 9, width: 8 })
        ));
    }
}
