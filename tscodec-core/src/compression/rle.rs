//! Byte-oriented run-length encoding
//!
//! Stream: `{value:8, count:8}*` with counts in `1..=255`.

use super::Codec;
use crate::config::RLE_MAX_RUN;
use crate::{CodecError, Result};

/// Run-length codec (RLE)
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLengthCodec;

impl Codec for RunLengthCodec {
    fn name(&self) -> &str {
        "RLE"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut rest = input;

        while let Some(&value) = rest.first() {
            let run = rest
                .iter()
                .take(RLE_MAX_RUN)
                .take_while(|&&b| b == value)
                .count();
            out.push(value);
            out.push(run as u8);
            rest = &rest[run..];
        }
        Ok(out)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.len() % 2 != 0 {
            return Err(CodecError::TruncatedStream(format!(
                "run-length stream of {} bytes ends mid-pair",
                encoded.len()
            )));
        }

        let mut out = Vec::with_capacity(encoded.len() * 4);
        for pair in encoded.chunks_exact(2) {
            let (value, count) = (pair[0], pair[1]);
            if count == 0 {
                return Err(CodecError::InvalidFormat(format!(
                    "zero-length run of {:#04x}",
                    value
                )));
            }
            out.resize(out.len() + count as usize, value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs() {
        let codec = RunLengthCodec;
        let encoded = codec.encode(&[1, 1, 1, 2, 3, 3]).unwrap();
        assert_eq!(encoded, vec![1, 3, 2, 1, 3, 2]);
        assert_eq!(codec.decode(&encoded).unwrap(), vec![1, 1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_long_run_split() {
        let codec = RunLengthCodec;
        let input = vec![9u8; 600];
        let encoded = codec.encode(&input).unwrap();
        assert_eq!(encoded, vec![9, 255, 9, 255, 9, 90]);
        assert_eq!(codec.decode(&encoded).unwrap(), input);

        let exact = vec![4u8; 255];
        assert_eq!(codec.encode(&exact).unwrap(), vec![4, 255]);
    }

    #[test]
    fn test_empty() {
        let codec = RunLengthCodec;
        assert!(codec.encode(&[]).unwrap().is_empty());
        assert!(codec.decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_streams() {
        let codec = RunLengthCodec;
        assert!(matches!(
            codec.decode(&[1, 2, 3]),
            Err(CodecError::TruncatedStream(_))
        ));
        assert!(matches!(
            codec.decode(&[1, 0]),
            Err(CodecError::InvalidFormat(_))
        ));
    }
}
