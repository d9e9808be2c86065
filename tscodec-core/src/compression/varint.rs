//! Zigzag mapping and little-endian base-128 varints

use crate::{CodecError, Result};

/// Longest canonical encoding of a 64-bit value
pub const MAX_VARINT_LEN: usize = 10;

/// Map a signed value onto the unsigned range, interleaving signs
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    // `>>` on i64 is arithmetic, which spreads the sign bit.
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`]
#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Append the varint encoding of `value` to `out`
pub fn encode_into(value: i64, out: &mut Vec<u8>) {
    let mut v = zigzag_encode(value);
    while v >= 0x80 {
        out.push((v as u8 & 0x7F) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Encode a single value
pub fn encode(value: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    encode_into(value, &mut out);
    out
}

/// Decode a value starting at `offset`, returning it with the number of
/// bytes consumed
pub fn decode(data: &[u8], offset: usize) -> Result<(i64, usize)> {
    let mut result = 0u64;
    let mut consumed = 0usize;

    loop {
        let byte = *data
            .get(offset + consumed)
            .ok_or_else(|| CodecError::truncated("varint"))?;
        let payload = (byte & 0x7F) as u64;
        let shift = 7 * consumed as u32;

        if consumed == MAX_VARINT_LEN - 1 && payload > 1 {
            return Err(CodecError::InvalidFormat(
                "varint overflows 64 bits".into(),
            ));
        }

        result |= payload << shift;
        consumed += 1;

        if byte & 0x80 == 0 {
            return Ok((zigzag_decode(result), consumed));
        }
        if consumed == MAX_VARINT_LEN {
            return Err(CodecError::InvalidFormat(
                "varint longer than 10 bytes".into(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);

        for v in [0, 1, -1, 63, -64, 1 << 40, i64::MIN, i64::MAX] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(10), vec![0x14]);
        assert_eq!(encode(-1), vec![0x01]);
        assert_eq!(encode(64), vec![0x80, 0x01]);
        assert_eq!(encode(i64::MIN).len(), MAX_VARINT_LEN);
        assert_eq!(
            encode(i64::MIN),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_decode_at_offset() {
        let mut buf = vec![0xAA];
        encode_into(-300, &mut buf);
        encode_into(7, &mut buf);

        let (first, used) = decode(&buf, 1).unwrap();
        assert_eq!(first, -300);
        assert_eq!(used, 2);
        assert_eq!(decode(&buf, 1 + used).unwrap(), (7, 1));
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode(&[0x80, 0x80], 0),
            Err(CodecError::TruncatedStream(_))
        ));
        assert!(matches!(decode(&[], 0), Err(CodecError::TruncatedStream(_))));
    }

    #[test]
    fn test_decode_overlong_rejected() {
        let overlong = [0xFF; 11];
        assert!(matches!(
            decode(&overlong, 0),
            Err(CodecError::InvalidFormat(_))
        ));
        let overflow = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        assert!(matches!(
            decode(&overflow, 0),
            Err(CodecError::InvalidFormat(_))
        ));
    }
}
