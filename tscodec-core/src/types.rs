//! Column types and conversions between typed slices and column buffers
//!
//! A column is a flat byte buffer of fixed-width values without padding.
//! Elements are stored big-endian.

use crate::{CodecError, Result};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch
pub type Timestamp = i64;

/// Element type carried by a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Signed 64-bit integer (timestamps)
    Int64,
    /// IEEE-754 single precision float (sensor readings)
    Float32,
}

impl ElementType {
    /// Width of one element in bytes
    pub const fn width(self) -> usize {
        match self {
            ElementType::Int64 => 8,
            ElementType::Float32 => 4,
        }
    }

    /// Number of elements in a buffer, rejecting lengths that are not a
    /// multiple of the element width
    pub fn element_count(self, data: &[u8]) -> Result<usize> {
        let width = self.width();
        if data.len() % width != 0 {
            return Err(CodecError::MalformedInput {
                len: data.len(),
                width,
            });
        }
        Ok(data.len() / width)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Int64 => write!(f, "int64"),
            ElementType::Float32 => write!(f, "float32"),
        }
    }
}

/// Serialize timestamps into a column buffer
pub fn timestamps_to_bytes(values: &[i64]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 8);
    for &v in values {
        buf.put_i64(v);
    }
    buf
}

/// Parse a column buffer of 64-bit integers
pub fn timestamps_from_bytes(data: &[u8]) -> Result<Vec<i64>> {
    let count = ElementType::Int64.element_count(data)?;
    let mut buf = data;
    Ok((0..count).map(|_| buf.get_i64()).collect())
}

/// Serialize float readings into a column buffer
pub fn floats_to_bytes(values: &[f32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(values.len() * 4);
    for &v in values {
        buf.put_f32(v);
    }
    buf
}

/// Parse a column buffer of 32-bit floats
pub fn floats_from_bytes(data: &[u8]) -> Result<Vec<f32>> {
    Ok(float_bits_from_bytes(data)?
        .into_iter()
        .map(f32::from_bits)
        .collect())
}

/// Serialize raw float bit patterns into a column buffer
pub fn float_bits_to_bytes(bits: &[u32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(bits.len() * 4);
    for &b in bits {
        buf.put_u32(b);
    }
    buf
}

/// Parse a float column as raw bit patterns, preserving NaN payloads
pub fn float_bits_from_bytes(data: &[u8]) -> Result<Vec<u32>> {
    let count = ElementType::Float32.element_count(data)?;
    let mut buf = data;
    Ok((0..count).map(|_| buf.get_u32()).collect())
}

/// Checked big-endian reads over a byte cursor
pub(crate) fn take_u32(buf: &mut &[u8], what: &str) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(CodecError::truncated(what));
    }
    Ok(buf.get_u32())
}

pub(crate) fn take_i64(buf: &mut &[u8], what: &str) -> Result<i64> {
    if buf.remaining() < 8 {
        return Err(CodecError::truncated(what));
    }
    Ok(buf.get_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_column_roundtrip() {
        let values = vec![1697040000000, -1, 0, i64::MAX, i64::MIN];
        let bytes = timestamps_to_bytes(&values);
        assert_eq!(bytes.len(), 40);
        assert_eq!(&bytes[..8], &1697040000000i64.to_be_bytes());
        assert_eq!(timestamps_from_bytes(&bytes).unwrap(), values);
    }

    #[test]
    fn test_float_column_keeps_bit_patterns() {
        let bits = vec![0x41C0_0000, 0x7FC0_0001, 0x8000_0000];
        let bytes = float_bits_to_bytes(&bits);
        assert_eq!(float_bits_from_bytes(&bytes).unwrap(), bits);

        let floats = floats_from_bytes(&floats_to_bytes(&[24.0, 24.25])).unwrap();
        assert_eq!(floats, vec![24.0, 24.25]);
    }

    #[test]
    fn test_non_multiple_length_rejected() {
        assert_eq!(
            timestamps_from_bytes(&[0u8; 12]),
            Err(CodecError::MalformedInput { len: 12, width: 8 })
        );
        assert_eq!(
            float_bits_from_bytes(&[0u8; 5]),
            Err(CodecError::MalformedInput { len: 5, width: 4 })
        );
        assert_eq!(timestamps_from_bytes(&[]).unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn test_take_reports_truncation() {
        let data = [0u8, 0, 1];
        let mut cursor = &data[..];
        assert!(matches!(
            take_u32(&mut cursor, "count"),
            Err(CodecError::TruncatedStream(_))
        ));
    }
}
