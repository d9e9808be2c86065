//! Dictionary encoding for low-cardinality 64-bit columns
//!
//! Format (big-endian):
//! - 4 bytes: dictionary size
//! - per entry: 8 bytes value, 4 bytes id
//! - 4 bytes: element count
//! - per element: 4 bytes id
//!
//! Ids are assigned in first-occurrence order and entries are written in
//! ascending id order.

use super::Codec;
use crate::types::{self, take_i64, take_u32};
use crate::{CodecError, Result};
use bytes::BufMut;
use std::collections::HashMap;

/// Dictionary codec (DICTIONARY)
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryCodec;

impl DictionaryCodec {
    /// Encode a slice of values
    pub fn encode_values(values: &[i64]) -> Result<Vec<u8>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let count = u32::try_from(values.len()).map_err(|_| {
            CodecError::UnsupportedValue(format!("{} values exceed the 32-bit count", values.len()))
        })?;

        let mut ids: HashMap<i64, u32> = HashMap::new();
        let mut entries = Vec::new();
        let mut indices = Vec::with_capacity(values.len());

        for &v in values {
            let id = *ids.entry(v).or_insert_with(|| {
                entries.push(v);
                (entries.len() - 1) as u32
            });
            indices.push(id);
        }

        let mut buf = Vec::with_capacity(8 + entries.len() * 12 + indices.len() * 4);
        buf.put_u32(entries.len() as u32);
        for (id, &value) in entries.iter().enumerate() {
            buf.put_i64(value);
            buf.put_u32(id as u32);
        }
        buf.put_u32(count);
        for id in indices {
            buf.put_u32(id);
        }
        Ok(buf)
    }

    /// Decode into values
    pub fn decode_values(data: &[u8]) -> Result<Vec<i64>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut cursor = data;
        let size = take_u32(&mut cursor, "dictionary size")? as usize;
        if size.saturating_mul(12) > cursor.len() {
            return Err(CodecError::truncated("dictionary entries"));
        }

        let mut dictionary: Vec<Option<i64>> = vec![None; size];
        for _ in 0..size {
            let value = take_i64(&mut cursor, "dictionary value")?;
            let id = take_u32(&mut cursor, "dictionary id")? as usize;
            match dictionary.get_mut(id) {
                Some(slot) if slot.is_none() => *slot = Some(value),
                _ => {
                    return Err(CodecError::InvalidFormat(format!(
                        "dictionary id {} is duplicated or out of range",
                        id
                    )))
                }
            }
        }

        let count = take_u32(&mut cursor, "element count")? as usize;
        if count.saturating_mul(4) > cursor.len() {
            return Err(CodecError::truncated("dictionary indices"));
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let id = take_u32(&mut cursor, "dictionary index")? as usize;
            let value = dictionary.get(id).copied().flatten().ok_or_else(|| {
                CodecError::InvalidFormat(format!("index {} not in dictionary of {}", id, size))
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

impl Codec for DictionaryCodec {
    fn name(&self) -> &str {
        "DICTIONARY"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Self::encode_values(&types::timestamps_from_bytes(input)?)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::timestamps_to_bytes(&Self::decode_values(encoded)?))
    }
}
