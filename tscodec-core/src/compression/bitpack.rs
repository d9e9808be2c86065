//! Minimal-width bit-packing for non-negative integer columns
//!
//! Stream: `[count:32][width:8]{width-bit value}*count`

use super::bitstream::{BitReader, BitWriter};
use super::Codec;
use crate::types;
use crate::{CodecError, Result};

const COUNT_BITS: u32 = 32;
const WIDTH_BITS: u32 = 8;

/// Bits needed for `max`, never less than one
#[inline]
pub fn bit_width(max: u64) -> u32 {
    (u64::BITS - max.leading_zeros()).max(1)
}

/// Pack unsigned values at the width of their maximum
///
/// Always writes the header, even for no values.
pub fn pack(values: &[u64]) -> Result<Vec<u8>> {
    let count = u32::try_from(values.len()).map_err(|_| {
        CodecError::UnsupportedValue(format!("{} values exceed the 32-bit count", values.len()))
    })?;
    let width = bit_width(values.iter().copied().max().unwrap_or(0));

    let mut writer = BitWriter::with_capacity(5 + (values.len() * width as usize + 7) / 8);
    writer.write_bits(count as u64, COUNT_BITS);
    writer.write_bits(width as u64, WIDTH_BITS);
    for &v in values {
        writer.write_bits(v, width);
    }
    Ok(writer.finish())
}

/// Inverse of [`pack`]
pub fn unpack(data: &[u8]) -> Result<Vec<u64>> {
    let mut reader = BitReader::new(data);
    let count = reader.read_bits(COUNT_BITS)? as usize;
    let width = reader.read_bits(WIDTH_BITS)? as u32;

    if !(1..=64).contains(&width) {
        return Err(CodecError::InvalidFormat(format!(
            "bit-packing width {}",
            width
        )));
    }
    if count.saturating_mul(width as usize) > reader.remaining_bits() {
        return Err(CodecError::TruncatedStream(format!(
            "{} values of {} bits need more than the {} bits left",
            count,
            width,
            reader.remaining_bits()
        )));
    }

    (0..count).map(|_| reader.read_bits(width)).collect()
}

/// Bit-packing codec for non-negative 64-bit columns (BIT_PACKING)
#[derive(Debug, Clone, Copy, Default)]
pub struct BitPackCodec;

impl BitPackCodec {
    /// Encode a slice of values
    pub fn encode_values(values: &[i64]) -> Result<Vec<u8>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(&negative) = values.iter().find(|&&v| v < 0) {
            return Err(CodecError::UnsupportedValue(format!(
                "bit-packing needs non-negative values, got {}",
                negative
            )));
        }

        let unsigned: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        pack(&unsigned)
    }

    /// Decode into values
    pub fn decode_values(data: &[u8]) -> Result<Vec<i64>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        unpack(data)?
            .into_iter()
            .map(|v| {
                i64::try_from(v).map_err(|_| {
                    CodecError::InvalidFormat(format!("packed value {} exceeds i64", v))
                })
            })
            .collect()
    }
}

impl Codec for BitPackCodec {
    fn name(&self) -> &str {
        "BIT_PACKING"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Self::encode_values(&types::timestamps_from_bytes(input)?)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::timestamps_to_bytes(&Self::decode_values(encoded)?))
    }
}
