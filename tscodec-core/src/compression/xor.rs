//! Gorilla XOR compression for 32-bit float columns
//!
//! Implements the value half of the scheme from Facebook's paper
//! "Gorilla: A Fast, Scalable, In-Memory Time Series Database", adapted to
//! single precision readings.
//!
//! Stream: `[count:32][first:32]` then for every further value:
//! - `0` when the XOR with the previous value is zero
//! - `10` + significant bits when they fit the remembered window
//! - `11` + 5-bit leading zeros + 6-bit length + significant bits otherwise

use super::bitstream::{BitReader, BitWriter};
use super::Codec;
use crate::types;
use crate::{CodecError, Result};

pub(crate) const VALUE_BITS: u32 = 32;
pub(crate) const LEADING_ZEROS_BITS: u32 = 5;
pub(crate) const SIGNIFICANT_BITS_BITS: u32 = 6;

/// Position of the meaningful bits inside a 32-bit XOR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub leading_zeros: u32,
    pub trailing_zeros: u32,
}

impl Window {
    /// Window that no non-zero XOR fits into
    pub const EMPTY: Window = Window {
        leading_zeros: VALUE_BITS,
        trailing_zeros: VALUE_BITS,
    };

    /// Tightest window around a non-zero XOR
    #[inline]
    pub fn of(xor: u32) -> Self {
        debug_assert!(xor != 0);
        Self {
            leading_zeros: xor.leading_zeros(),
            trailing_zeros: xor.trailing_zeros(),
        }
    }

    /// Number of bits between the leading and trailing zeros
    #[inline]
    pub fn significant_bits(&self) -> u32 {
        VALUE_BITS.saturating_sub(self.leading_zeros + self.trailing_zeros)
    }

    /// Whether `other`'s significant bits lie inside this window
    #[inline]
    pub fn contains(&self, other: &Window) -> bool {
        other.leading_zeros >= self.leading_zeros && other.trailing_zeros >= self.trailing_zeros
    }

    /// Write the significant bits of `xor` as seen through this window
    #[inline]
    pub(crate) fn write_bits(&self, writer: &mut BitWriter, xor: u32) {
        // Logical shift: xor is unsigned.
        writer.write_bits((xor >> self.trailing_zeros) as u64, self.significant_bits());
    }

    /// Read significant bits and move them back into place
    #[inline]
    pub(crate) fn read_xor(&self, reader: &mut BitReader<'_>) -> Result<u32> {
        let bits = reader.read_bits(self.significant_bits())? as u32;
        Ok(bits << self.trailing_zeros)
    }

    /// Write a fresh window header: 5-bit leading zeros, 6-bit length
    pub(crate) fn write_header(&self, writer: &mut BitWriter) {
        writer.write_bits(self.leading_zeros as u64, LEADING_ZEROS_BITS);
        writer.write_bits(self.significant_bits() as u64, SIGNIFICANT_BITS_BITS);
    }

    /// Read a window header written by [`Window::write_header`]
    pub(crate) fn read_header(reader: &mut BitReader<'_>) -> Result<Window> {
        let leading_zeros = reader.read_bits(LEADING_ZEROS_BITS)? as u32;
        let significant = reader.read_bits(SIGNIFICANT_BITS_BITS)? as u32;

        if significant == 0 || leading_zeros + significant > VALUE_BITS {
            return Err(CodecError::InvalidFormat(format!(
                "window of {} leading zeros and {} significant bits",
                leading_zeros, significant
            )));
        }

        Ok(Window {
            leading_zeros,
            trailing_zeros: VALUE_BITS - leading_zeros - significant,
        })
    }
}

/// Write `[count:32][first:32]` for a non-empty column
pub(crate) fn write_stream_header(writer: &mut BitWriter, bits: &[u32]) -> Result<()> {
    let count = u32::try_from(bits.len()).map_err(|_| {
        CodecError::UnsupportedValue(format!("{} values exceed the 32-bit count", bits.len()))
    })?;
    writer.write_bits(count as u64, 32);
    writer.write_bits(bits[0] as u64, VALUE_BITS);
    Ok(())
}

/// Gorilla XOR codec state for one encode or decode call
#[derive(Debug)]
struct XorState {
    prev_bits: u32,
    window: Window,
}

impl XorState {
    fn new(first: u32) -> Self {
        Self {
            prev_bits: first,
            window: Window::EMPTY,
        }
    }

    fn encode_value(&mut self, writer: &mut BitWriter, bits: u32) {
        let xor = self.prev_bits ^ bits;

        if xor == 0 {
            writer.write_bit(false);
        } else {
            writer.write_bit(true);

            let window = Window::of(xor);
            if self.window.contains(&window) {
                writer.write_bit(false);
                self.window.write_bits(writer, xor);
            } else {
                writer.write_bit(true);
                window.write_header(writer);
                window.write_bits(writer, xor);
                self.window = window;
            }
        }

        self.prev_bits = bits;
    }

    fn decode_value(&mut self, reader: &mut BitReader<'_>) -> Result<u32> {
        if !reader.read_bit()? {
            return Ok(self.prev_bits);
        }

        if reader.read_bit()? {
            self.window = Window::read_header(reader)?;
        } else if self.window == Window::EMPTY {
            return Err(CodecError::InvalidFormat(
                "reuse of a window before any was defined".into(),
            ));
        }

        let xor = self.window.read_xor(reader)?;
        self.prev_bits ^= xor;
        Ok(self.prev_bits)
    }
}

/// XOR codec for float columns (GORILLA)
#[derive(Debug, Clone, Copy, Default)]
pub struct XorFloatCodec;

impl XorFloatCodec {
    /// Encode raw float bit patterns
    pub fn encode_bits(bits: &[u32]) -> Result<Vec<u8>> {
        if bits.is_empty() {
            return Ok(Vec::new());
        }

        let mut writer = BitWriter::with_capacity(8 + bits.len());
        write_stream_header(&mut writer, bits)?;

        let mut state = XorState::new(bits[0]);
        for &b in &bits[1..] {
            state.encode_value(&mut writer, b);
        }
        Ok(writer.finish())
    }

    /// Decode into raw float bit patterns
    pub fn decode_bits(data: &[u8]) -> Result<Vec<u32>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = BitReader::new(data);
        let count = reader.read_bits(32)? as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let first = reader.read_bits(VALUE_BITS)? as u32;
        let mut state = XorState::new(first);
        let mut bits = Vec::with_capacity(count.min(data.len() * 8));
        bits.push(first);

        for _ in 1..count {
            bits.push(state.decode_value(&mut reader)?);
        }
        Ok(bits)
    }
}

impl Codec for XorFloatCodec {
    fn name(&self) -> &str {
        "GORILLA"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Self::encode_bits(&types::float_bits_from_bytes(input)?)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::float_bits_to_bytes(&Self::decode_bits(encoded)?))
    }
}
