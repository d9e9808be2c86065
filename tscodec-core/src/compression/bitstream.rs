//! Bit-level I/O shared by every non byte-aligned codec
//!
//! Bits are written and read most-significant first. The writer pads its
//! final partial byte with zero bits in the low-order positions.

use crate::{CodecError, Result};

/// Bit writer for encoding compressed data
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    current_byte: u8,
    bit_position: u8,
}

impl BitWriter {
    /// Create a new BitWriter
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            current_byte: 0,
            bit_position: 0,
        }
    }

    /// Create with capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            current_byte: 0,
            bit_position: 0,
        }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_position);
        }
        self.bit_position += 1;

        if self.bit_position == 8 {
            self.buffer.push(self.current_byte);
            self.current_byte = 0;
            self.bit_position = 0;
        }
    }

    /// Write the `num_bits` low-order bits of `value`, most significant first
    #[inline]
    pub fn write_bits(&mut self, value: u64, num_bits: u32) {
        debug_assert!(num_bits <= 64);

        // Whole bytes can go straight to the buffer when aligned.
        let mut remaining = num_bits;
        while remaining > 0 {
            if self.bit_position == 0 && remaining >= 8 {
                remaining -= 8;
                self.buffer.push((value >> remaining) as u8);
            } else {
                remaining -= 1;
                self.write_bit((value >> remaining) & 1 == 1);
            }
        }
    }

    /// Write `count` one bits followed by a zero terminator
    pub fn write_unary(&mut self, count: u32) {
        for _ in 0..count {
            self.write_bit(true);
        }
        self.write_bit(false);
    }

    /// Finish writing and return the buffer
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_position > 0 {
            self.buffer.push(self.current_byte);
        }
        self.buffer
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bit reader for decoding compressed data
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_position: usize,
    bit_position: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_position: 0,
            bit_position: 0,
        }
    }

    /// Read a single bit
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = *self
            .data
            .get(self.byte_position)
            .ok_or_else(|| CodecError::truncated("bit"))?;

        let bit = (byte >> (7 - self.bit_position)) & 1 == 1;
        self.bit_position += 1;

        if self.bit_position == 8 {
            self.byte_position += 1;
            self.bit_position = 0;
        }

        Ok(bit)
    }

    /// Read `num_bits` bits as a u64
    ///
    /// Fails without consuming anything when fewer bits remain.
    #[inline]
    pub fn read_bits(&mut self, num_bits: u32) -> Result<u64> {
        debug_assert!(num_bits <= 64);

        if (num_bits as usize) > self.remaining_bits() {
            return Err(CodecError::TruncatedStream(format!(
                "needed {} bits, {} remain",
                num_bits,
                self.remaining_bits()
            )));
        }

        let mut value = 0u64;
        let mut remaining = num_bits;
        while remaining > 0 {
            if self.bit_position == 0 && remaining >= 8 {
                value = (value << 8) | self.data[self.byte_position] as u64;
                self.byte_position += 1;
                remaining -= 8;
            } else {
                value = (value << 1) | self.read_bit()? as u64;
                remaining -= 1;
            }
        }
        Ok(value)
    }

    /// Read one bits up to and including a zero terminator, returning the
    /// number of ones. More than `cap` ones is rejected as corrupt.
    pub fn read_unary(&mut self, cap: u32) -> Result<u32> {
        let mut count = 0u32;
        while self.read_bit()? {
            count += 1;
            if count > cap {
                return Err(CodecError::InvalidFormat(format!(
                    "unary run exceeds cap of {}",
                    cap
                )));
            }
        }
        Ok(count)
    }

    /// Check if every bit has been consumed
    pub fn is_at_end(&self) -> bool {
        self.byte_position >= self.data.len()
    }

    /// Bits left to read, padding included
    pub fn remaining_bits(&self) -> usize {
        (self.data.len() - self.byte_position.min(self.data.len())) * 8
            - self.bit_position as usize
    }

    /// Get the current position in bits
    pub fn position(&self) -> usize {
        self.byte_position * 8 + self.bit_position as usize
    }
}
