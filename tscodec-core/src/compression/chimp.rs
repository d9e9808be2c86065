//! Windowed XOR compression (Chimp-style) for 32-bit float columns
//!
//! Like Gorilla, but instead of only the previous window the encoder keeps a
//! history of the last 128 window shapes and refers back to the first one the
//! new XOR fits inside.
//!
//! Stream: `[count:32][first:32]` then for every further value:
//! - `0` when the XOR with the previous value is zero
//! - `10` + 7-bit history slot + significant bits through that window
//! - `11` + 5-bit leading zeros + 6-bit length + significant bits otherwise
//!
//! The decoder replays the same history pushes, so slot references resolve
//! to the same windows the encoder saw.

use super::bitstream::{BitReader, BitWriter};
use super::xor::{self, Window, VALUE_BITS};
use super::Codec;
use crate::config::WINDOW_HISTORY_SIZE;
use crate::types;
use crate::{CodecError, Result};

/// Bits needed to address a history slot
const SLOT_BITS: u32 = WINDOW_HISTORY_SIZE.trailing_zeros();

/// Ring buffer of recently opened windows
///
/// Lives for a single encode or decode call.
#[derive(Debug, Clone)]
pub struct WindowHistory {
    slots: [Window; WINDOW_HISTORY_SIZE],
    len: usize,
    next: usize,
}

impl WindowHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            slots: [Window::EMPTY; WINDOW_HISTORY_SIZE],
            len: 0,
            next: 0,
        }
    }

    /// First slot, in slot order, whose window contains `window`
    pub fn find(&self, window: &Window) -> Option<usize> {
        self.slots[..self.len]
            .iter()
            .position(|stored| stored.contains(window))
    }

    /// Store a window, overwriting the oldest once full
    pub fn push(&mut self, window: Window) {
        self.slots[self.next] = window;
        self.next = (self.next + 1) % WINDOW_HISTORY_SIZE;
        self.len = (self.len + 1).min(WINDOW_HISTORY_SIZE);
    }

    /// Window stored in `slot`
    pub fn get(&self, slot: usize) -> Option<Window> {
        self.slots[..self.len].get(slot).copied()
    }

    /// Number of stored windows
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for WindowHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Windowed XOR codec for float columns (CHIMP)
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowedXorCodec;

impl WindowedXorCodec {
    /// Encode raw float bit patterns
    pub fn encode_bits(bits: &[u32]) -> Result<Vec<u8>> {
        if bits.is_empty() {
            return Ok(Vec::new());
        }

        let mut writer = BitWriter::with_capacity(8 + bits.len());
        xor::write_stream_header(&mut writer, bits)?;

        let mut history = WindowHistory::new();
        let mut prev = bits[0];

        for &curr in &bits[1..] {
            let xor = prev ^ curr;
            prev = curr;

            if xor == 0 {
                writer.write_bit(false);
                continue;
            }
            writer.write_bit(true);

            let window = Window::of(xor);
            match history.find(&window) {
                Some(slot) => {
                    writer.write_bit(false);
                    writer.write_bits(slot as u64, SLOT_BITS);
                    // Slot came from `find`, so it is populated.
                    let stored = history.slots[slot];
                    stored.write_bits(&mut writer, xor);
                }
                None => {
                    writer.write_bit(true);
                    window.write_header(&mut writer);
                    window.write_bits(&mut writer, xor);
                    history.push(window);
                }
            }
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

        let mut prev = reader.read_bits(VALUE_BITS)? as u32;
        let mut bits = Vec::with_capacity(count.min(data.len() * 8));
        bits.push(prev);

        let mut history = WindowHistory::new();

        for _ in 1..count {
            if reader.read_bit()? {
                let window = if reader.read_bit()? {
                    let window = Window::read_header(&mut reader)?;
                    history.push(window);
                    window
                } else {
                    let slot = reader.read_bits(SLOT_BITS)? as usize;
                    history.get(slot).ok_or_else(|| {
                        CodecError::InvalidFormat(format!(
                            "window slot {} referenced with {} stored",
                            slot,
                            history.len()
                        ))
                    })?
                };
                prev ^= window.read_xor(&mut reader)?;
            }
            bits.push(prev);
        }

        Ok(bits)
    }
}

impl Codec for WindowedXorCodec {
    fn name(&self) -> &str {
        "CHIMP"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        Self::encode_bits(&types::float_bits_from_bytes(input)?)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(types::float_bits_to_bytes(&Self::decode_bits(encoded)?))
    }
}
