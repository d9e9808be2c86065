//! Canonical-tie-break Huffman coding over the byte alphabet
//!
//! Stream: `[tableSize:16]{(byte:8, freq:32)}*[elementCount:32]{codes}`
//!
//! The tree is rebuilt from the frequency table on both sides, so the build
//! must be fully deterministic:
//! - table entries are visited in ascending byte order
//! - the min-heap orders nodes by `(frequency, sequence)`, where leaves take
//!   sequence numbers in ascending byte order and every merged node takes
//!   the next number in creation order
//! - the first node popped becomes the left (`0`) child

use super::bitstream::{BitReader, BitWriter};
use super::Codec;
use crate::{CodecError, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

const TABLE_SIZE_BITS: u32 = 16;
const SYMBOL_BITS: u32 = 8;
const FREQUENCY_BITS: u32 = 32;
const COUNT_BITS: u32 = 32;

/// Occurrence count per byte value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; 256],
}

impl FrequencyTable {
    /// Count every byte of `data`
    pub fn from_data(data: &[u8]) -> Result<Self> {
        if u32::try_from(data.len()).is_err() {
            return Err(CodecError::UnsupportedValue(format!(
                "{} bytes exceed the 32-bit element count",
                data.len()
            )));
        }

        let mut counts = [0u32; 256];
        for &b in data {
            counts[b as usize] += 1;
        }
        Ok(Self { counts })
    }

    /// Non-zero entries in ascending byte order
    pub fn entries(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Check if no symbol occurs
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Count for one symbol
    pub fn get(&self, symbol: u8) -> u32 {
        self.counts[symbol as usize]
    }

    fn write(&self, writer: &mut BitWriter) {
        writer.write_bits(self.len() as u64, TABLE_SIZE_BITS);
        for (symbol, count) in self.entries() {
            writer.write_bits(symbol as u64, SYMBOL_BITS);
            writer.write_bits(count as u64, FREQUENCY_BITS);
        }
    }

    fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let size = reader.read_bits(TABLE_SIZE_BITS)? as usize;
        if size > 256 {
            return Err(CodecError::InvalidFormat(format!(
                "frequency table with {} entries",
                size
            )));
        }

        let mut counts = [0u32; 256];
        for _ in 0..size {
            let symbol = reader.read_bits(SYMBOL_BITS)? as usize;
            let count = reader.read_bits(FREQUENCY_BITS)? as u32;
            if count == 0 || counts[symbol] != 0 {
                return Err(CodecError::InvalidFormat(format!(
                    "bad frequency table entry for byte {}",
                    symbol
                )));
            }
            counts[symbol] = count;
        }
        Ok(Self { counts })
    }
}

/// Prefix code for one symbol, right-aligned in `bits`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u32,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf { symbol: u8 },
    Internal { left: usize, right: usize },
}

/// Huffman tree stored as an arena; node indices double as tie-break
/// sequence numbers
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build the tree for a table, or `None` when the table is empty
    pub fn build(table: &FrequencyTable) -> Option<Self> {
        let mut nodes = Vec::with_capacity(511);
        let mut heap = BinaryHeap::new();

        for (symbol, count) in table.entries() {
            heap.push(Reverse((count as u64, nodes.len())));
            nodes.push(Node::Leaf { symbol });
        }

        while heap.len() > 1 {
            let Reverse((left_freq, left)) = heap.pop()?;
            let Reverse((right_freq, right)) = heap.pop()?;
            heap.push(Reverse((left_freq + right_freq, nodes.len())));
            nodes.push(Node::Internal { left, right });
        }

        let Reverse((_, root)) = heap.pop()?;
        Some(Self { nodes, root })
    }

    /// Whether the whole alphabet is a single symbol
    pub fn is_single_symbol(&self) -> bool {
        matches!(self.nodes[self.root], Node::Leaf { .. })
    }

    /// Code for every symbol present in the tree, indexed by byte value
    pub fn codes(&self) -> Vec<Option<Code>> {
        let mut codes = vec![None; 256];

        if let Node::Leaf { symbol } = self.nodes[self.root] {
            codes[symbol as usize] = Some(Code { bits: 0, len: 1 });
            return codes;
        }

        let mut stack = vec![(self.root, Code { bits: 0, len: 0 })];
        while let Some((index, code)) = stack.pop() {
            match self.nodes[index] {
                Node::Leaf { symbol } => codes[symbol as usize] = Some(code),
                Node::Internal { left, right } => {
                    debug_assert!(code.len < 64);
                    let deeper = |bit: u64| Code {
                        bits: (code.bits << 1) | bit,
                        len: code.len + 1,
                    };
                    stack.push((right, deeper(1)));
                    stack.push((left, deeper(0)));
                }
            }
        }
        codes
    }

    /// Walk from the root to a leaf, consuming one bit per edge
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let mut index = self.root;

        if let Node::Leaf { symbol } = self.nodes[index] {
            if reader.read_bit()? {
                return Err(CodecError::InvalidFormat(
                    "single-symbol code must be 0".into(),
                ));
            }
            return Ok(symbol);
        }

        loop {
            match self.nodes[index] {
                Node::Leaf { symbol } => return Ok(symbol),
                Node::Internal { left, right } => {
                    index = if reader.read_bit()? { right } else { left };
                }
            }
        }
    }
}

/// Huffman codec over raw bytes (HUFFMAN)
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl Codec for HuffmanCodec {
    fn name(&self) -> &str {
        "HUFFMAN"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let table = FrequencyTable::from_data(input)?;
        let Some(tree) = HuffmanTree::build(&table) else {
            return Ok(Vec::new());
        };
        let codes = tree.codes();

        let mut writer = BitWriter::with_capacity(6 + table.len() * 5 + input.len() / 2);
        table.write(&mut writer);
        writer.write_bits(input.len() as u64, COUNT_BITS);

        for &b in input {
            let code = codes[b as usize].ok_or_else(|| {
                CodecError::Internal(format!("byte {:#04x} missing from the code table", b))
            })?;
            writer.write_bits(code.bits, code.len);
        }
        Ok(writer.finish())
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = BitReader::new(encoded);
        let table = FrequencyTable::read(&mut reader)?;
        let count = reader.read_bits(COUNT_BITS)?;

        if table.total() != count {
            return Err(CodecError::InvalidFormat(format!(
                "frequency table sums to {} for {} elements",
                table.total(),
                count
            )));
        }

        let Some(tree) = HuffmanTree::build(&table) else {
            return Ok(Vec::new());
        };

        // Every symbol costs at least one bit.
        let mut out = Vec::with_capacity(count.min(encoded.len() as u64 * 8) as usize);
        for _ in 0..count {
            out.push(tree.decode_symbol(&mut reader)?);
        }
        Ok(out)
    }
}
