//! Codec parameters and codec selection

use crate::compression::{
    BitPackCodec, Codec, DeltaCodec, DeltaOfDeltaCodec, DictionaryCodec, GolombRiceCodec,
    HuffmanCodec, IdentityCodec, RunLengthCodec, WindowedXorCodec, XorFloatCodec,
};
use crate::pipeline::Pipeline;
use crate::postprocess::{
    Compressor, GzipCompressor, Hybrid, Lz4Compressor, SnappyCompressor, ZlibCompressor,
};
use crate::{CodecError, ElementType, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Golomb-Rice divisor
pub const GOLOMB_RICE_M: u64 = 8;

/// Remainder width for the Golomb-Rice divisor (log2 of M)
pub const GOLOMB_RICE_REMAINDER_BITS: u32 = GOLOMB_RICE_M.trailing_zeros();

/// Largest unary quotient written or accepted
pub const UNARY_QUOTIENT_CAP: u32 = 255;

/// Number of remembered windows in the windowed XOR codec
pub const WINDOW_HISTORY_SIZE: usize = 128;

/// Longest run stored in one run-length pair
pub const RLE_MAX_RUN: usize = 255;

/// Every codec and pipeline, addressable by its stable name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecKind {
    #[serde(rename = "IDENTITY")]
    Identity,
    #[serde(rename = "DELTA_VARINT")]
    DeltaVarint,
    #[serde(rename = "TS_2DIFF")]
    DeltaOfDelta,
    #[serde(rename = "GORILLA")]
    Gorilla,
    #[serde(rename = "CHIMP")]
    Chimp,
    #[serde(rename = "BIT_PACKING")]
    BitPacking,
    #[serde(rename = "RLE")]
    RunLength,
    #[serde(rename = "HUFFMAN")]
    Huffman,
    #[serde(rename = "GOLOMB_RICE")]
    GolombRice,
    #[serde(rename = "DICTIONARY")]
    Dictionary,
    #[serde(rename = "SPRINTZ")]
    Sprintz,
    #[serde(rename = "RLBE")]
    Rlbe,
    #[serde(rename = "RAKE")]
    Rake,
}

impl CodecKind {
    /// All kinds in registry order
    pub const ALL: [CodecKind; 13] = [
        CodecKind::Identity,
        CodecKind::DeltaVarint,
        CodecKind::DeltaOfDelta,
        CodecKind::Gorilla,
        CodecKind::Chimp,
        CodecKind::BitPacking,
        CodecKind::RunLength,
        CodecKind::Huffman,
        CodecKind::GolombRice,
        CodecKind::Dictionary,
        CodecKind::Sprintz,
        CodecKind::Rlbe,
        CodecKind::Rake,
    ];

    /// Stable name, identical to the serialized form
    pub const fn name(self) -> &'static str {
        match self {
            CodecKind::Identity => "IDENTITY",
            CodecKind::DeltaVarint => "DELTA_VARINT",
            CodecKind::DeltaOfDelta => "TS_2DIFF",
            CodecKind::Gorilla => "GORILLA",
            CodecKind::Chimp => "CHIMP",
            CodecKind::BitPacking => "BIT_PACKING",
            CodecKind::RunLength => "RLE",
            CodecKind::Huffman => "HUFFMAN",
            CodecKind::GolombRice => "GOLOMB_RICE",
            CodecKind::Dictionary => "DICTIONARY",
            CodecKind::Sprintz => "SPRINTZ",
            CodecKind::Rlbe => "RLBE",
            CodecKind::Rake => "RAKE",
        }
    }

    /// Column element type the codec expects, `None` for byte codecs
    pub const fn element_type(self) -> Option<ElementType> {
        match self {
            CodecKind::Identity | CodecKind::RunLength | CodecKind::Huffman => None,
            CodecKind::Gorilla | CodecKind::Chimp => Some(ElementType::Float32),
            _ => Some(ElementType::Int64),
        }
    }

    pub fn build(self) -> Box<dyn Codec> {
        match self {
            CodecKind::Identity => Box::new(IdentityCodec),
            CodecKind::DeltaVarint => Box::new(DeltaCodec),
            CodecKind::DeltaOfDelta => Box::new(DeltaOfDeltaCodec),
            CodecKind::Gorilla => Box::new(XorFloatCodec),
            CodecKind::Chimp => Box::new(WindowedXorCodec),
            CodecKind::BitPacking => Box::new(BitPackCodec),
            CodecKind::RunLength => Box::new(RunLengthCodec),
            CodecKind::Huffman => Box::new(HuffmanCodec),
            CodecKind::GolombRice => Box::new(GolombRiceCodec),
            CodecKind::Dictionary => Box::new(DictionaryCodec),
            CodecKind::Sprintz => Box::new(Pipeline::sprintz()),
            CodecKind::Rlbe => Box::new(Pipeline::rlbe()),
            CodecKind::Rake => Box::new(Pipeline::rake()),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CodecKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        CodecKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CodecError::UnknownCodec(s.to_string()))
    }
}

/// Compression applied to a codec's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCompression {
    #[default]
    None,
    Lz4,
    Gzip,
    Zlib,
    Snappy,
}

impl PostCompression {
    pub const ALL: [PostCompression; 5] = [
        PostCompression::None,
        PostCompression::Lz4,
        PostCompression::Gzip,
        PostCompression::Zlib,
        PostCompression::Snappy,
    ];

    /// The compressor to layer over a codec, if any
    pub fn compressor(self) -> Option<Box<dyn Compressor>> {
        match self {
            PostCompression::None => None,
            PostCompression::Lz4 => Some(Box::new(Lz4Compressor)),
            PostCompression::Gzip => Some(Box::new(GzipCompressor)),
            PostCompression::Zlib => Some(Box::new(ZlibCompressor)),
            PostCompression::Snappy => Some(Box::new(SnappyCompressor)),
        }
    }
}

/// Wire shape of a [`CodecConfig`] before the codec name is resolved
#[derive(Deserialize)]
struct RawCodecConfig {
    codec: String,
    #[serde(default)]
    post_compression: PostCompression,
}

/// Codec selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub codec: CodecKind,
    #[serde(default)]
    pub post_compression: PostCompression,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            codec: CodecKind::DeltaOfDelta,
            post_compression: PostCompression::None,
        }
    }
}

impl CodecConfig {
    pub fn new(codec: CodecKind) -> Self {
        Self {
            codec,
            ..Default::default()
        }
    }

    pub fn with_lz4(self) -> Self {
        self.with_post_compression(PostCompression::Lz4)
    }

    pub fn with_post_compression(mut self, post_compression: PostCompression) -> Self {
        self.post_compression = post_compression;
        self
    }

    /// Parse a JSON configuration such as
    /// `{"codec": "CHIMP", "post_compression": "lz4"}`
    ///
    /// A codec name outside the registry is `UnknownCodec`; any other
    /// problem with the document is `InvalidConfig`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCodecConfig = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidConfig(format!("codec config: {}", e)))?;
        Ok(Self {
            codec: raw.codec.parse()?,
            post_compression: raw.post_compression,
        })
    }

    /// Instantiate the configured codec
    pub fn build(&self) -> Box<dyn Codec> {
        let codec = self.codec.build();
        let built: Box<dyn Codec> = match self.post_compression.compressor() {
            None => codec,
            Some(compressor) => Box::new(Hybrid::new(codec, compressor)),
        };
        debug!(codec = built.name(), "built codec from config");
        built
    }
}
