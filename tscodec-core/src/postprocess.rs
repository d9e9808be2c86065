//! General-purpose post-compression layered on top of a codec
//!
//! A [`Hybrid`] runs a codec and then compresses its output with a
//! [`Compressor`]. The codec's own framing is left untouched, so decoding
//! simply reverses the two steps.

use crate::compression::Codec;
use crate::{CodecError, Result};
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{Read, Write};
use tracing::debug;

/// Byte-level compressor applied after a codec
pub trait Compressor: Send + Sync {
    /// Stable identifier
    fn name(&self) -> &'static str;

    /// Compress a buffer
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Reverse [`Compressor::compress`]
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

impl<P: Compressor + ?Sized> Compressor for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        (**self).decompress(data)
    }
}

fn compression_error(e: impl std::fmt::Display) -> CodecError {
    CodecError::Compression(e.to_string())
}

/// Pass-through compressor (IDENTITY)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

impl Compressor for NoCompression {
    fn name(&self) -> &'static str {
        "IDENTITY"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// LZ4 block compression with the uncompressed size prepended (LZ4)
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Compressor;

impl Compressor for Lz4Compressor {
    fn name(&self) -> &'static str {
        "LZ4"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        lz4_flex::decompress_size_prepended(data).map_err(compression_error)
    }
}

/// Gzip member at the default level (GZIP)
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn name(&self) -> &'static str {
        "GZIP"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
        encoder.write_all(data).map_err(compression_error)?;
        encoder.finish().map_err(compression_error)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        GzDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(compression_error)?;
        Ok(out)
    }
}

/// Zlib stream at the default level (ZLIB)
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibCompressor;

impl Compressor for ZlibCompressor {
    fn name(&self) -> &'static str {
        "ZLIB"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
        encoder.write_all(data).map_err(compression_error)?;
        encoder.finish().map_err(compression_error)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        ZlibDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(compression_error)?;
        Ok(out)
    }
}

/// Raw Snappy block format (SNAPPY)
#[derive(Debug, Clone, Copy, Default)]
pub struct SnappyCompressor;

impl Compressor for SnappyCompressor {
    fn name(&self) -> &'static str {
        "SNAPPY"
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        snap::raw::Encoder::new()
            .compress_vec(data)
            .map_err(compression_error)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        snap::raw::Decoder::new()
            .decompress_vec(data)
            .map_err(compression_error)
    }
}

/// A codec followed by a compressor, named `"{codec}+{compressor}"`
pub struct Hybrid<C, P> {
    codec: C,
    compressor: P,
    name: String,
}

impl<C: Codec, P: Compressor> Hybrid<C, P> {
    pub fn new(codec: C, compressor: P) -> Self {
        let name = format!("{}+{}", codec.name(), compressor.name());
        Self {
            codec,
            compressor,
            name,
        }
    }
}

impl<C, P> std::fmt::Debug for Hybrid<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hybrid").field("name", &self.name).finish()
    }
}

impl<C: Codec, P: Compressor> Codec for Hybrid<C, P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let encoded = self.codec.encode(input)?;
        if encoded.is_empty() {
            return Ok(encoded);
        }
        let compressed = self.compressor.compress(&encoded)?;
        debug!(
            hybrid = self.name.as_str(),
            input = input.len(),
            encoded = encoded.len(),
            compressed = compressed.len(),
            "hybrid encode"
        );
        Ok(compressed)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }
        let decompressed = self.compressor.decompress(encoded)?;
        self.codec.decode(&decompressed)
    }
}
