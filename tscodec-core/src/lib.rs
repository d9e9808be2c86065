//! tscodec Core - Reversible Codecs for Time-Series Columns
//!
//! Lossless encoders and decoders for the two column shapes a sensor store
//! keeps:
//! - Millisecond timestamps as signed 64-bit integers
//! - Sensor readings as 32-bit floats
//!
//! # Architecture
//!
//! - **Bit streams**: MSB-first bit writer and reader shared by all bit-level codecs
//! - **Codecs**: delta, delta-of-delta, XOR (Gorilla and windowed Chimp),
//!   Huffman, Golomb-Rice, bit-packing, run-length and dictionary
//! - **Pipelines**: SPRINTZ, RLBE and RAKE chains of simpler codecs
//! - **Post-compression**: optional LZ4, GZIP, ZLIB or Snappy over any
//!   codec's output
//!
//! Every codec implements [`compression::Codec`] and is selected at runtime
//! through [`config::CodecKind`] or [`config::CodecConfig`].
//!
//! ```
//! use tscodec_core::compression::Codec;
//! use tscodec_core::config::CodecKind;
//! use tscodec_core::timestamps_to_bytes;
//!
//! let column = timestamps_to_bytes(&[1697040000000, 1697040000010, 1697040000020]);
//! let codec = CodecKind::DeltaOfDelta.build();
//! let encoded = codec.encode(&column).unwrap();
//! assert_eq!(codec.decode(&encoded).unwrap(), column);
//! ```

pub mod compression;
pub mod config;
pub mod pipeline;
pub mod postprocess;

mod error;
mod types;

pub use error::{CodecError, Result};
pub use types::*;

/// tscodec version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
