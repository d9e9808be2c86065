//! Error types for tscodec

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Codec error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Column buffer length is not a multiple of the element width
    #[error("Malformed input: {len} bytes is not a multiple of element width {width}")]
    MalformedInput { len: usize, width: usize },

    /// Decode needed more bits or bytes than the stream holds
    #[error("Truncated stream: {0}")]
    TruncatedStream(String),

    /// Value outside the codec's domain
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Header or payload that no encoder could have produced
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Post-compression failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// Configuration named a codec that does not exist
    #[error("Unknown codec: {0}")]
    UnknownCodec(String),

    /// Configuration that cannot build a codec
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Broken internal invariant
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CodecError {
    /// Check if error indicates a damaged encoded stream
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            CodecError::TruncatedStream(_)
                | CodecError::InvalidFormat(_)
                | CodecError::Compression(_)
        )
    }

    /// Check if error was caused by the column handed to encode
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CodecError::MalformedInput { .. } | CodecError::UnsupportedValue(_)
        )
    }

    pub(crate) fn truncated(what: &str) -> Self {
        CodecError::TruncatedStream(format!("unexpected end of data reading {}", what))
    }
}
