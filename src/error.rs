// Error types for metadata extraction

use crate::codec::Codec;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Everything that can go wrong while reading metadata.
///
/// `UnexpectedEnd` and `StreamInvalid` are the only errors the FLAC block
/// loop itself produces. The block payload decoders and the façade add their
/// own kinds on top.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// The byte source ran out (or failed) before the requested bytes arrived.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Wrong stream marker, reserved block type, or out-of-range field.
    #[error("stream is invalid: {0}")]
    StreamInvalid(String),

    /// A VORBIS_COMMENT payload did not follow the tag-vector framing.
    #[error("malformed tag vector: {0}")]
    MalformedTagVector(String),

    /// A PICTURE payload was truncated or inconsistent.
    #[error("malformed picture block: {0}")]
    MalformedPicture(String),

    /// No reader in the capability table could handle the file.
    #[error("reading metadata for {0} is unsupported")]
    Unsupported(Codec),

    /// Opening, seeking or stat-ing the underlying file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MetadataError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MetadataError::StreamInvalid(reason.into())
    }

    /// Whether the error describes the content of the file rather than the
    /// environment it was read in. Format errors make the façade try its
    /// fallback reader.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, MetadataError::Io(_))
    }
}
