//! Unified error type for all store operations.

use crate::record::RecordId;

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Missing payload, or a title/body that is empty after trimming.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// No live record carries this id.
    #[error("record {0} not found")]
    NotFound(RecordId),
    /// File system problem (read, write, rename, fsync).
    #[error("i/o error: {0}")]
    Io(String),
    /// Failed to serialize the collection to bytes.
    #[error("serialization error: {0}")]
    Serialize(String),
    /// Bytes on disk are not a valid record collection.
    #[error("deserialization error: {0}")]
    Deserialize(String),
    /// Bad configuration (empty path, unparsable config file, ...).
    #[error("config error: {0}")]
    Config(String),
    /// The allocator has handed out every representable id.
    #[error("record id space exhausted")]
    IdsExhausted,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.to_string())
        } else if err.is_syntax() || err.is_eof() || err.is_data() {
            Error::Deserialize(err.to_string())
        } else {
            Error::Serialize(err.to_string())
        }
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
