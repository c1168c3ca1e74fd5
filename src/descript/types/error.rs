//! Custom error types for the descript-ion crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum DescriptError {
    /// An error originating from I/O operations (read, write, directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required identifier (name, comment, path) was empty or unusable.
    ///
    /// Raised before any disk access takes place.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A fallback encoding label that `encoding_rs` does not recognise.
    #[error("Unknown text encoding label: {0:?}")]
    UnknownEncoding(String),

    /// An encoding `encoding_rs` can decode but not encode into (UTF-16 as a
    /// fallback, `replacement`). Saving in it would silently write UTF-8.
    #[error("Unsupported fallback encoding: {0}")]
    UnsupportedEncoding(String),
}

/// A convenience `Result` type alias using the crate's `DescriptError` type.
pub type Result<T> = std::result::Result<T, DescriptError>;
