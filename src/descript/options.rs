//! Store configuration.

use encoding_rs::{Encoding, WINDOWS_1252};

use super::types::error::Result;
use super::types::models::{Dialect, DialectMode, LineTerminator};
use super::utils;

/// Default sidecar file name.
pub const DEFAULT_FILE_NAME: &str = "descript.ion";

/// Options controlling how a [`DescriptionStore`](super::store::DescriptionStore)
/// reads and writes its file.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Requested dialect. `AutoDetect` resolves on load.
    pub dialect: DialectMode,
    /// Encoding used when a file has no byte-order mark.
    fallback_encoding: &'static Encoding,
    /// Name of the sidecar file inside the bound directory.
    pub file_name: String,
    pub line_terminator: LineTerminator,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dialect: DialectMode::AutoDetect,
            fallback_encoding: WINDOWS_1252,
            file_name: DEFAULT_FILE_NAME.to_string(),
            line_terminator: LineTerminator::Platform,
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: impl Into<DialectMode>) -> Self {
        self.dialect = dialect.into();
        self
    }

    /// Sets the encoding used for files without a byte-order mark.
    ///
    /// # Errors
    /// `UnsupportedEncoding` for encodings `encoding_rs` cannot encode into,
    /// such as UTF-16 or `replacement`.
    pub fn with_fallback_encoding(mut self, encoding: &'static Encoding) -> Result<Self> {
        self.fallback_encoding = utils::check_legacy_encoding(encoding)?;
        Ok(self)
    }

    /// Sets the fallback encoding from a label such as `cp1251` or `GBK`.
    pub fn with_fallback_label(self, label: &str) -> Result<Self> {
        self.with_fallback_encoding(utils::parse_encoding(label)?)
    }

    pub fn fallback_encoding(&self) -> &'static Encoding {
        self.fallback_encoding
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_line_terminator(mut self, terminator: LineTerminator) -> Self {
        self.line_terminator = terminator;
        self
    }

    /// The dialect a store starts out with before anything is loaded.
    pub fn initial_dialect(&self) -> Dialect {
        self.dialect.fixed().unwrap_or_default()
    }
}
