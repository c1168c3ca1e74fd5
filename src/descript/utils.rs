//! Small helpers shared by the store and the binary.

use encoding_rs::Encoding;

use super::types::error::{DescriptError, Result};

/// Resolves a WHATWG encoding label, normalising `GBK`/`GB2312` to `GB18030`.
///
/// Only encodings that can also be written are accepted; see
/// [`check_legacy_encoding`].
pub fn parse_encoding(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    let normalized = if label.eq_ignore_ascii_case("GBK") || label.eq_ignore_ascii_case("GB2312") {
        "GB18030"
    } else {
        label
    };
    let encoding = Encoding::for_label(normalized.as_bytes())
        .ok_or_else(|| DescriptError::UnknownEncoding(label.to_string()))?;
    check_legacy_encoding(encoding)
}

/// Accepts an encoding for BOM-less files only if `encoding_rs` encodes into
/// it. For UTF-16 and `replacement` the encoder falls back to UTF-8.
pub fn check_legacy_encoding(encoding: &'static Encoding) -> Result<&'static Encoding> {
    if encoding.output_encoding() != encoding {
        return Err(DescriptError::UnsupportedEncoding(encoding.name().to_string()));
    }
    Ok(encoding)
}

/// Converts CRLF and bare CR to LF, the canonical comment line break.
pub fn normalize_line_breaks(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}
