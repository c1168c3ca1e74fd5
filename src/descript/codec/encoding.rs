//! Byte-order-mark sniffing and text transcoding.
//!
//! descript.ion files carry no header of their own. The only encoding signal
//! is an optional byte-order mark:
//!
//! ```text
//! EF BB BF  → UTF-8
//! FF FE     → UTF-16LE
//! FE FF     → UTF-16BE
//! (none)    → legacy single-byte fallback (windows-1252 unless configured)
//! ```
//!
//! The Total Commander EOT marker is the raw byte pair `04 C2`, whatever the
//! legacy code page makes of `C2`. Unicode files carry it as `U+0004 U+00C2`.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use log::{debug, trace, warn};

use crate::descript::codec::line::TC_EOT_MARKER;
use crate::descript::types::models::TextEncoding;

/// The EOT marker as it appears in a legacy-encoded file.
pub const TC_EOT_BYTES: [u8; 2] = [0x04, 0xC2];

/// The EOT marker as it reads once `encoding` has decoded the file.
///
/// For legacy encodings this is whatever `04 C2` decodes to (`U+0004 В` under
/// windows-1251, `U+0004 U+FFFD` where `C2` is a lead byte).
pub fn eot_marker(encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Legacy(legacy) => {
            let (marker, _) = legacy.decode_without_bom_handling(&TC_EOT_BYTES);
            marker.into_owned()
        }
        _ => TC_EOT_MARKER.to_string(),
    }
}

/// Picks the text encoding from the leading bytes.
///
/// Pure function of the prefix; the rest of the stream is not validated.
pub fn sniff(bytes: &[u8], fallback: &'static Encoding) -> TextEncoding {
    if bytes.len() < 2 {
        trace!("{} byte(s) available, using fallback {}", bytes.len(), fallback.name());
        return TextEncoding::Legacy(fallback);
    }

    match Encoding::for_bom(bytes) {
        Some((encoding, _)) if encoding == UTF_8 => TextEncoding::Utf8Bom,
        Some((encoding, _)) if encoding == UTF_16LE => TextEncoding::Utf16Le,
        Some((encoding, _)) if encoding == UTF_16BE => TextEncoding::Utf16Be,
        _ => TextEncoding::Legacy(fallback),
    }
}

/// Decodes the full file content, dropping the byte-order mark if present.
///
/// Malformed sequences are replaced with U+FFFD rather than failing the load.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let payload = bytes.strip_prefix(encoding.bom()).unwrap_or(bytes);
    let decoder = match encoding {
        TextEncoding::Utf8Bom => UTF_8,
        TextEncoding::Utf16Le => UTF_16LE,
        TextEncoding::Utf16Be => UTF_16BE,
        TextEncoding::Legacy(legacy) => legacy,
    };

    let (text, had_errors) = decoder.decode_without_bom_handling(payload);
    if had_errors {
        debug!("Malformed {} sequences replaced while decoding", encoding.name());
    }
    text.into_owned()
}

/// Encodes text for writing, prefixed with the encoding's byte-order mark.
///
/// `encoding_rs` only encodes into UTF-8 and legacy encodings, so UTF-16 is
/// produced from `str::encode_utf16` directly. In legacy encodings every
/// [`eot_marker`] in `text` is written as the raw [`TC_EOT_BYTES`].
pub fn encode(text: &str, encoding: TextEncoding) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 3);
    out.extend_from_slice(encoding.bom());

    match encoding {
        TextEncoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
        TextEncoding::Utf16Le => {
            out.extend(text.encode_utf16().flat_map(|unit| unit.to_le_bytes()));
        }
        TextEncoding::Utf16Be => {
            out.extend(text.encode_utf16().flat_map(|unit| unit.to_be_bytes()));
        }
        TextEncoding::Legacy(legacy) => {
            let marker = eot_marker(encoding);
            let mut had_unmappable = false;
            for (idx, chunk) in text.split(marker.as_str()).enumerate() {
                if idx > 0 {
                    out.extend_from_slice(&TC_EOT_BYTES);
                }
                let (bytes, _, unmappable) = legacy.encode(chunk);
                had_unmappable |= unmappable;
                out.extend_from_slice(&bytes);
            }
            if had_unmappable {
                warn!(
                    "Some characters cannot be represented in {} and were written as numeric references",
                    legacy.name()
                );
            }
        }
    }

    out
}
