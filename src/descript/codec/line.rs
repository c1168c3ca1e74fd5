//! Single-record parsing and rendering.
//!
//! # Record Layout
//! ```text
//! <name> SP <comment> [EOT marker]
//! "<name with ""quotes"" or spaces>" SP <comment> [EOT marker]
//! ```
//!
//! The name ends at the first space outside quotes. Everything after that
//! space is the comment, verbatim. How line breaks inside the comment are
//! spelled depends on the [`Dialect`].

use crate::descript::types::models::{Dialect, Entry};

/// Line-break placeholder used by Double Commander.
pub const NO_BREAK_SPACE: char = '\u{00A0}';

/// Escaped line break used by Total Commander.
pub const ESCAPED_LINE_BREAK: &str = "\\n";

/// Trailer Total Commander appends to multi-line records (EOT + `Â`).
///
/// This is the Unicode spelling. Legacy files carry the bytes `04 C2`, which
/// decode differently per code page; see
/// [`encoding::eot_marker`](crate::descript::codec::encoding::eot_marker).
pub const TC_EOT_MARKER: &str = "\u{0004}\u{00C2}";

/// Splits a raw record into its name and the undecoded comment fragment.
///
/// Returns `None` for blank input. A record without an unquoted space is a
/// name with an empty comment. The name may come back empty for stray
/// artifacts such as a lone `""`; callers decide what to do with those.
pub fn split_record(raw: &str) -> Option<(String, &str)> {
    if raw.trim().is_empty() {
        return None;
    }

    let mut name = String::new();
    let mut in_quotes = false;
    let mut chars = raw.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' if in_quotes && matches!(chars.peek(), Some((_, '"'))) => {
                name.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => {
                // Space is one byte, so the comment starts right after it.
                return Some((name, &raw[idx + 1..]));
            }
            _ => name.push(c),
        }
    }

    Some((name, ""))
}

/// Parses one record under the given dialect.
///
/// The EOT marker must already be stripped; see
/// [`dialect::classify`](crate::descript::format::dialect::classify).
pub fn parse_line(raw: &str, dialect: Dialect) -> Option<Entry> {
    let (name, fragment) = split_record(raw)?;
    Some(Entry {
        name,
        comment: decode_comment(fragment, dialect),
    })
}

/// Turns an on-disk comment fragment into canonical form (`\n` line breaks).
pub fn decode_comment(fragment: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::TotalCommander => fragment.replace(ESCAPED_LINE_BREAK, "\n"),
        Dialect::DoubleCommander => fragment.replace(NO_BREAK_SPACE, "\n"),
    }
}

/// Spells a canonical comment the way the dialect stores it, marker included.
///
/// `eot_marker` is the marker as decoded text in the target encoding.
pub fn encode_comment(comment: &str, dialect: Dialect, eot_marker: &str) -> String {
    match dialect {
        Dialect::DoubleCommander => comment.replace('\n', &NO_BREAK_SPACE.to_string()),
        Dialect::TotalCommander => {
            let mut encoded = comment.replace('\n', ESCAPED_LINE_BREAK);
            if comment.contains('\n') {
                encoded.push_str(eot_marker);
            }
            encoded
        }
    }
}

/// Quotes a name when it contains a space or a double quote.
///
/// Every embedded quote is doubled so the name parses back unchanged.
pub fn quote_name(name: &str) -> String {
    if name.contains([' ', '"']) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Renders one record, without a line terminator.
pub fn render_line(name: &str, comment: &str, dialect: Dialect, eot_marker: &str) -> String {
    format!("{} {}", quote_name(name), encode_comment(comment, dialect, eot_marker))
}
