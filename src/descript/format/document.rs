//! Whole-file parsing and rendering over decoded text.

use log::{debug, trace};

use super::dialect::{self, DialectResolver};
use crate::descript::codec::line;
use crate::descript::mapping::CommentMap;
use crate::descript::types::models::{Dialect, DialectMode, LineTerminator};

/// The structured result of parsing a decoded descript.ion file.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub entries: CommentMap,
    /// The requested dialect, or the resolved one for `AutoDetect`.
    pub dialect: Dialect,
    /// Non-blank records dropped because their name was empty.
    pub dropped: usize,
}

/// Splits text into physical records, skipping blank ones.
///
/// CR and LF both terminate a record, so CRLF, LF and bare CR files all work.
pub fn records(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|record| !record.trim().is_empty())
}

/// Parses every record of `text`.
///
/// With `AutoDetect`, each record is parsed under the dialect it proves and
/// the file-level dialect comes from [`DialectResolver`]. With a fixed
/// dialect, every record is parsed under it. `eot_marker` is the EOT marker
/// as the file's encoding decodes it.
pub fn parse(text: &str, mode: DialectMode, eot_marker: &str) -> ParsedDocument {
    let mut entries = CommentMap::new();
    let mut resolver = DialectResolver::new();
    let mut dropped = 0;

    for record in records(text) {
        let classified = dialect::classify(record, eot_marker);
        resolver.observe(classified.evidence);
        let dialect = mode.fixed().unwrap_or_else(|| classified.parse_dialect());

        let Some(entry) = line::parse_line(classified.body, dialect) else {
            continue;
        };
        if entry.name.is_empty() {
            debug!("Dropping record with empty name: {:?}", record);
            dropped += 1;
            continue;
        }

        trace!("Parsed {:?} under {}", entry.name, dialect);
        if let Some(previous) = entries.insert(entry) {
            trace!("Duplicate name overrides earlier comment {:?}", previous);
        }
    }

    let dialect = match mode {
        DialectMode::Fixed(dialect) => dialect,
        DialectMode::AutoDetect => resolver.resolve(),
    };
    debug!("Parsed {} entries, dialect {}", entries.len(), dialect);

    ParsedDocument {
        entries,
        dialect,
        dropped,
    }
}

/// Renders every entry, each followed by `terminator`.
pub fn render(
    entries: &CommentMap,
    dialect: Dialect,
    terminator: LineTerminator,
    eot_marker: &str,
) -> String {
    let terminator = terminator.as_str();
    let mut text = String::new();
    for entry in entries {
        text.push_str(&line::render_line(&entry.name, &entry.comment, dialect, eot_marker));
        text.push_str(terminator);
    }
    text
}
