//! Per-record dialect classification and whole-file resolution.
//!
//! The two dialects only differ for multi-line comments, and each leaves a
//! distinct fingerprint:
//!
//! | Fingerprint                                   | Dialect          |
//! |-----------------------------------------------|------------------|
//! | record ends with the EOT marker               | Total Commander  |
//! | NO-BREAK SPACE present, no literal `\n`       | Double Commander |
//! | neither                                       | (Total Commander parsing, no evidence) |
//!
//! The EOT marker is passed in as decoded text, because legacy code pages
//! decode its `C2` byte to different characters. Classification is
//! line-local and never backtracks.

use log::{trace, warn};

use crate::descript::codec::line::{ESCAPED_LINE_BREAK, NO_BREAK_SPACE};
use crate::descript::types::models::Dialect;

/// Outcome of classifying one physical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    /// The dialect the record proves, if it carries a fingerprint.
    pub evidence: Option<Dialect>,
    /// The record with any EOT marker removed, ready for parsing.
    pub body: &'a str,
}

impl Classified<'_> {
    /// The dialect to parse this record with when nothing was requested.
    pub fn parse_dialect(&self) -> Dialect {
        self.evidence.unwrap_or(Dialect::TotalCommander)
    }
}

/// Classifies a record with no prior knowledge of the file.
///
/// `eot_marker` is the EOT marker as the file's encoding decodes it.
pub fn classify<'a>(line: &'a str, eot_marker: &str) -> Classified<'a> {
    if let Some(body) = line.strip_suffix(eot_marker) {
        trace!("EOT marker found, record is Total Commander");
        return Classified {
            evidence: Some(Dialect::TotalCommander),
            body,
        };
    }

    if line.contains(NO_BREAK_SPACE) && !line.contains(ESCAPED_LINE_BREAK) {
        trace!("NO-BREAK SPACE found, record is Double Commander");
        return Classified {
            evidence: Some(Dialect::DoubleCommander),
            body: line,
        };
    }

    Classified {
        evidence: None,
        body: line,
    }
}

/// Folds per-record evidence into the file-level dialect.
///
/// The last record with evidence wins. With no evidence at all the file is
/// Total Commander, under which plain single-line files are equally valid.
#[derive(Debug, Default)]
pub struct DialectResolver {
    last: Option<Dialect>,
    saw_total_commander: bool,
    saw_double_commander: bool,
}

impl DialectResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, evidence: Option<Dialect>) {
        let Some(dialect) = evidence else {
            return;
        };
        match dialect {
            Dialect::TotalCommander => self.saw_total_commander = true,
            Dialect::DoubleCommander => self.saw_double_commander = true,
        }
        self.last = Some(dialect);
    }

    /// Whether records of both dialects were seen.
    pub fn is_mixed(&self) -> bool {
        self.saw_total_commander && self.saw_double_commander
    }

    pub fn resolve(&self) -> Dialect {
        if self.is_mixed() {
            warn!(
                "File mixes Total Commander and Double Commander records; using the last one seen ({})",
                self.last.unwrap_or_default()
            );
        }
        self.last.unwrap_or_default()
    }
}
