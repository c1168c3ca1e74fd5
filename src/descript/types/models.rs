//! Core data structures for descript.ion content.
//!
//! This module defines the fundamental types used throughout the library:
//! - Entries (name → comment pairs)
//! - Dialect and dialect request modes
//! - Text encodings and line terminators used on save

use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;
use super::error::{DescriptError, Result};

/// A single name → comment pair.
///
/// `comment` is always held in canonical form: line breaks are a single `\n`,
/// whichever dialect produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub comment: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }

    /// Whether the comment spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.comment.contains('\n')
    }
}

/// The two incompatible multi-line comment encodings found in the wild.
///
/// - `TotalCommander`: line breaks written as a literal `\n`, record closed by
///   the EOT marker (`U+0004 U+00C2`).
/// - `DoubleCommander`: line breaks written as NO-BREAK SPACE, no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    TotalCommander,
    DoubleCommander,
}

impl Dialect {
    pub fn short_name(&self) -> &'static str {
        match self {
            Dialect::TotalCommander => "tc",
            Dialect::DoubleCommander => "dc",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Dialect::TotalCommander => write!(f, "Total Commander"),
            Dialect::DoubleCommander => write!(f, "Double Commander"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DescriptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tc" | "totalcommander" | "total-commander" => Ok(Self::TotalCommander),
            "dc" | "doublecommander" | "double-commander" => Ok(Self::DoubleCommander),
            _ => Err(DescriptError::InvalidArgument(format!("Unknown dialect: {}", s))),
        }
    }
}

/// What the caller asked for when constructing a store.
///
/// `AutoDetect` is a request only: once a load completes, the store holds a
/// concrete [`Dialect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialectMode {
    #[default]
    AutoDetect,
    Fixed(Dialect),
}

impl DialectMode {
    /// The concrete dialect, if one was requested.
    pub fn fixed(&self) -> Option<Dialect> {
        match self {
            DialectMode::AutoDetect => None,
            DialectMode::Fixed(dialect) => Some(*dialect),
        }
    }
}

impl From<Dialect> for DialectMode {
    fn from(dialect: Dialect) -> Self {
        DialectMode::Fixed(dialect)
    }
}

impl FromStr for DialectMode {
    type Err = DescriptError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(DialectMode::AutoDetect);
        }
        s.parse::<Dialect>().map(DialectMode::Fixed)
    }
}

/// The byte-level encoding of a descript.ion file.
///
/// Detected once per load from the byte-order mark and kept for the next save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 with a leading `EF BB BF` marker.
    #[default]
    Utf8Bom,
    /// UTF-16 little-endian with a leading `FF FE` marker.
    Utf16Le,
    /// UTF-16 big-endian with a leading `FE FF` marker.
    Utf16Be,
    /// A legacy single-byte (ANSI-style) encoding, no marker.
    Legacy(&'static Encoding),
}

impl TextEncoding {
    /// The byte-order mark written in front of the content.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            TextEncoding::Utf16Le => &[0xFF, 0xFE],
            TextEncoding::Utf16Be => &[0xFE, 0xFF],
            TextEncoding::Legacy(_) => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "UTF-8 (BOM)",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Legacy(encoding) => encoding.name(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Line terminator used between rendered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// CRLF on Windows, LF elsewhere.
    #[default]
    Platform,
    CrLf,
    Lf,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Platform => {
                if cfg!(windows) {
                    "\r\n"
                } else {
                    "\n"
                }
            }
            LineTerminator::CrLf => "\r\n",
            LineTerminator::Lf => "\n",
        }
    }
}
