//! # descript-ion
//!
//! A reader and writer for `descript.ion` files, the per-directory sidecars
//! file managers use to attach comments to file and folder names.
//!
//! Both multi-line dialects are supported (Total Commander's escaped `\n` with
//! an EOT trailer, and Double Commander's NO-BREAK SPACE), as are UTF-8,
//! UTF-16LE/BE (with byte-order mark) and legacy single-byte encodings.
pub mod descript;

// Re-export the main types for convenience
pub use descript::{
    facade::{read_comment, remove_comment, write_comment},
    fs::{FileSystem, LocalFileSystem, MemoryFileSystem},
    mapping::{CommentMap, natural_name_order},
    options::{DEFAULT_FILE_NAME, StoreOptions},
    parse_encoding,
    store::DescriptionStore,
    types::{
        error::{DescriptError, Result},
        models::{Dialect, DialectMode, Entry, LineTerminator, TextEncoding},
    },
};
