//! Core descript.ion codec and store.
//!
//! # Module Organization
//!
//! - [`types`]: Entries, dialects, encodings and the error type
//! - [`codec`]: Byte-order-mark sniffing and single-record parse/render
//! - [`format`]: Dialect detection and whole-file parse/render
//! - [`mapping`]: The ordered, case-insensitive comment map
//! - [`store`]: Load/save orchestration for one directory
//! - [`facade`]: Path-level one-call helpers

pub mod codec;
pub mod facade;
pub mod format;
pub mod fs;
pub mod mapping;
pub mod options;
pub mod store;
pub mod types;
mod utils;

pub use utils::parse_encoding;
