//! Codec layer for byte and record transformations.
//!
//! This module provides the pure, I/O-free primitives the store is built on.
//!
//! # Submodules
//!
//! - [`encoding`][]: Byte-order-mark sniffing, decoding, and encoding
//! - [`line`][]: Single-record name/comment parsing and rendering

pub mod encoding;
pub mod line;
