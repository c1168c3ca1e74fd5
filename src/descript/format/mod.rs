//! File format layer for descript.ion text.
//!
//! This module bridges decoded text and the high-level
//! [`DescriptionStore`](crate::descript::store::DescriptionStore).
//!
//! # Module Organization
//!
//! - [`dialect`]: Classifies records and resolves the file-level dialect
//! - [`document`]: Splits text into records, parses and renders whole files
//!
//! # Architecture
//!
//! ```text
//! bytes ──sniff/decode──▶ text ──records()──▶ record ──classify()──▶ (evidence, body)
//!                                                                        │
//!                                              CommentMap ◀──parse_line()┘
//! ```

pub mod dialect;
pub mod document;
