//! # Workflows Module
//!
//! High-level procedures built from the codecs and entry sources.
//!
//! - **Conversion** ([`convert`]) - parse a document in one format, project it
//!   onto the model another format expresses, and serialize it; optionally
//!   fetching the input from an [`EntrySource`](crate::db::EntrySource) first.

pub mod convert;
