//! # Core Module
//!
//! The stateless foundation of the library: the RNA structure model and the
//! file-format codecs built on it.
//!
//! - **Structure Model** ([`models`]) - molecules, base pairs, secondary and tertiary structures
//! - **File I/O** ([`io`]) - FASTA, Vienna, PDB and RNAML codecs behind one trait
//!
//! Model values are immutable after construction and codecs hold no state
//! between calls, so both can be shared freely across threads.

pub mod io;
pub mod models;
