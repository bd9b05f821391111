//! # RNAkit Core Library
//!
//! A library for representing RNA molecules at the primary, secondary and
//! tertiary level and for reading and writing them in the common structure
//! file formats.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Immutable data models (`Molecule`,
//!   `SecondaryStructure`, `TertiaryStructure`, the `Location` range algebra)
//!   and the FASTA, Vienna, PDB and RNAML codecs.
//!
//! - **[`db`]: Entry Sources.** The contract for retrieving raw entry text by
//!   accession, with directory and in-memory implementations.
//!
//! - **[`workflows`]: The Public API.** Format conversion and fetch-and-parse
//!   procedures that tie the codecs and entry sources together.
//!
//! Errors from every layer convert into the crate-level [`Error`].

pub mod core;
pub mod db;
pub mod error;
pub mod workflows;

pub use error::Error;
