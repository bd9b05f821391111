//! Provides input/output for RNA structure file formats.
//!
//! Every format implements [`traits::StructureFormat`], a pure
//! `parse`/`serialize` pair plus stream and file helpers. [`format`] selects a
//! codec at runtime from a [`format::Format`] tag, and [`config`] holds the
//! TOML-loadable codec settings.
//!
//! | Format | Codec | Model |
//! |--------|-------|-------|
//! | FASTA  | [`fasta::FastaFormat`] | `Vec<Molecule>` |
//! | Vienna | [`vienna::ViennaFormat`] | `Vec<SecondaryStructure>` |
//! | PDB    | [`pdb::PdbFormat`] | `Vec<TertiaryStructure>` |
//! | RNAML  | [`rnaml::RnamlFormat`] | `Vec<RnamlEntry>` |

pub mod config;
pub mod error;
pub mod fasta;
pub mod format;
pub mod pdb;
pub mod rnaml;
pub mod traits;
pub mod vienna;
pub(crate) mod xml;
