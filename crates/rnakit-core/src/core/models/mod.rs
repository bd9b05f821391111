//! # Models Module
//!
//! In-memory representation of RNA structure at three levels:
//!
//! - **Primary** ([`molecule`]) - named sequences with modified-residue annotations
//! - **Secondary** ([`base_pair`], [`secondary`]) - Leontis-Westhof base pairs, helices, pseudoknots
//! - **Tertiary** ([`atom`], [`residue`], [`tertiary`]) - per-residue atomic coordinates
//!
//! Residue ranges are expressed with the range algebra in [`location`].
//!
//! All model values are immutable once built. Structures share their molecule
//! through an `Arc`, and incremental construction goes through builders that
//! validate once, at `build()`.
//!
//! ```ignore
//! use rnakit::core::models::{molecule::Molecule, secondary::SecondaryStructureBuilder};
//!
//! let rna = Arc::new(Molecule::rna("hairpin", "", "GGGAAACCC", BTreeMap::new())?);
//! let mut builder = SecondaryStructureBuilder::new(rna);
//! builder.add_canonical(0, 8).add_canonical(1, 7).add_canonical(2, 6);
//! let ss = builder.build()?;
//! assert_eq!(ss.helices().len(), 1);
//! ```

pub mod atom;
pub mod base_pair;
pub mod error;
pub mod location;
pub mod modified;
pub mod molecule;
pub mod residue;
pub mod secondary;
pub mod tertiary;
