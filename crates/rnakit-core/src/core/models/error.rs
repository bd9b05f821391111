use super::location::Block;
use thiserror::Error;

/// A violated model invariant.
///
/// Every variant carries the residue index (0-based) or the range that
/// triggered the failure so that callers can point at the offending input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Block {new} overlaps existing block {existing}")]
    Overlap { existing: Block, new: Block },

    #[error("Invalid residue index {position} for a sequence of length {length}")]
    InvalidResidue { position: usize, length: usize },

    #[error("Invalid character '{character}' at position {position} (allowed: A, U, G, C, -, _)")]
    InvalidAlphabet { position: usize, character: char },

    #[error("Molecule '{name}' is not an RNA")]
    NotRna { name: String },

    #[error("Base pair ({i}, {j}) pairs a residue with itself")]
    SelfPair { i: usize, j: usize },

    #[error("Base pair ({i}, {j}) is declared more than once")]
    DuplicatePair { i: usize, j: usize },

    #[error("Position {position} is out of range for a sequence of length {length}")]
    OutOfRange { position: usize, length: usize },

    #[error("Position {position} takes part in more than one canonical base pair")]
    ConflictingPair { position: usize },

    #[error("Residue positions must be strictly increasing: {position} follows {previous}")]
    PositionOrder { previous: usize, position: usize },

    #[error("Residue position {position} is beyond the molecule length {length}")]
    UnknownResidue { position: usize, length: usize },

    #[error("Residue {position} declares atom '{atom}' more than once")]
    DuplicateAtom { position: usize, atom: String },

    #[error("Atom '{atom}' of residue {position} has a non-finite coordinate")]
    NonFiniteCoordinate { position: usize, atom: String },

    #[error("Residue {position} is not modeled in the tertiary structure")]
    ResidueNotModeled { position: usize },

    #[error("Atom '{atom}' not found in residue {position}")]
    AtomNotFound { position: usize, atom: String },

    #[error("No residue has been started before adding atom '{atom}'")]
    NoCurrentResidue { atom: String },
}
