use super::error::ValidationError;
use std::collections::BTreeMap;

/// Symbols accepted in an RNA sequence. `-` is a gap, `_` an unknown or
/// missing residue; both occupy a position.
pub const RNA_ALPHABET: [char; 6] = ['A', 'U', 'G', 'C', '-', '_'];

/// Distinguishes alphabet-checked RNA chains from arbitrary molecules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoleculeKind {
    Rna,
    #[default]
    Generic,
}

/// A named linear polymer: the primary structure shared by secondary and
/// tertiary structure models.
///
/// Instances are immutable once built. Structures hold them behind an
/// `Arc`, so one molecule can back several structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molecule {
    name: String,
    organism: String,
    sequence: String,
    length: usize,
    modified_residues: BTreeMap<usize, String>, // position -> modification label (e.g. "PSU")
    kind: MoleculeKind,
}

impl Molecule {
    /// Creates a generic molecule with an unrestricted alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidResidue`] if a key of
    /// `modified_residues` is not an index into `sequence`.
    pub fn new(
        name: impl Into<String>,
        organism: impl Into<String>,
        sequence: impl Into<String>,
        modified_residues: BTreeMap<usize, String>,
    ) -> Result<Self, ValidationError> {
        let sequence = sequence.into();
        let length = sequence.chars().count();
        check_modifications(&modified_residues, length)?;
        Ok(Self {
            name: name.into(),
            organism: organism.into(),
            sequence,
            length,
            modified_residues,
            kind: MoleculeKind::Generic,
        })
    }

    /// Creates an RNA molecule.
    ///
    /// Lowercase letters are upper-cased before the alphabet check.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAlphabet`] for a symbol outside
    /// [`RNA_ALPHABET`] and [`ValidationError::InvalidResidue`] for an out of
    /// range modification.
    pub fn rna(
        name: impl Into<String>,
        organism: impl Into<String>,
        sequence: &str,
        modified_residues: BTreeMap<usize, String>,
    ) -> Result<Self, ValidationError> {
        let sequence: String = sequence.chars().map(|c| c.to_ascii_uppercase()).collect();
        if let Some((position, character)) = sequence
            .chars()
            .enumerate()
            .find(|(_, c)| !RNA_ALPHABET.contains(c))
        {
            return Err(ValidationError::InvalidAlphabet {
                position,
                character,
            });
        }
        let length = sequence.len();
        check_modifications(&modified_residues, length)?;
        Ok(Self {
            name: name.into(),
            organism: organism.into(),
            sequence,
            length,
            modified_residues,
            kind: MoleculeKind::Rna,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn organism(&self) -> &str {
        &self.organism
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn modified_residues(&self) -> &BTreeMap<usize, String> {
        &self.modified_residues
    }

    pub fn kind(&self) -> MoleculeKind {
        self.kind
    }

    pub fn is_rna(&self) -> bool {
        self.kind == MoleculeKind::Rna
    }

    /// Number of positions, gaps and unknown residues included.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn residue(&self, position: usize) -> Option<char> {
        self.sequence.chars().nth(position)
    }

    pub fn modification(&self, position: usize) -> Option<&str> {
        self.modified_residues.get(&position).map(String::as_str)
    }

    /// The base-complement of an RNA sequence (`A`<->`U`, `G`<->`C`);
    /// gaps and unknown residues are kept in place.
    pub fn complement(&self) -> String {
        self.sequence
            .chars()
            .map(|c| match c {
                'A' => 'U',
                'U' => 'A',
                'G' => 'C',
                'C' => 'G',
                other => other,
            })
            .collect()
    }
}

fn check_modifications(
    modified_residues: &BTreeMap<usize, String>,
    length: usize,
) -> Result<(), ValidationError> {
    match modified_residues.keys().next_back() {
        Some(&position) if position >= length => {
            Err(ValidationError::InvalidResidue { position, length })
        }
        _ => Ok(()),
    }
}
