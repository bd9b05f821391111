use super::config::CodecConfig;
use super::error::{CapabilityError, FormatError};
use super::fasta::FastaFormat;
use super::pdb::PdbFormat;
use super::rnaml::{RnamlEntry, RnamlFormat};
use super::traits::StructureFormat;
use super::vienna::ViennaFormat;
use crate::core::models::molecule::Molecule;
use crate::core::models::secondary::SecondaryStructure;
use crate::core::models::tertiary::TertiaryStructure;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown format '{0}'")]
pub struct UnknownFormat(pub String);

/// Tag selecting one of the supported codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Fasta,
    Vienna,
    Pdb,
    Rnaml,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Fasta, Format::Vienna, Format::Pdb, Format::Rnaml];

    pub fn name(&self) -> &'static str {
        match self {
            Format::Fasta => FastaFormat::NAME,
            Format::Vienna => ViennaFormat::NAME,
            Format::Pdb => PdbFormat::NAME,
            Format::Rnaml => RnamlFormat::NAME,
        }
    }

    /// Preferred file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Fasta => "fasta",
            Format::Vienna => "vienna",
            Format::Pdb => "pdb",
            Format::Rnaml => "rnaml",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Format> {
        match extension.to_ascii_lowercase().as_str() {
            "fasta" | "fa" | "fna" | "fas" => Some(Format::Fasta),
            "vienna" | "dbn" | "db" => Some(Format::Vienna),
            "pdb" | "ent" => Some(Format::Pdb),
            "rnaml" | "xml" => Some(Format::Rnaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(name))
            .or_else(|| Format::from_extension(name))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed document of any supported format.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Sequences(Vec<Molecule>),
    Secondary(Vec<SecondaryStructure>),
    Tertiary(Vec<TertiaryStructure>),
    Rnaml(Vec<RnamlEntry>),
}

impl Document {
    pub fn parse_as(format: Format, text: &str, config: &CodecConfig) -> Result<Self, FormatError> {
        Ok(match format {
            Format::Fasta => Document::Sequences(FastaFormat::new(&config.fasta).parse(text)?),
            Format::Vienna => Document::Secondary(ViennaFormat.parse(text)?),
            Format::Pdb => Document::Tertiary(PdbFormat::new(config.pdb.clone()).parse(text)?),
            Format::Rnaml => Document::Rnaml(RnamlFormat.parse(text)?),
        })
    }

    /// Serializes with the codec the document belongs to.
    pub fn serialize(&self, config: &CodecConfig) -> Result<String, CapabilityError> {
        match self {
            Document::Sequences(molecules) => FastaFormat::new(&config.fasta).serialize(molecules),
            Document::Secondary(structures) => ViennaFormat.serialize(structures),
            Document::Tertiary(structures) => PdbFormat::new(config.pdb.clone()).serialize(structures),
            Document::Rnaml(entries) => RnamlFormat.serialize(entries),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Document::Sequences(_) => Format::Fasta,
            Document::Secondary(_) => Format::Vienna,
            Document::Tertiary(_) => Format::Pdb,
            Document::Rnaml(_) => Format::Rnaml,
        }
    }

    /// Number of records (molecules, structures or chains).
    pub fn len(&self) -> usize {
        match self {
            Document::Sequences(items) => items.len(),
            Document::Secondary(items) => items.len(),
            Document::Tertiary(items) => items.len(),
            Document::Rnaml(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
