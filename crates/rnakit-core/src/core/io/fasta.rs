use super::config::FastaConfig;
use super::error::{CapabilityError, FormatError};
use super::traits::StructureFormat;
use crate::core::models::molecule::Molecule;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Splits a `>` header into the molecule name (first token) and organism
/// (the rest of the line).
pub(crate) fn split_header(header: &str) -> (&str, &str) {
    let header = header.trim();
    match header.split_once(char::is_whitespace) {
        Some((name, organism)) => (name, organism.trim()),
        None => (header, ""),
    }
}

/// Renders the `>` header of `molecule`, without the leading `>`.
///
/// # Errors
///
/// Fails with [`CapabilityError::UnrepresentableHeader`] when
/// [`split_header`] would not give back the same name and organism: a name
/// containing whitespace, an organism without a name, or an organism with
/// surrounding whitespace or line breaks.
pub(crate) fn header_for(format: &'static str, molecule: &Molecule) -> Result<String, CapabilityError> {
    let (name, organism) = (molecule.name(), molecule.organism());
    let representable = !name.contains(char::is_whitespace)
        && (organism.is_empty()
            || (!name.is_empty() && organism.trim() == organism && !organism.contains(['\n', '\r'])));
    if !representable {
        return Err(CapabilityError::UnrepresentableHeader {
            format,
            name: name.to_string(),
            organism: organism.to_string(),
        });
    }
    Ok(if organism.is_empty() {
        name.to_string()
    } else {
        format!("{name} {organism}")
    })
}

struct Record {
    line: usize,
    header: String,
    sequence: String,
}

impl Record {
    fn finish(self) -> Result<Molecule, FormatError> {
        let (name, organism) = split_header(&self.header);
        if self.sequence.is_empty() {
            return Err(FormatError::EmptyRecord {
                format: FastaFormat::NAME,
                line: self.line,
                name: name.to_string(),
            });
        }
        Molecule::rna(name, organism, &self.sequence, BTreeMap::new()).map_err(|source| {
            FormatError::Model {
                line: self.line,
                source,
            }
        })
    }
}

/// FASTA codec: `>name organism` header lines followed by wrapped sequence
/// lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaFormat {
    line_width: usize,
}

impl Default for FastaFormat {
    fn default() -> Self {
        Self::new(&FastaConfig::default())
    }
}

impl FastaFormat {
    pub fn new(config: &FastaConfig) -> Self {
        Self {
            line_width: config.line_width,
        }
    }

    /// Characters per sequence line; 0 keeps each sequence on one line.
    pub fn with_line_width(line_width: usize) -> Self {
        Self { line_width }
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }
}

impl StructureFormat for FastaFormat {
    type Model = Vec<Molecule>;
    const NAME: &'static str = "FASTA";

    /// Parses every record into an RNA molecule.
    ///
    /// Sequence lines are concatenated with whitespace removed; blank lines
    /// are ignored.
    #[instrument(skip_all, name = "fasta_parse")]
    fn parse(&self, text: &str) -> Result<Self::Model, FormatError> {
        let mut molecules = Vec::new();
        let mut current: Option<Record> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('>') {
                if let Some(record) = current.take() {
                    molecules.push(record.finish()?);
                }
                current = Some(Record {
                    line: line_num,
                    header: header.to_string(),
                    sequence: String::new(),
                });
                continue;
            }

            match current.as_mut() {
                Some(record) => record
                    .sequence
                    .extend(trimmed.chars().filter(|c| !c.is_whitespace())),
                None => {
                    return Err(FormatError::MalformedHeader {
                        format: Self::NAME,
                        line: line_num,
                    });
                }
            }
        }
        if let Some(record) = current {
            molecules.push(record.finish()?);
        }

        debug!(records = molecules.len(), "Parsed FASTA data.");
        Ok(molecules)
    }

    #[instrument(skip_all, name = "fasta_serialize")]
    fn serialize(&self, model: &Self::Model) -> Result<String, CapabilityError> {
        let mut out = String::new();
        for molecule in model {
            if molecule.is_empty() {
                return Err(CapabilityError::EmptySequence {
                    format: Self::NAME,
                    name: molecule.name().to_string(),
                });
            }
            out.push('>');
            out.push_str(&header_for(Self::NAME, molecule)?);
            out.push('\n');

            if self.line_width == 0 {
                out.push_str(molecule.sequence());
                out.push('\n');
            } else {
                let residues: Vec<char> = molecule.sequence().chars().collect();
                for chunk in residues.chunks(self.line_width) {
                    out.extend(chunk);
                    out.push('\n');
                }
            }
        }
        Ok(out)
    }
}
