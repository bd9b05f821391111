use crate::core::io::config::CodecConfig;
use crate::core::io::error::CapabilityError;
use crate::core::io::format::{Document, Format};
use crate::core::io::rnaml::RnamlEntry;
use crate::db::EntrySource;
use crate::error::Error;
use std::sync::Arc;
use tracing::{debug, info, instrument};

fn missing_structure(target: Format, structure: &'static str, entry: &RnamlEntry) -> CapabilityError {
    CapabilityError::MissingStructure {
        format: target.name(),
        structure,
        name: entry.molecule.name().to_string(),
    }
}

/// Re-expresses `document` as the model written by `target`.
///
/// Every document projects onto its sequences (FASTA), secondary and
/// tertiary structures wrap into RNAML entries, and RNAML entries unwrap
/// into the structure level they carry.
///
/// # Errors
///
/// Returns [`CapabilityError::MissingStructure`] if an RNAML entry lacks the
/// requested structure level and [`CapabilityError::Unsupported`] when the
/// target model cannot be derived at all (for example sequences to PDB).
pub fn project(document: Document, target: Format) -> Result<Document, CapabilityError> {
    if document.format() == target {
        return Ok(document);
    }
    let source = document.format();

    let projected = match (document, target) {
        (Document::Secondary(structures), Format::Fasta) => Document::Sequences(
            structures.iter().map(|s| s.rna().as_ref().clone()).collect(),
        ),
        (Document::Tertiary(structures), Format::Fasta) => Document::Sequences(
            structures
                .iter()
                .map(|s| s.molecule().as_ref().clone())
                .collect(),
        ),
        (Document::Rnaml(entries), Format::Fasta) => Document::Sequences(
            entries.iter().map(|e| e.molecule.as_ref().clone()).collect(),
        ),
        (Document::Sequences(molecules), Format::Rnaml) => Document::Rnaml(
            molecules
                .into_iter()
                .map(|m| RnamlEntry::new(Arc::new(m)))
                .collect(),
        ),
        (Document::Secondary(structures), Format::Rnaml) => Document::Rnaml(
            structures.into_iter().map(RnamlEntry::from_secondary).collect(),
        ),
        (Document::Tertiary(structures), Format::Rnaml) => Document::Rnaml(
            structures.into_iter().map(RnamlEntry::from_tertiary).collect(),
        ),
        (Document::Rnaml(entries), Format::Vienna) => Document::Secondary(
            entries
                .into_iter()
                .map(|entry| match entry.secondary {
                    Some(secondary) => Ok(secondary),
                    None => Err(missing_structure(target, "secondary", &entry)),
                })
                .collect::<Result<_, _>>()?,
        ),
        (Document::Rnaml(entries), Format::Pdb) => Document::Tertiary(
            entries
                .into_iter()
                .map(|entry| match entry.tertiary {
                    Some(tertiary) => Ok(tertiary),
                    None => Err(missing_structure(target, "tertiary", &entry)),
                })
                .collect::<Result<_, _>>()?,
        ),
        _ => {
            return Err(CapabilityError::Unsupported {
                from: source.name(),
                to: target.name(),
            });
        }
    };
    debug!(from = %source, to = %target, records = projected.len(), "Projected document.");
    Ok(projected)
}

/// Converts `text` from one format to another.
#[instrument(skip_all, name = "convert_workflow", fields(from = %from, to = %to))]
pub fn convert(text: &str, from: Format, to: Format, config: &CodecConfig) -> Result<String, Error> {
    let document = Document::parse_as(from, text, config)?;
    info!(records = document.len(), "Parsed input document.");
    let output = project(document, to)?.serialize(config)?;
    Ok(output)
}

/// Fetches `accession` from `source` and parses it as `format`.
#[instrument(skip_all, name = "fetch_workflow", fields(accession = accession, format = %format))]
pub fn fetch_document(
    source: &impl EntrySource,
    accession: &str,
    format: Format,
    config: &CodecConfig,
) -> Result<Document, Error> {
    let text = source.fetch(accession, format)?;
    let document = Document::parse_as(format, &text, config)?;
    info!(records = document.len(), "Fetched and parsed entry.");
    Ok(document)
}
