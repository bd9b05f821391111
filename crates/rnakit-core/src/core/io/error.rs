use crate::core::models::error::ValidationError;
use thiserror::Error;

/// Malformed input text or XML.
///
/// Line numbers are 1-based; bracket positions are 0-based sequence indices.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormatError {
    #[error("{format} line {line}: sequence data found before any '>' header")]
    MalformedHeader { format: &'static str, line: usize },

    #[error("{format} record '{name}' starting at line {line} has no sequence")]
    EmptyRecord {
        format: &'static str,
        line: usize,
        name: String,
    },

    #[error("Unbalanced '{bracket}' at position {position} (line {line})")]
    UnbalancedBrackets {
        line: usize,
        position: usize,
        bracket: char,
    },

    #[error("Line {line}: sequence has {sequence} positions but the bracket notation has {brackets}")]
    LengthMismatch {
        line: usize,
        sequence: usize,
        brackets: usize,
    },

    #[error("Line {line}, column {column}: unexpected character '{character}'")]
    UnexpectedCharacter {
        line: usize,
        column: usize,
        character: char,
    },

    #[error("Line {line}: invalid {field} in columns {columns} (value: '{value}')")]
    RecordFormat {
        line: usize,
        field: &'static str,
        columns: &'static str,
        value: String,
    },

    #[error("Malformed XML at line {line}: {details}")]
    Xml { line: usize, details: String },

    #[error("RNAML schema violation in <{element}> at line {line}: {details}")]
    Schema {
        line: usize,
        element: String,
        details: String,
    },

    #[error("Line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: ValidationError,
    },
}

/// A model that the target format cannot express.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    #[error(
        "Vienna notation cannot express crossing pairs {first:?} and {second:?}"
    )]
    NonNestedStructure {
        first: (usize, usize),
        second: (usize, usize),
    },

    #[error("Vienna notation cannot express non-canonical pair ({i}, {j})")]
    NonCanonicalPair { i: usize, j: usize },

    #[error("{format} cannot express the empty sequence of '{name}'")]
    EmptySequence { format: &'static str, name: String },

    #[error("{format} {field} '{value}' of residue {position} does not fit in {width} columns")]
    FieldOverflow {
        format: &'static str,
        field: &'static str,
        value: String,
        width: usize,
        position: usize,
    },

    #[error("{format} header cannot carry name '{name}' with organism '{organism}'")]
    UnrepresentableHeader {
        format: &'static str,
        name: String,
        organism: String,
    },

    #[error("{format} cannot write chain '{chain_id}' twice")]
    DuplicateChain { format: &'static str, chain_id: char },

    #[error("{format} cannot write coordinates for the gap at position {position}")]
    GapResidue { format: &'static str, position: usize },

    #[error("{format} can only write one title per document, found '{first}' and '{second}'")]
    ConflictingTitles {
        format: &'static str,
        first: String,
        second: String,
    },

    #[error("{format} title does not fit in its records: {details}")]
    TitleOverflow {
        format: &'static str,
        details: String,
    },

    #[error("'{name}' carries no {structure} structure to write as {format}")]
    MissingStructure {
        format: &'static str,
        structure: &'static str,
        name: String,
    },

    #[error("Cannot convert a {from} document into {to}")]
    Unsupported {
        from: &'static str,
        to: &'static str,
    },
}
