//! Retrieval of raw entry text by accession.
//!
//! The codecs only ever see text; an [`EntrySource`] decides where that text
//! comes from. Two sources are provided: [`directory::DirectorySource`] for
//! entries mirrored on disk and [`memory::MemorySource`] for fixtures and
//! caches. Retry and timeout policies belong to the caller.

pub mod directory;
pub mod memory;

use crate::core::io::format::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The source holds no entry for the accession in the requested format.
    #[error("No {format} entry for accession '{accession}'")]
    NotFound { accession: String, format: Format },

    /// The accession cannot name an entry (empty, or containing path
    /// separators).
    #[error("Invalid accession '{accession}'")]
    InvalidAccession { accession: String },

    /// The entry exists but could not be read.
    #[error("Failed to fetch '{accession}': {source}")]
    Fetch {
        accession: String,
        #[source]
        source: std::io::Error,
    },
}

/// A provider of raw entry text.
pub trait EntrySource {
    /// Returns the text of `accession` encoded as `format`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] if the entry is absent and
    /// [`FetchError::Fetch`] if it exists but cannot be read.
    fn fetch(&self, accession: &str, format: Format) -> Result<String, FetchError>;
}

pub(crate) fn validate_accession(accession: &str) -> Result<&str, FetchError> {
    let trimmed = accession.trim();
    let is_valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !trimmed.starts_with('.');
    if is_valid {
        Ok(trimmed)
    } else {
        Err(FetchError::InvalidAccession {
            accession: accession.to_string(),
        })
    }
}
