use super::{EntrySource, FetchError, validate_accession};
use crate::core::io::format::Format;
use std::collections::HashMap;

/// Entries held in memory, keyed by accession and format.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<(String, Format), String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, accession: &str, format: Format, text: impl Into<String>) -> &mut Self {
        self.entries
            .insert((accession.trim().to_string(), format), text.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntrySource for MemorySource {
    fn fetch(&self, accession: &str, format: Format) -> Result<String, FetchError> {
        let accession = validate_accession(accession)?;
        self.entries
            .get(&(accession.to_string(), format))
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                accession: accession.to_string(),
                format,
            })
    }
}
