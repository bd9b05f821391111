use super::{EntrySource, FetchError, validate_accession};
use crate::core::io::format::Format;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serves entries stored as `<root>/<accession>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file an entry is expected in.
    pub fn entry_path(&self, accession: &str, format: Format) -> PathBuf {
        self.root.join(format!("{accession}.{}", format.extension()))
    }
}

impl EntrySource for DirectorySource {
    fn fetch(&self, accession: &str, format: Format) -> Result<String, FetchError> {
        let accession = validate_accession(accession)?;
        let path = self.entry_path(accession, format);
        debug!(path = %path.display(), "Reading entry.");
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                accession: accession.to_string(),
                format,
            },
            _ => FetchError::Fetch {
                accession: accession.to_string(),
                source: e,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fetch_reads_the_file_named_after_the_accession() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("1EHZ.pdb"), "END\n").unwrap();
        let source = DirectorySource::new(dir.path());

        assert_eq!(source.fetch("1EHZ", Format::Pdb).unwrap(), "END\n");
        assert!(matches!(
            source.fetch("1EHZ", Format::Fasta),
            Err(FetchError::NotFound {
                format: Format::Fasta,
                ..
            })
        ));
    }

    #[test]
    fn unreadable_entries_are_fetch_errors() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("broken.fasta")).unwrap();
        let source = DirectorySource::new(dir.path());
        assert!(matches!(
            source.fetch("broken", Format::Fasta),
            Err(FetchError::Fetch { .. })
        ));
    }

    #[test]
    fn path_like_accessions_are_rejected() {
        let source = DirectorySource::new("/tmp");
        assert!(matches!(
            source.fetch("../secret", Format::Pdb),
            Err(FetchError::InvalidAccession { .. })
        ));
    }
}
