use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Residues skipped by the PDB reader: solvent, ions and common ligands.
///
/// `UNK` is read as an unknown residue (`_`) rather than skipped.
pub const DEFAULT_IGNORED_RESIDUES: [&str; 16] = [
    "HOH", "MG", "K", "NA", "SR", "CL", "CD", "MN", "ZN", "CA", "SO4", "FMN", "PRF", "OHX",
    "AMO", "ACA",
];

/// Widest accepted FASTA line; 0 still means unwrapped.
pub const MAX_LINE_WIDTH: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Settings for every codec, loadable from a TOML file:
///
/// ```toml
/// [fasta]
/// line_width = 80
///
/// [pdb]
/// ignored_residues = ["HOH", "MG"]
/// legacy_atom_names = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub fasta: FastaConfig,
    pub pdb: PdbConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FastaConfig {
    /// Sequence characters per line; 0 writes each sequence on one line.
    pub line_width: usize,
}

impl Default for FastaConfig {
    fn default() -> Self {
        Self { line_width: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdbConfig {
    /// Residue names whose ATOM/HETATM records are skipped.
    pub ignored_residues: Vec<String>,
    /// Rewrites `*` as `'` in atom names (`C1*` -> `C1'`).
    pub legacy_atom_names: bool,
    /// Stops reading at the end of the first MODEL.
    pub first_model_only: bool,
}

impl Default for PdbConfig {
    fn default() -> Self {
        Self {
            ignored_residues: DEFAULT_IGNORED_RESIDUES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            legacy_atom_names: true,
            first_model_only: true,
        }
    }
}

impl PdbConfig {
    pub fn is_ignored(&self, residue_name: &str) -> bool {
        self.ignored_residues
            .iter()
            .any(|name| name.eq_ignore_ascii_case(residue_name))
    }
}

impl CodecConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Toml {
            path: "<string>".to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fasta.line_width > MAX_LINE_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "FASTA line width {} exceeds {MAX_LINE_WIDTH}",
                self.fasta.line_width
            )));
        }
        if let Some(name) = self
            .pdb
            .ignored_residues
            .iter()
            .find(|name| name.trim().is_empty() || name.len() > 3)
        {
            return Err(ConfigError::Invalid(format!(
                "ignored residue name '{name}' must be 1 to 3 characters long"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = CodecConfig::default();
        assert_eq!(config.fasta.line_width, 60);
        assert!(config.pdb.legacy_atom_names);
        assert!(config.pdb.first_model_only);
        assert!(config.pdb.is_ignored("HOH"));
        assert!(config.pdb.is_ignored("mg"));
        assert!(!config.pdb.is_ignored("A"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = CodecConfig::from_toml_str("[fasta]\nline_width = 80\n").unwrap();
        assert_eq!(config.fasta.line_width, 80);
        assert_eq!(config.pdb, PdbConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = CodecConfig::from_toml_str("[fasta]\nwidth = 80\n");
        assert!(matches!(result, Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn line_width_is_validated_at_load() {
        assert_eq!(
            CodecConfig::from_toml_str("[fasta]\nline_width = 0\n")
                .unwrap()
                .fasta
                .line_width,
            0
        );
        assert!(matches!(
            CodecConfig::from_toml_str("[fasta]\nline_width = -1\n"),
            Err(ConfigError::Toml { .. })
        ));
        assert!(matches!(
            CodecConfig::from_toml_str("[fasta]\nline_width = 100000\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn unknown_residues_are_not_ignored_by_default() {
        assert!(!PdbConfig::default().is_ignored("UNK"));
    }

    #[test]
    fn overlong_ignored_residue_names_are_invalid() {
        let result = CodecConfig::from_toml_str("[pdb]\nignored_residues = [\"WATER\"]\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reads_a_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[pdb]\nignored_residues = [\"HOH\"]\nlegacy_atom_names = false\n"
        )
        .unwrap();
        let config = CodecConfig::load(file.path()).unwrap();
        assert_eq!(config.pdb.ignored_residues, vec!["HOH".to_string()]);
        assert!(!config.pdb.legacy_atom_names);
        assert_eq!(config.fasta, FastaConfig::default());
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let result = CodecConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
