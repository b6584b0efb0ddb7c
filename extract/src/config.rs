//! Generator configuration.
//!
//! Defines the YAML-serializable configuration that controls which types
//! are extracted, where source is read from, and where schemas are written.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! types:
//!   - Bar
//!   - Repo
//! sources:
//!   - src
//! recursive: true
//! output_dir: schemas
//! format: json
//! require_docs: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::extractor::ExtractOptions;
use crate::output::OutputFormat;

/// Top-level generator configuration.
///
/// Loaded from a YAML file (typically `type2cli.yml` next to the crate
/// manifest) to drive repeatable extraction runs.
///
/// # Examples
///
/// ```
/// use type2cli_extract::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("types: [Bar]").unwrap();
/// assert_eq!(config.types, vec!["Bar".to_string()]);
/// assert_eq!(config.sources, vec![std::path::PathBuf::from(".")]);
/// assert!(!config.require_docs);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Configuration format version (e.g., `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    /// Type names to extract schemas for.
    pub types: Vec<String>,
    /// Source files and directories to scan.
    #[serde(default = "default_sources")]
    pub sources: Vec<PathBuf>,
    /// Descend into subdirectories of source directories.
    #[serde(default)]
    pub recursive: bool,
    /// Also consider methods of trait impls.
    #[serde(default)]
    pub include_trait_impls: bool,
    /// Only consider `pub` functions.
    #[serde(default)]
    pub public_only: bool,
    /// Directory for per-type schema files; stdout when absent.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Output format for schema files.
    #[serde(default)]
    pub format: OutputFormat,
    /// Fail when any exposed operation lacks documentation.
    #[serde(default)]
    pub require_docs: bool,
    /// Recorded in each schema; runtimes print the receiver after
    /// operations that print nothing.
    #[serde(default = "default_receiver_print")]
    pub receiver_print: bool,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_receiver_print() -> bool {
    true
}

fn default_sources() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

impl GeneratorConfig {
    /// Creates a configuration for `types` scanning the current directory.
    pub fn new(types: Vec<String>) -> Self {
        Self {
            version: default_version(),
            types,
            sources: default_sources(),
            recursive: false,
            include_trait_impls: false,
            public_only: false,
            output_dir: None,
            format: OutputFormat::default(),
            require_docs: false,
            receiver_print: true,
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// Relative `sources` and `output_dir` are resolved against the
    /// directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be read,
    /// [`ExtractError::Yaml`] if parsing fails, or
    /// [`ExtractError::InvalidInput`] if no types are listed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ExtractError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if config.types.iter().all(|t| t.trim().is_empty()) {
            return Err(ExtractError::InvalidInput(format!(
                "config '{}' lists no types",
                path.display()
            )));
        }

        if let Some(base) = path.parent() {
            config.sources = config
                .sources
                .into_iter()
                .map(|s| if s.is_relative() { base.join(s) } else { s })
                .collect();
            config.output_dir = config
                .output_dir
                .map(|d| if d.is_relative() { base.join(d) } else { d });
        }

        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| ExtractError::io(path, e))?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Extraction options derived from this configuration.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            include_trait_impls: self.include_trait_impls,
            public_only: self.public_only,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type2cli.yml");
        std::fs::write(
            &path,
            "types: [Bar]\nsources: [src]\noutput_dir: schemas\nformat: yaml\nrequire_docs: true\n",
        )
        .unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.sources, vec![dir.path().join("src")]);
        assert_eq!(config.output_dir, Some(dir.path().join("schemas")));
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(config.require_docs);
        assert!(config.receiver_print);
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_load_receiver_print_off() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type2cli.yml");
        std::fs::write(&path, "types: [Bar]\nreceiver_print: false\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert!(!config.receiver_print);
    }

    #[test]
    fn test_load_rejects_empty_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type2cli.yml");
        std::fs::write(&path, "types: []\n").unwrap();

        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidInput(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("type2cli.yml");
        let mut config = GeneratorConfig::new(vec!["Bar".to_string()]);
        config.sources = vec![dir.path().to_path_buf()];
        config.public_only = true;
        config.save(&path).unwrap();

        let loaded = GeneratorConfig::load(&path).unwrap();
        assert_eq!(loaded.types, vec!["Bar"]);
        assert_eq!(loaded.sources, vec![dir.path().to_path_buf()]);
        assert!(loaded.extract_options().public_only);
    }
}
