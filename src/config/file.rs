//! TOML configuration file loading
//!
//! Supports `vitae.toml` in the working directory and
//! `~/.config/vitae/config.toml` as persistent config sources. Scalar fields
//! are optional overlays on top of defaults; the `[[persons]]` table is the
//! authoritative person set.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VitaeConfigFile {
    /// Number of fragments retrieved per agent
    pub top_k: Option<usize>,

    /// Vector index configuration
    #[serde(default)]
    pub pinecone: PineconeFileConfig,

    /// Embedding API configuration
    #[serde(default)]
    pub embedding: EmbeddingFileConfig,

    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Tracked persons, in routing order
    #[serde(default)]
    pub persons: Vec<PersonEntry>,
}

/// Pinecone index configuration
#[derive(Debug, Default, Deserialize)]
pub struct PineconeFileConfig {
    /// Index name (e.g. "cv-multi-index")
    pub index_name: Option<String>,

    /// Serverless cloud provider (e.g. "aws")
    pub cloud: Option<String>,

    /// Serverless region (e.g. "us-east-1")
    pub region: Option<String>,
}

/// Embedding API configuration
#[derive(Debug, Default, Deserialize)]
pub struct EmbeddingFileConfig {
    /// OpenAI-compatible base URL (e.g. `http://localhost:8080/v1`)
    pub base_url: Option<String>,

    /// Embedding model identifier
    pub model: Option<String>,

    /// Output vector dimension
    pub dimension: Option<usize>,
}

/// LLM configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "llama-3.1-8b-instant")
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f32>,
}

/// One tracked person as declared in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct PersonEntry {
    /// Unique identifier, also the metadata filter value in the index
    pub id: String,

    /// Display name used in prompts and evidence listings
    pub name: String,

    /// Path to the person's CV text file (for ingestion)
    pub cv_path: PathBuf,

    /// Aliases matched against questions, in match-priority order
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Whether this person answers questions that mention nobody
    #[serde(default)]
    pub is_default: bool,
}

/// Load the TOML config file.
///
/// An explicit path must exist and parse; the default search
/// (`vitae.toml`, then `~/.config/vitae/config.toml`) falls back to
/// `VitaeConfigFile::default()` when no file is found.
///
/// # Errors
///
/// Returns an error if an explicitly given path is missing or unparsable,
/// or if a discovered file fails to parse.
pub fn load_config_file(path_override: Option<&Path>) -> Result<VitaeConfigFile> {
    if let Some(path) = path_override {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        return parse_config_file(path);
    }

    let Some(path) = config_file_path() else {
        return Ok(VitaeConfigFile::default());
    };

    if !path.exists() {
        return Ok(VitaeConfigFile::default());
    }

    parse_config_file(&path)
}

fn parse_config_file(path: &Path) -> Result<VitaeConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config: VitaeConfigFile = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), persons = config.persons.len(), "loaded config file");
    Ok(config)
}

/// Return the first existing config path: `./vitae.toml`, then
/// `~/.config/vitae/config.toml`. Returns the XDG path when neither exists.
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    let local = PathBuf::from("vitae.toml");
    if local.exists() {
        return Some(local);
    }

    directories::BaseDirs::new().map(|d| d.config_dir().join("vitae").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_parse_full_file() {
        let toml = r#"
top_k = 6

[pinecone]
index_name = "cv-test-index"
cloud = "gcp"
region = "europe-west4"

[embedding]
base_url = "http://localhost:8080/v1"
model = "sentence-transformers/all-MiniLM-L6-v2"
dimension = 384

[llm]
model = "llama-3.1-8b-instant"
temperature = 0.2

[[persons]]
id = "jose"
name = "José Pérez"
cv_path = "data/cv_1.txt"
aliases = ["jose"]
is_default = true

[[persons]]
id = "maria"
name = "Maria Rojas"
cv_path = "data/cv_2.txt"
aliases = ["maria"]
"#;

        let parsed: VitaeConfigFile = toml::from_str(toml).expect("valid toml");
        assert_eq!(parsed.top_k, Some(6));
        assert_eq!(parsed.pinecone.index_name.as_deref(), Some("cv-test-index"));
        assert_eq!(parsed.embedding.dimension, Some(384));
        assert_eq!(parsed.persons.len(), 2);
        assert!(parsed.persons[0].is_default);
        assert!(!parsed.persons[1].is_default);
        assert_eq!(parsed.persons[1].aliases, vec!["maria".to_string()]);
    }

    #[test]
    fn test_missing_sections_default() {
        let parsed: VitaeConfigFile = toml::from_str("top_k = 2").expect("valid toml");
        assert_eq!(parsed.top_k, Some(2));
        assert!(parsed.pinecone.index_name.is_none());
        assert!(parsed.persons.is_empty());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = load_config_file(Some(Path::new("/nonexistent/vitae.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_path_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(b"not [ valid toml").expect("write");

        let result = load_config_file(Some(file.path()));
        assert!(result.is_err());
    }
}
