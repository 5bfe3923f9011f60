//! Configuration management for the vitae engine
//!
//! Values resolve with the priority env > TOML file > default. The person
//! set comes from the config file only and is validated once at load; it is
//! immutable afterwards.

pub mod file;

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default number of fragments retrieved per agent
pub const DEFAULT_TOP_K: usize = 4;

/// Default Pinecone index name
pub const DEFAULT_INDEX_NAME: &str = "cv-multi-index";

/// Vitae engine configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Tracked persons in routing order
    pub persons: Vec<Person>,

    /// Fragments retrieved per agent per question
    pub top_k: usize,

    /// Vector index backend
    pub pinecone: PineconeConfig,

    /// Embedding API
    pub embedding: EmbeddingConfig,

    /// LLM completions API
    pub llm: LlmConfig,
}

/// One tracked person and their routing identity
#[derive(Debug, Clone)]
pub struct Person {
    /// Unique identifier; also the metadata filter value scoping retrieval
    pub id: String,

    /// Display name used in prompts and evidence listings
    pub name: String,

    /// Path to the person's CV text file (ingestion source)
    pub cv_path: PathBuf,

    /// Aliases matched as case-insensitive substrings of the question
    pub aliases: Vec<String>,

    /// Whether this person answers questions that mention nobody
    pub is_default: bool,
}

/// Pinecone connection configuration
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    /// API key (from `PINECONE_API_KEY`)
    pub api_key: String,

    /// Index name
    pub index_name: String,

    /// Serverless cloud provider
    pub cloud: String,

    /// Serverless region
    pub region: String,
}

/// Embedding API configuration
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible base URL (a local inference server works)
    pub base_url: String,

    /// Optional bearer token (from `EMBEDDING_API_KEY`)
    pub api_key: Option<String>,

    /// Embedding model identifier
    pub model: String,

    /// Output vector dimension; must match the index dimension
    pub dimension: usize,
}

/// LLM completions configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (from `GROQ_API_KEY`)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl Config {
    /// Load configuration from env vars and the TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if required credentials are missing, the
    /// person set is empty or malformed, or the config file is unreadable.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(config_path)?;

        let pinecone_api_key = std::env::var("PINECONE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("PINECONE_API_KEY is not set".to_string()))?;

        let groq_api_key = std::env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("GROQ_API_KEY is not set".to_string()))?;

        let pinecone = PineconeConfig {
            api_key: pinecone_api_key,
            index_name: std::env::var("PINECONE_INDEX_NAME")
                .ok()
                .or(fc.pinecone.index_name)
                .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            cloud: std::env::var("PINECONE_CLOUD")
                .ok()
                .or(fc.pinecone.cloud)
                .unwrap_or_else(|| "aws".to_string()),
            region: std::env::var("PINECONE_REGION")
                .ok()
                .or(fc.pinecone.region)
                .unwrap_or_else(|| "us-east-1".to_string()),
        };

        let embedding = EmbeddingConfig {
            base_url: std::env::var("EMBEDDING_BASE_URL")
                .ok()
                .or(fc.embedding.base_url)
                .unwrap_or_else(|| crate::embedding::DEFAULT_BASE_URL.to_string()),
            api_key: std::env::var("EMBEDDING_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("EMBEDDING_MODEL")
                .ok()
                .or(fc.embedding.model)
                .unwrap_or_else(|| crate::embedding::DEFAULT_EMBEDDING_MODEL.to_string()),
            dimension: std::env::var("EMBEDDING_DIMENSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.embedding.dimension)
                .unwrap_or(crate::embedding::DEFAULT_EMBEDDING_DIM),
        };

        let llm = LlmConfig {
            api_key: groq_api_key,
            model: std::env::var("VITAE_LLM_MODEL")
                .ok()
                .or(fc.llm.model)
                .unwrap_or_else(|| crate::generation::DEFAULT_LLM_MODEL.to_string()),
            temperature: fc
                .llm
                .temperature
                .unwrap_or(crate::generation::DEFAULT_TEMPERATURE),
        };

        let top_k = std::env::var("TOP_K")
            .ok()
            .and_then(|s| s.parse().ok())
            .or(fc.top_k)
            .unwrap_or(DEFAULT_TOP_K);

        let persons: Vec<Person> = fc
            .persons
            .into_iter()
            .map(|p| Person {
                id: p.id,
                name: p.name,
                cv_path: p.cv_path,
                aliases: p.aliases,
                is_default: p.is_default,
            })
            .collect();

        let config = Self {
            persons,
            top_k,
            pinecone,
            embedding,
            llm,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` on an empty person set, zero or multiple
    /// default persons, duplicate person ids, or a zero `top_k`.
    pub fn validate(&self) -> Result<()> {
        if self.persons.is_empty() {
            return Err(Error::Config(
                "no persons configured; add [[persons]] entries to the config file".to_string(),
            ));
        }

        let defaults: Vec<&str> = self
            .persons
            .iter()
            .filter(|p| p.is_default)
            .map(|p| p.id.as_str())
            .collect();
        match defaults.as_slice() {
            [_] => {}
            [] => {
                return Err(Error::Config(
                    "no default person; exactly one must set is_default = true".to_string(),
                ));
            }
            many => {
                return Err(Error::Config(format!(
                    "multiple default persons: {}",
                    many.join(", ")
                )));
            }
        }

        for (i, person) in self.persons.iter().enumerate() {
            if person.id.is_empty() {
                return Err(Error::Config(format!("person #{i} has an empty id")));
            }
            if self.persons[..i].iter().any(|p| p.id == person.id) {
                return Err(Error::Config(format!("duplicate person id: {}", person.id)));
            }
            if person.aliases.is_empty() && !person.is_default {
                tracing::warn!(
                    person = %person.id,
                    "person has no aliases and is not the default; unreachable by routing"
                );
            }
        }

        if self.top_k == 0 {
            return Err(Error::Config("top_k must be at least 1".to_string()));
        }

        Ok(())
    }

    /// The person that answers questions mentioning nobody.
    ///
    /// Falls back to the first configured person when none is flagged;
    /// `validate` guarantees a flagged default for loaded configs.
    ///
    /// # Panics
    ///
    /// Panics if the person set is empty.
    #[must_use]
    pub fn default_person(&self) -> &Person {
        self.persons
            .iter()
            .find(|p| p.is_default)
            .unwrap_or(&self.persons[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, is_default: bool) -> Person {
        Person {
            id: id.to_string(),
            name: format!("Person {id}"),
            cv_path: PathBuf::from(format!("data/{id}.txt")),
            aliases: vec![id.to_string()],
            is_default,
        }
    }

    fn base_config(persons: Vec<Person>) -> Config {
        Config {
            persons,
            top_k: 4,
            pinecone: PineconeConfig {
                api_key: "pc-test".to_string(),
                index_name: DEFAULT_INDEX_NAME.to_string(),
                cloud: "aws".to_string(),
                region: "us-east-1".to_string(),
            },
            embedding: EmbeddingConfig {
                base_url: crate::embedding::DEFAULT_BASE_URL.to_string(),
                api_key: None,
                model: crate::embedding::DEFAULT_EMBEDDING_MODEL.to_string(),
                dimension: crate::embedding::DEFAULT_EMBEDDING_DIM,
            },
            llm: LlmConfig {
                api_key: "gsk-test".to_string(),
                model: crate::generation::DEFAULT_LLM_MODEL.to_string(),
                temperature: crate::generation::DEFAULT_TEMPERATURE,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = base_config(vec![person("jose", true), person("maria", false)]);
        assert!(config.validate().is_ok());
        assert_eq!(config.default_person().id, "jose");
    }

    #[test]
    fn test_empty_persons_rejected() {
        let config = base_config(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_default_rejected() {
        let config = base_config(vec![person("jose", false), person("maria", false)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiple_defaults_rejected() {
        let config = base_config(vec![person("jose", true), person("maria", true)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let config = base_config(vec![person("jose", true), person("jose", false)]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = base_config(vec![person("jose", true)]);
        config.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_person_falls_back_to_first() {
        let config = base_config(vec![person("jose", false), person("maria", false)]);
        assert_eq!(config.default_person().id, "jose");
    }
}
