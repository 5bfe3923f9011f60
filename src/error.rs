//! Error types for the vitae engine

use thiserror::Error;

/// Result type alias for vitae operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the vitae engine
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (fatal at startup, never retried)
    #[error("configuration error: {0}")]
    Config(String),

    /// Vector index error (backend unreachable or rejected the request)
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// LLM inference error
    #[error("generation error: {0}")]
    Generation(String),

    /// Embedding API error
    #[error("embedding error: {0}")]
    Embedding(String),

    /// CV ingestion error (missing or unreadable source file)
    #[error("ingest error: {0}")]
    Ingest(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
