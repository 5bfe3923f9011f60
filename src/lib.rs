//! Vitae - multi-agent retrieval engine for CV question answering
//!
//! This library answers natural-language questions about a fixed set of
//! people's CVs. Each person is bound to a retrieval agent scoped to their
//! own CV fragments in a vector index; a router decides which agent(s) a
//! question concerns and fuses their evidence into one grounded LLM request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  CLI (ask / chat)                    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Agent Router                        │
//! │   detect  │  per-person retrieval  │  fusion        │
//! └──────┬──────────────┬──────────────────┬────────────┘
//!        │              │                  │
//! ┌──────▼─────┐ ┌──────▼───────┐ ┌────────▼───────────┐
//! │  Embedding │ │ Vector index │ │  LLM completions   │
//! │    API     │ │  (Pinecone)  │ │      (Groq)        │
//! └────────────┘ └──────────────┘ └────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod embedding;
pub mod error;
pub mod fusion;
pub mod generation;
pub mod index;
pub mod ingest;

pub use agent::{AgentRouter, EntityAgent, EvidenceFragment, detect};
pub use config::{Config, Person};
pub use embedding::{HttpEmbedder, TextEmbedder};
pub use error::{Error, Result};
pub use fusion::{NO_CONTEXT_PLACEHOLDER, PromptPair};
pub use generation::{ChatModel, GroqClient};
pub use index::{MetadataFilter, PineconeIndex, ScoredMatch, VectorIndex, VectorRecord};
