//! Shared test fixtures: a small person set and in-memory backends

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use vitae::{
    Error, MetadataFilter, Person, Result, ScoredMatch, TextEmbedder, VectorIndex, VectorRecord,
};
use vitae::{ChatModel, EvidenceFragment};

/// The configured team: jose is the default person
#[must_use]
pub fn team() -> Vec<Person> {
    vec![
        Person {
            id: "jose".to_string(),
            name: "José Pérez".to_string(),
            cv_path: PathBuf::from("data/cv_1.txt"),
            aliases: vec!["jose".to_string()],
            is_default: true,
        },
        Person {
            id: "maria".to_string(),
            name: "Maria Rojas".to_string(),
            cv_path: PathBuf::from("data/cv_2.txt"),
            aliases: vec!["maria".to_string()],
            is_default: false,
        },
    ]
}

/// Embedder returning a fixed vector, no I/O
pub struct StaticEmbedder;

#[async_trait]
impl TextEmbedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.1, 0.2, 0.3])
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
    }
}

/// In-memory index serving canned fragments per person id.
///
/// Records every query's (top_k, filter) so tests can assert that scoping
/// is pushed down to the backend.
#[derive(Default)]
pub struct FakeIndex {
    fragments: HashMap<String, Vec<(String, f32, Option<String>)>>,
    pub queries: Mutex<Vec<(usize, Option<serde_json::Value>)>>,
}

impl FakeIndex {
    /// Serve `texts` as ranked fragments for `person_id`
    #[must_use]
    pub fn with_fragments(mut self, person_id: &str, texts: &[&str]) -> Self {
        let entries = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                (
                    format!("{person_id}-chunk-{i}"),
                    0.9 - 0.1 * i as f32,
                    Some((*text).to_string()),
                )
            })
            .collect();
        self.fragments.insert(person_id.to_string(), entries);
        self
    }

    /// Serve one fragment whose metadata has no text field
    #[must_use]
    pub fn with_textless_fragment(mut self, person_id: &str) -> Self {
        self.fragments.insert(
            person_id.to_string(),
            vec![(format!("{person_id}-chunk-0"), 0.9, None)],
        );
        self
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredMatch>> {
        let filter_value = filter.map(MetadataFilter::to_value);
        self.queries
            .lock()
            .expect("queries lock")
            .push((top_k, filter_value.clone()));

        let person_id = filter_value
            .as_ref()
            .and_then(|v| v.get("person_id"))
            .and_then(|v| v.get("$eq"))
            .and_then(|v| v.as_str())
            .map(ToString::to_string)
            .unwrap_or_default();

        let matches = self
            .fragments
            .get(&person_id)
            .map(|entries| {
                entries
                    .iter()
                    .take(top_k)
                    .map(|(id, score, text)| ScoredMatch {
                        id: id.clone(),
                        score: *score,
                        metadata: text.as_ref().map_or(serde_json::json!({}), |t| {
                            serde_json::json!({
                                "person_id": person_id,
                                "text": t,
                            })
                        }),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(matches)
    }

    async fn upsert(&self, _records: &[VectorRecord]) -> Result<()> {
        Ok(())
    }
}

/// Index whose every query fails
pub struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn query(
        &self,
        _vector: &[f32],
        _top_k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<ScoredMatch>> {
        Err(Error::Retrieval("backend unreachable".to_string()))
    }

    async fn upsert(&self, _records: &[VectorRecord]) -> Result<()> {
        Err(Error::Retrieval("backend unreachable".to_string()))
    }
}

/// Chat model that records every prompt pair and returns a canned reply
pub struct FakeChat {
    pub prompts: Mutex<Vec<(String, String)>>,
    reply: String,
}

impl FakeChat {
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push((system_prompt.to_string(), user_prompt.to_string()));
        Ok(self.reply.clone())
    }
}

/// Chat model whose every call fails
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn generate(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        Err(Error::Generation("inference backend down".to_string()))
    }
}

/// Evidence ids in order, for compact assertions
#[must_use]
pub fn evidence_ids(fragments: &[EvidenceFragment]) -> Vec<&str> {
    fragments.iter().map(|f| f.id.as_str()).collect()
}
