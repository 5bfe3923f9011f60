//! Per-person retrieval agents and the router that coordinates them

mod router;

use std::sync::Arc;

use serde::Serialize;

use crate::config::Person;
use crate::embedding::TextEmbedder;
use crate::index::{MetadataFilter, VectorIndex};
use crate::Result;

pub use router::{AgentRouter, detect};

/// One retrieved CV fragment with its owning person and relevance score.
///
/// Scores are backend-defined and only comparable within one backend; they
/// are carried for display, never merged into a cross-person ranking.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceFragment {
    /// Id of the person the fragment belongs to
    pub person_id: String,

    /// Display name of the person
    pub person_name: String,

    /// Fragment id in the index
    pub id: String,

    /// Backend relevance score (higher is more relevant)
    pub score: f32,

    /// Fragment text; empty when the stored metadata lacks it
    pub text: String,
}

/// Retrieval agent scoped to one person's CV fragments
pub struct EntityAgent {
    person: Person,
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl EntityAgent {
    /// Bind a person to the shared embedding and index handles
    #[must_use]
    pub fn new(
        person: Person,
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
    ) -> Self {
        Self {
            person,
            embedder,
            index,
            top_k,
        }
    }

    /// The person this agent is scoped to
    #[must_use]
    pub fn person(&self) -> &Person {
        &self.person
    }

    /// Retrieve evidence for a question, scoped to this person.
    ///
    /// The question is embedded and the index queried with a `person_id`
    /// equality filter, so scoping is enforced by the backend rather than
    /// by post-filtering. Results keep backend rank order.
    ///
    /// # Errors
    ///
    /// Propagates embedding and index errors unchanged.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<EvidenceFragment>> {
        let vector = self.embedder.embed(question).await?;
        let filter = MetadataFilter::equals("person_id", &self.person.id);
        let matches = self.index.query(&vector, self.top_k, Some(&filter)).await?;

        tracing::debug!(
            person = %self.person.id,
            fragments = matches.len(),
            "retrieved evidence"
        );

        Ok(matches
            .into_iter()
            .map(|m| EvidenceFragment {
                person_id: self.person.id.clone(),
                person_name: self.person.name.clone(),
                text: m
                    .metadata
                    .get("text")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                id: m.id,
                score: m.score,
            })
            .collect())
    }
}
