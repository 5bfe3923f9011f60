//! Question routing across per-person agents

use std::sync::Arc;

use futures::future;

use super::{EntityAgent, EvidenceFragment};
use crate::config::Person;
use crate::embedding::TextEmbedder;
use crate::fusion;
use crate::generation::ChatModel;
use crate::index::VectorIndex;
use crate::Result;

/// Decide which persons a question concerns.
///
/// Persons are scanned in configured order; the first alias occurring as a
/// case-insensitive substring of the question selects the person, and the
/// rest of that person's aliases are skipped, so each person appears at
/// most once. Selection order follows person order, not match position.
/// When nothing matches, the selection is exactly the default person.
///
/// Matching is a plain substring scan, not token-boundary aware: an alias
/// like "ana" also matches inside "banana". Known limitation.
pub fn detect<'a>(question: &str, persons: impl IntoIterator<Item = &'a Person>) -> Vec<String> {
    let persons: Vec<&Person> = persons.into_iter().collect();
    let q = question.to_lowercase();

    let mut selected: Vec<String> = Vec::new();
    for person in &persons {
        for alias in &person.aliases {
            if q.contains(&alias.to_lowercase()) {
                selected.push(person.id.clone());
                break;
            }
        }
    }

    if selected.is_empty() {
        let default = persons
            .iter()
            .find(|p| p.is_default)
            .or_else(|| persons.first());
        if let Some(person) = default {
            selected.push(person.id.clone());
        }
    }

    selected
}

/// Routes questions to per-person agents and fuses their evidence into one
/// grounded generation request.
///
/// Owns the agent set plus the shared backend handles; all per-question
/// state is local to one `answer` call.
pub struct AgentRouter {
    agents: Vec<EntityAgent>,
    chat: Arc<dyn ChatModel>,
}

impl AgentRouter {
    /// Build one agent per person, in configured order
    #[must_use]
    pub fn new(
        persons: Vec<Person>,
        top_k: usize,
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        chat: Arc<dyn ChatModel>,
    ) -> Self {
        let agents = persons
            .into_iter()
            .map(|person| {
                EntityAgent::new(person, Arc::clone(&embedder), Arc::clone(&index), top_k)
            })
            .collect();

        Self { agents, chat }
    }

    /// The configured agents, in routing order
    #[must_use]
    pub fn agents(&self) -> &[EntityAgent] {
        &self.agents
    }

    /// Person ids a question routes to
    #[must_use]
    pub fn detect(&self, question: &str) -> Vec<String> {
        detect(question, self.agents.iter().map(EntityAgent::person))
    }

    /// Answer a question grounded in the selected persons' CV fragments.
    ///
    /// Retrieval fans out concurrently across the selected agents and is
    /// joined before fusion; the fused fragment list keeps per-agent order
    /// concatenated in selection order regardless of completion order. The
    /// reply text is returned verbatim along with the flattened evidence.
    ///
    /// # Errors
    ///
    /// Retrieval and generation failures propagate unchanged; there is no
    /// retry and no partial fusion.
    pub async fn answer(&self, question: &str) -> Result<(String, Vec<EvidenceFragment>)> {
        let selection = self.detect(question);
        tracing::info!(?selection, "routed question");

        let selected: Vec<&EntityAgent> = selection
            .iter()
            .filter_map(|id| self.agents.iter().find(|a| a.person().id == *id))
            .collect();

        let results =
            future::try_join_all(selected.iter().map(|agent| agent.retrieve(question))).await?;
        let fragments: Vec<EvidenceFragment> = results.into_iter().flatten().collect();

        let prompt = if let [agent] = selected.as_slice() {
            fusion::single_person_prompt(question, &agent.person().name, &fragments)
        } else {
            fusion::multi_person_prompt(question, &fragments)
        };

        let answer = self.chat.generate(&prompt.system, &prompt.user).await?;
        Ok((answer, fragments))
    }
}
