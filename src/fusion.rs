//! Context fusion and prompt construction
//!
//! Builds the (system, user) prompt pair for one answering turn. Both
//! builders are pure: the same question and fragment list always produce a
//! byte-identical pair. Fragments with empty text never render a bullet
//! line; when nothing renders at all, an explicit placeholder stands in so
//! the model says so instead of inventing an answer.

use std::fmt::Write;

use crate::agent::EvidenceFragment;

/// Literal substituted when no context was retrieved
pub const NO_CONTEXT_PLACEHOLDER: &str = "(sin contexto recuperado)";

const SINGLE_SYSTEM_PROMPT: &str = "Eres un asistente que responde preguntas sobre el CV de una persona. \
     Responde solo con la información presente en el contexto. \
     Si no hay datos suficientes, dilo explícitamente. Responde en español.";

const MULTI_SYSTEM_PROMPT: &str = "Eres un asistente que compara o responde sobre varias personas a la vez, \
     usando únicamente los fragmentos de CV provistos. \
     Responde en español y deja claro qué información corresponde a cada persona.";

/// A generation request: system instructions plus user payload.
/// Constructed fresh per question, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    /// System instructions
    pub system: String,

    /// User payload embedding the context block and the question
    pub user: String,
}

/// Build the prompt for a question routed to exactly one person.
///
/// The context block is a flat bulleted list of the person's non-empty
/// fragments, in retrieval order.
#[must_use]
pub fn single_person_prompt(
    question: &str,
    person_name: &str,
    fragments: &[EvidenceFragment],
) -> PromptPair {
    let lines: Vec<String> = fragments
        .iter()
        .filter(|f| !f.text.is_empty())
        .map(|f| format!("- {}", f.text))
        .collect();
    let context_block = if lines.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        lines.join("\n")
    };

    let user = format!(
        "Persona: {person_name}\n\
         \n\
         Contexto (fragmentos del CV):\n\
         {context_block}\n\
         \n\
         Pregunta del usuario:\n\
         {question}\n\
         \n\
         Instrucciones:\n\
         - Responde solo sobre {person_name}.\n\
         - No inventes información fuera del contexto.\n\
         - Sé claro y conciso.\n"
    );

    PromptPair {
        system: SINGLE_SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Build the prompt for a question routed to several persons.
///
/// Fragments are grouped by person display name in first-seen order; each
/// group renders a `[CV de {name}]` section whose header survives even when
/// every fragment of that person is empty. The model is instructed to
/// structure its reply one section per person and never mix people.
#[must_use]
pub fn multi_person_prompt(question: &str, fragments: &[EvidenceFragment]) -> PromptPair {
    let mut groups: Vec<(&str, Vec<&EvidenceFragment>)> = Vec::new();
    for fragment in fragments {
        let name = fragment.person_name.as_str();
        match groups.iter_mut().find(|(n, _)| *n == name) {
            Some((_, list)) => list.push(fragment),
            None => groups.push((name, vec![fragment])),
        }
    }

    let sections: Vec<String> = groups
        .iter()
        .map(|(name, list)| {
            let mut section = format!("[CV de {name}]");
            for fragment in list {
                if !fragment.text.is_empty() {
                    let _ = write!(section, "\n- {}", fragment.text);
                }
            }
            section
        })
        .collect();

    let context_block = if sections.is_empty() {
        NO_CONTEXT_PLACEHOLDER.to_string()
    } else {
        sections.join("\n\n")
    };

    let user = format!(
        "Contexto (fragmentos por persona):\n\
         {context_block}\n\
         \n\
         Pregunta del usuario:\n\
         {question}\n\
         \n\
         Instrucciones:\n\
         - Estructura la respuesta en secciones, una por persona.\n\
         - En cada sección, aclara el nombre de la persona.\n\
         - No inventes datos que no aparezcan en el contexto.\n"
    );

    PromptPair {
        system: MULTI_SYSTEM_PROMPT.to_string(),
        user,
    }
}
