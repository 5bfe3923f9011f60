//! Grounded answer generation
//!
//! The router hands over a finished (system, user) prompt pair; this module
//! only moves it across the inference boundary and returns the reply text
//! verbatim. No streaming, no retries.

use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::{Error, Result};

/// Groq chat completions endpoint (OpenAI-compatible)
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default completion model
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

/// Default sampling temperature; low, for answers grounded in context
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// LLM inference collaborator consumed by the router
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Turn a (system prompt, user prompt) pair into generated text
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Chat model backed by the Groq completions API
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "Groq API key required for generation".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        #[derive(serde::Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(serde::Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        #[derive(serde::Deserialize)]
        struct CompletionResponse {
            choices: Vec<Choice>,
        }

        #[derive(serde::Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(serde::Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "completion API error {status}: {body}"
            )));
        }

        let result: CompletionResponse = response.json().await?;

        result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Generation("empty completion response".to_string()))
    }
}
