/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API
/// directly. All LLM interactions MUST go through this module.
///
/// Every call is a single attempt: transport errors, auth failures and quota
/// errors all surface as one `LlmError` immediately. There is no retry layer;
/// the comparison pipeline is fail-fast by contract.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Completion-style model used by single-prompt variants.
pub const MODEL_FLASH: &str = "gemini-1.5-flash";
/// Chat-style model used by role-separated message variants.
pub const MODEL_CHAT: &str = "gemini-1.5-chat";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A role-tagged message for chat-style prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    System(String),
    User(String),
}

impl ChatMessage {
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::System(text) | ChatMessage::User(text) => text,
        }
    }
}

/// What the prompt builder hands to the gateway: either one flat prompt
/// string or an ordered list of role-tagged messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPayload {
    Single(String),
    Chat(Vec<ChatMessage>),
}

/// Gateway abstraction over the external generative model.
///
/// The pipeline depends on this trait, not on `GeminiClient`, so tests can
/// substitute a canned or counting implementation.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends the prompt to `model` and returns the raw response text.
    /// One attempt, fail-fast; no retries at this layer.
    async fn complete(
        &self,
        model: &str,
        payload: &PromptPayload,
        temperature: Option<f64>,
    ) -> Result<String, LlmError>;
}

// ── Gemini wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ContentPart>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct ContentPart {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The single Gemini client used by the comparison pipeline in production.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    fn build_request(payload: &PromptPayload, temperature: Option<f64>) -> GenerateContentRequest {
        let (system_instruction, contents) = match payload {
            PromptPayload::Single(prompt) => (
                None,
                vec![Content {
                    role: "user",
                    parts: vec![Part {
                        text: prompt.clone(),
                    }],
                }],
            ),
            PromptPayload::Chat(messages) => {
                // Gemini carries the system role out-of-band as systemInstruction;
                // everything else goes into contents in order.
                let mut system = None;
                let mut contents = Vec::new();
                for message in messages {
                    match message {
                        ChatMessage::System(text) => {
                            system = Some(ContentPart {
                                parts: vec![Part { text: text.clone() }],
                            });
                        }
                        ChatMessage::User(text) => contents.push(Content {
                            role: "user",
                            parts: vec![Part { text: text.clone() }],
                        }),
                    }
                }
                (system, contents)
            }
        };

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: temperature.map(|t| GenerationConfig { temperature: t }),
        }
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn complete(
        &self,
        model: &str,
        payload: &PromptPayload,
        temperature: Option<f64>,
    ) -> Result<String, LlmError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let request_body = Self::build_request(payload, temperature);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the structured error message
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: model={model}, response_len={}", text.len());

        Ok(text)
    }
}
