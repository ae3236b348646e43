//! Ollama-backed chat and embedding integrations.
//!
//! Talks to a local Ollama server's REST API with `reqwest`:
//! `/api/chat` (non-streaming) for completions and `/api/embeddings`
//! for vectors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::error::RagError;

use crate::chat::{ChatModel, ChatRequest, ModelError, Result, Role};

/// Default base URL for a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// A [`ChatModel`] backed by an Ollama server.
///
/// # Example
///
/// ```rust,ignore
/// use mentor_model::OllamaChatModel;
///
/// let model = OllamaChatModel::new("llama3.2");
/// let answer = model.complete(request).await?;
/// ```
pub struct OllamaChatModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaChatModel {
    /// Create a client for the given model against
    /// [`DEFAULT_BASE_URL`].
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model)
    }

    /// Create a client against a specific Ollama base URL.
    pub fn with_base_url(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatCall<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: WireOptions,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct ChatReply {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

#[derive(Serialize)]
struct EmbedCall<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedReply {
    embedding: Vec<f32>,
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

// ── ChatModel implementation ───────────────────────────────────────

#[async_trait]
impl ChatModel for OllamaChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<String> {
        debug!(model = %self.model, messages = request.messages.len(), "requesting completion");

        let body = ChatCall {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage { role: role_str(m.role), content: &m.content })
                .collect(),
            stream: false,
            options: WireOptions {
                temperature: request.options.temperature,
                num_predict: request.options.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.completion_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(model = %self.model, %status, "Ollama API error");
            return Err(self.completion_error(format!("API returned {status}: {detail}")));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| self.completion_error(format!("failed to decode response: {e}")))?;

        Ok(reply.message.content)
    }
}

impl OllamaChatModel {
    fn completion_error(&self, message: String) -> ModelError {
        ModelError::Completion { provider: format!("Ollama/{}", self.model), message }
    }
}

/// An [`EmbeddingProvider`] backed by an Ollama server.
///
/// The expected dimensionality is declared at construction (the server
/// does not advertise it) and every response is checked against it.
pub struct OllamaEmbedding {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedding {
    /// Create a provider for the given embedding model against
    /// [`DEFAULT_BASE_URL`]. `nomic-embed-text` produces 768-dimension
    /// vectors.
    pub fn new(model: impl Into<String>, dimensions: usize) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model, dimensions)
    }

    /// Create a provider against a specific Ollama base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            dimensions,
        }
    }

    fn embedding_error(&self, message: String) -> RagError {
        RagError::Embedding { provider: format!("Ollama/{}", self.model), message }
    }
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbedding {
    fn name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> mentor_rag::error::Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "embedding text");

        let body = EmbedCall { model: &self.model, prompt: text };
        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.embedding_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            error!(model = %self.model, %status, "Ollama API error");
            return Err(self.embedding_error(format!("API returned {status}: {detail}")));
        }

        let reply: EmbedReply = response
            .json()
            .await
            .map_err(|e| self.embedding_error(format!("failed to decode response: {e}")))?;

        if reply.embedding.len() != self.dimensions {
            return Err(self.embedding_error(format!(
                "returned {} dimensions, expected {}",
                reply.embedding.len(),
                self.dimensions
            )));
        }
        Ok(reply.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
