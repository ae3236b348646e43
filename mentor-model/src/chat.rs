//! The chat completion seam: messages, options, and the [`ChatModel`]
//! trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Behavioral instructions for the model.
    System,
    /// Input attributed to the person asking.
    User,
    /// Prior model output.
    Assistant,
}

/// One role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Generation options forwarded to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerateOptions {
    /// Sampling temperature. `None` leaves the backend default.
    pub temperature: Option<f32>,
    /// Cap on generated tokens. `None` leaves the backend default.
    pub max_output_tokens: Option<u32>,
}

/// A complete, non-streaming chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Ordered messages, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Generation options.
    pub options: GenerateOptions,
}

/// Errors from model backends.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The completion backend failed (transport, API status, or decode).
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A chat completion backend: one message list in, one answer string out.
///
/// Completions may fail; callers above the orchestrator decide how to
/// degrade. Streaming is deliberately out of scope: the answer cycle
/// consumes whole answers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Backend or model name used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}
