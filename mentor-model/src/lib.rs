//! # mentor-model
//!
//! Model integrations for Mentor: the chat completion seam and its
//! backends.
//!
//! ## Overview
//!
//! - [`ChatModel`] - one role-tagged message list in, one answer string
//!   out, may fail.
//! - [`OllamaChatModel`] / [`OllamaEmbedding`] - a local Ollama server
//!   behind the chat and embedding seams.
//! - [`MockChatModel`] / [`HashEmbedding`] - deterministic stand-ins for
//!   tests and offline runs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mentor_model::{ChatMessage, ChatRequest, ChatModel, OllamaChatModel};
//!
//! let model = OllamaChatModel::new("llama3.2");
//! let answer = model
//!     .complete(ChatRequest {
//!         messages: vec![ChatMessage::user("why is the stack faster than the heap?")],
//!         options: Default::default(),
//!     })
//!     .await?;
//! ```

pub mod chat;
pub mod mock;
pub mod ollama;

pub use chat::{ChatMessage, ChatModel, ChatRequest, GenerateOptions, ModelError, Role};
pub use mock::{HashEmbedding, MockChatModel};
pub use ollama::{OllamaChatModel, OllamaEmbedding};
