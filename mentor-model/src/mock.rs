//! Deterministic stand-ins for tests and offline runs.

use std::sync::Mutex;

use async_trait::async_trait;

use mentor_rag::embedding::EmbeddingProvider;

use crate::chat::{ChatModel, ChatRequest, ModelError, Result};

/// A scriptable [`ChatModel`]: replies with a canned string or fails on
/// every call, and records the requests it receives.
pub struct MockChatModel {
    reply: Option<String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatModel {
    /// A mock that answers every request with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()), requests: Mutex::new(Vec::new()) }
    }

    /// A mock that fails every request.
    pub fn failing() -> Self {
        Self { reply: None, requests: Mutex::new(Vec::new()) }
    }

    /// The requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ModelError::Completion {
                provider: "mock".to_string(),
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// A deterministic [`EmbeddingProvider`]: hash-seeded, L2-normalized
/// vectors whose direction depends only on the input text.
///
/// Identical texts embed identically, so exact-match queries score a
/// cosine distance of zero. Useful for tests and offline demos; the
/// vectors carry no semantics.
pub struct HashEmbedding {
    dimensions: usize,
}

impl HashEmbedding {
    /// Create a provider producing vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, text: &str) -> mentor_rag::error::Result<Vec<f32>> {
        let hash = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));

        let mut vector = vec![0.0f32; self.dimensions];
        for (i, component) in vector.iter_mut().enumerate() {
            *component = ((hash.wrapping_add(i as u64)) as f32).sin();
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
