#![allow(dead_code)]

//! Embedding stand-ins shared by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::error::{RagError, Result};

/// Deterministic hash-seeded, L2-normalized embeddings.
pub struct HashEmbedding {
    dimensions: usize,
}

impl HashEmbedding {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
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

/// Maps known texts to fixed vectors; anything else gets the fallback.
/// Counts calls so tests can tell whether the broadening pass ran.
pub struct TableEmbedding {
    table: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl TableEmbedding {
    pub fn new(entries: &[(&str, &[f32])], fallback: &[f32]) -> Self {
        let table = entries
            .iter()
            .map(|(text, vector)| (text.to_string(), vector.to_vec()))
            .collect();
        Self { table, fallback: fallback.to_vec(), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbedding {
    fn name(&self) -> &str {
        "table"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }

    fn dimensions(&self) -> usize {
        self.fallback.len()
    }
}

/// Hash-embeds everything except one poison text, which fails.
pub struct FailingEmbedding {
    inner: HashEmbedding,
    poison: String,
}

impl FailingEmbedding {
    pub fn new(poison: &str, dimensions: usize) -> Self {
        Self { inner: HashEmbedding::new(dimensions), poison: poison.to_string() }
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedding {
    fn name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text == self.poison {
            return Err(RagError::Embedding {
                provider: "failing".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}
