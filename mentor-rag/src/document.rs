//! Data types for chunks, index entries, and search hits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A unit of retrievable text with passthrough metadata.
///
/// Produced by ingestion, consumed by [`VectorIndex::build`]. Metadata is
/// carried through retrieval unchanged (source document, chunk index, page
/// number, ...).
///
/// [`VectorIndex::build`]: crate::index::VectorIndex::build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Key-value metadata associated with the chunk.
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// Create a chunk with no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), metadata: HashMap::new() }
    }
}

/// A [`Chunk`] plus its embedding vector, as stored in an index.
///
/// Every entry in one index has `vector.len()` equal to the index
/// dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// The text content of the chunk.
    pub text: String,
    /// Key-value metadata inherited from the chunk.
    pub metadata: HashMap<String, String>,
    /// The embedding for `text`, produced at build time.
    pub vector: Vec<f32>,
}

/// A scored view of an [`IndexEntry`] returned by search.
///
/// Borrows from the index: entries are immutable while serving, so hits
/// never need to own or copy chunk text.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    /// The matched entry.
    pub entry: &'a IndexEntry,
    /// Cosine distance between the query and the entry, in `[0, 2]`.
    /// Lower is more similar.
    pub score: f32,
}
