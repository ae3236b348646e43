//! Persisted vector index with exact linear-scan similarity search.
//!
//! The index is built once from a batch of chunks, persisted as a single
//! JSON file, and read-only while serving queries. Search scores are
//! **cosine distance** (`1 - cosine similarity`, range `[0, 2]`, lower is
//! more similar); the same metric is used everywhere a score appears.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{Chunk, IndexEntry, SearchHit};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// An insertion-ordered collection of embedded chunks with file
/// persistence.
///
/// Entry order is the build input order; it does not affect which entries
/// a search returns, but it is the deterministic tie-break when two
/// entries score the same distance.
///
/// `search` is a pure, synchronous computation over immutable entries, so
/// a loaded index can be shared behind an `Arc` and queried from many
/// tasks without locking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed every chunk in input order and build an index over them.
    ///
    /// The whole build aborts on the first provider failure or
    /// wrong-length vector; a partially embedded index is never
    /// produced, so a persisted index can be trusted to be complete.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the provider fails for any
    /// chunk or returns a vector whose length differs from
    /// [`dimensions()`](EmbeddingProvider::dimensions).
    pub async fn build(
        chunks: Vec<Chunk>,
        provider: &dyn EmbeddingProvider,
    ) -> Result<VectorIndex> {
        let dimension = provider.dimensions();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let vectors = provider.embed_batch(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: provider.name().to_string(),
                message: format!(
                    "returned {} vectors for {} chunks",
                    vectors.len(),
                    chunks.len()
                ),
            });
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            if vector.len() != dimension {
                return Err(RagError::Embedding {
                    provider: provider.name().to_string(),
                    message: format!(
                        "returned a {}-dimensional vector, expected {dimension}",
                        vector.len()
                    ),
                });
            }
            entries.push(IndexEntry { text: chunk.text, metadata: chunk.metadata, vector });
        }

        info!(entries = entries.len(), dimension, "built index");
        Ok(VectorIndex { dimension, entries })
    }

    /// Build an index directly from precomputed entries.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if any entry's vector
    /// length differs from `dimension`.
    pub fn from_entries(dimension: usize, entries: Vec<IndexEntry>) -> Result<VectorIndex> {
        if let Some(entry) = entries.iter().find(|e| e.vector.len() != dimension) {
            return Err(RagError::DimensionMismatch {
                expected: dimension,
                actual: entry.vector.len(),
            });
        }
        Ok(VectorIndex { dimension, entries })
    }

    /// The embedding dimension shared by every entry.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stored entries, in insertion order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Serialize the index to `path` as JSON.
    ///
    /// Writes to a sibling temp file and renames it into place, so a
    /// failed write never leaves a partial file visible at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] on any write failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let tmp = tmp_sibling(path);

        let bytes = serde_json::to_vec(self).map_err(std::io::Error::from)?;
        if let Err(e) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        info!(path = %path.display(), entries = self.entries.len(), "saved index");
        Ok(())
    }

    /// Deserialize an index from `path`.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexNotFound`] if nothing exists at `path`;
    ///   callers use this to tell "build one first" apart from real
    ///   failures.
    /// - [`RagError::CorruptIndex`] if the file cannot be decoded or its
    ///   entries disagree about the dimension.
    /// - [`RagError::Io`] for other read failures.
    pub fn load(path: impl AsRef<Path>) -> Result<VectorIndex> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RagError::IndexNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let index: VectorIndex = serde_json::from_slice(&bytes).map_err(|e| {
            RagError::CorruptIndex(format!("failed to decode {}: {e}", path.display()))
        })?;

        if let Some(entry) = index.entries.iter().find(|e| e.vector.len() != index.dimension) {
            return Err(RagError::CorruptIndex(format!(
                "entry has dimension {}, index declares {}",
                entry.vector.len(),
                index.dimension
            )));
        }

        info!(path = %path.display(), entries = index.entries.len(), "loaded index");
        Ok(index)
    }

    /// Return the `k` entries closest to `query`, ascending by cosine
    /// distance.
    ///
    /// Equal distances keep insertion order (first-inserted wins), so
    /// results are deterministic. `k` is clamped to the entry count.
    /// Linear scan, `O(N·D)` per query.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyIndex`] if the index has no entries.
    /// - [`RagError::DimensionMismatch`] if `query.len()` differs from
    ///   the index dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit<'_>>> {
        if self.entries.is_empty() {
            return Err(RagError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .entries
            .iter()
            .map(|entry| SearchHit { entry, score: cosine_distance(&entry.vector, query) })
            .collect();

        // Stable sort on the score alone: ties keep insertion order.
        hits.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        debug!(k, returned = hits.len(), "searched index");
        Ok(hits)
    }
}

/// Compute cosine distance between two vectors: `1 - (a·b)/(|a||b|)`.
///
/// Zero-magnitude vectors score 1.0, as if orthogonal.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

/// `path` with `.tmp` appended to the full file name, in the same
/// directory so the final rename stays on one filesystem.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_of_identical_vectors_is_zero() {
        let v = vec![1.0, 2.0, 3.0];
        assert!(cosine_distance(&v, &v).abs() < 1e-6);
    }

    #[test]
    fn distance_of_orthogonal_vectors_is_one() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distance_of_opposite_vectors_is_two() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_distance(&a, &b) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_as_orthogonal() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_distance(&a, &b), 1.0);
    }

    #[test]
    fn tmp_sibling_appends_to_the_file_name() {
        let tmp = tmp_sibling(Path::new("data/mentor-index.json"));
        assert_eq!(tmp, Path::new("data/mentor-index.json.tmp"));
    }
}
