//! Integration tests for building, persisting, and searching the index.

mod common;

use std::collections::HashMap;

use common::{FailingEmbedding, HashEmbedding};
use mentor_rag::document::{Chunk, IndexEntry};
use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::error::RagError;
use mentor_rag::index::VectorIndex;
use proptest::prelude::*;

fn entry(text: &str, vector: &[f32]) -> IndexEntry {
    IndexEntry { text: text.to_string(), metadata: HashMap::new(), vector: vector.to_vec() }
}

#[tokio::test]
async fn build_preserves_input_order_and_dimension() {
    let provider = HashEmbedding::new(8);
    let chunks = vec![Chunk::new("a"), Chunk::new("b"), Chunk::new("c")];
    let index = VectorIndex::build(chunks, &provider).await.unwrap();

    assert_eq!(index.len(), 3);
    assert_eq!(index.dimension(), 8);
    let texts: Vec<_> = index.entries().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, ["a", "b", "c"]);
}

#[tokio::test]
async fn build_aborts_on_embedding_failure() {
    let provider = FailingEmbedding::new("poison", 8);
    let chunks = vec![Chunk::new("a"), Chunk::new("poison"), Chunk::new("c")];
    let result = VectorIndex::build(chunks, &provider).await;
    assert!(matches!(result, Err(RagError::Embedding { .. })));
}

#[tokio::test]
async fn exact_text_query_is_the_top_hit() {
    let provider = HashEmbedding::new(32);
    let chunks =
        vec![Chunk::new("recursion uses a call stack"), Chunk::new("iteration uses a loop")];
    let index = VectorIndex::build(chunks, &provider).await.unwrap();

    let query = provider.embed("recursion uses a call stack").await.unwrap();
    let hits = index.search(&query, 2).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].entry.text, "recursion uses a call stack");
    assert!(hits[0].score.abs() < 1e-5);
    assert!(hits[0].score < hits[1].score);
}

#[test]
fn equal_scores_keep_insertion_order() {
    let shared = [1.0, 0.0];
    let index = VectorIndex::from_entries(
        2,
        vec![entry("first", &shared), entry("second", &shared), entry("third", &[0.0, 1.0])],
    )
    .unwrap();

    let hits = index.search(&[1.0, 0.0], 3).unwrap();
    assert_eq!(hits[0].entry.text, "first");
    assert_eq!(hits[1].entry.text, "second");
    assert_eq!(hits[2].entry.text, "third");
}

#[test]
fn k_is_clamped_to_the_entry_count() {
    let index = VectorIndex::from_entries(2, vec![entry("only", &[1.0, 0.0])]).unwrap();
    let hits = index.search(&[0.5, 0.5], 10).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn empty_index_search_fails() {
    let index = VectorIndex::from_entries(4, Vec::new()).unwrap();
    assert!(matches!(index.search(&[0.0; 4], 3), Err(RagError::EmptyIndex)));
}

#[test]
fn wrong_dimension_query_is_rejected() {
    let index = VectorIndex::from_entries(2, vec![entry("a", &[1.0, 0.0])]).unwrap();
    assert!(matches!(
        index.search(&[1.0, 0.0, 0.0], 1),
        Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
    ));
}

#[test]
fn from_entries_rejects_inconsistent_dimensions() {
    let result =
        VectorIndex::from_entries(2, vec![entry("a", &[1.0, 0.0]), entry("b", &[1.0, 0.0, 0.0])]);
    assert!(matches!(result, Err(RagError::DimensionMismatch { expected: 2, actual: 3 })));
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let provider = HashEmbedding::new(8);
    let mut documented = Chunk::new("some documented fact");
    documented.metadata.insert("source".to_string(), "guide.md".to_string());
    let index =
        VectorIndex::build(vec![documented, Chunk::new("another fact")], &provider).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    index.save(&path).unwrap();

    let loaded = VectorIndex::load(&path).unwrap();
    assert_eq!(loaded, index);
    assert!(!dir.path().join("index.json.tmp").exists());
}

#[test]
fn loading_a_missing_path_says_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = VectorIndex::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(RagError::IndexNotFound(_))));
}

#[test]
fn loading_garbage_says_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, b"not json at all").unwrap();
    assert!(matches!(VectorIndex::load(&path), Err(RagError::CorruptIndex(_))));
}

#[test]
fn loading_inconsistent_dimensions_says_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    let json = r#"{"dimension":2,"entries":[{"text":"a","metadata":{},"vector":[1.0,0.0,0.0]}]}"#;
    std::fs::write(&path, json).unwrap();
    assert!(matches!(VectorIndex::load(&path), Err(RagError::CorruptIndex(_))));
}

/// Generate a non-zero L2-normalized vector of the given dimension.
fn arb_unit_vector(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero vector", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-6 {
            return None;
        }
        for component in &mut v {
            *component /= norm;
        }
        Some(v)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any set of stored vectors, search returns exactly
    /// min(k, N) hits ordered by non-decreasing distance.
    #[test]
    fn search_returns_min_k_hits_sorted_ascending(
        vectors in proptest::collection::vec(arb_unit_vector(8), 1..20),
        query in arb_unit_vector(8),
        k in 1usize..25,
    ) {
        let entries = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| IndexEntry {
                text: format!("chunk {i}"),
                metadata: HashMap::new(),
                vector: v.clone(),
            })
            .collect();
        let index = VectorIndex::from_entries(8, entries).unwrap();

        let hits = index.search(&query, k).unwrap();

        prop_assert_eq!(hits.len(), k.min(index.len()));
        for window in hits.windows(2) {
            prop_assert!(
                window[0].score <= window[1].score,
                "hits not ascending: {} > {}",
                window[0].score,
                window[1].score,
            );
        }
    }
}
