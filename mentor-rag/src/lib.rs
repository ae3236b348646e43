//! # mentor-rag
//!
//! Retrieval core for Mentor: a persisted vector index with exact
//! linear-scan similarity search, and the context assembly that turns raw
//! search hits into one bounded, deduplicated block of text for prompting.
//!
//! ## Overview
//!
//! - [`VectorIndex`] - embedded chunks in insertion order, JSON file
//!   persistence, top-k search by cosine distance.
//! - [`ContextAssembler`] - primary search plus a keyword-broadening
//!   fallback, deduplication, per-chunk truncation, and joining.
//! - [`RecursiveSplitter`] - paragraph/sentence/word text splitting for
//!   ingestion.
//! - [`EmbeddingProvider`] - the async seam to whatever turns text into
//!   vectors.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mentor_rag::{AssemblerConfig, ContextAssembler, RecursiveSplitter, VectorIndex};
//!
//! let chunks = RecursiveSplitter::default().chunk(&text, "guide.md");
//! let index = VectorIndex::build(chunks, &embedder).await?;
//! index.save("mentor-index.json")?;
//!
//! let assembler = ContextAssembler::new(AssemblerConfig::default());
//! if let Some(context) = assembler.assemble("what is a call stack", &index, &embedder).await? {
//!     println!("{context}");
//! }
//! ```

pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod splitter;

pub use context::{AssemblerConfig, ContextAssembler};
pub use document::{Chunk, IndexEntry, SearchHit};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use splitter::RecursiveSplitter;
