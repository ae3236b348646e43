//! Context assembly: a query and a widened search become one bounded,
//! deduplicated context block for prompting.

use std::collections::HashSet;

use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Separator between accepted chunks in the assembled context, chosen so
/// prompt construction can tell chunks apart both visually and
/// programmatically.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Appended to any chunk text cut at the length bound.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Tunables for context assembly.
///
/// The keyword-broadening pass is an explicit, configured strategy rather
/// than a hidden fallback: the confidence threshold and the term
/// extraction rule materially change the recall/precision trade-off.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblerConfig {
    /// Maximum number of unique chunks in the assembled context.
    pub max_chunks: usize,
    /// Distance above which a hit counts as low-confidence. When every
    /// primary hit is above this, the broadening pass runs. Cosine
    /// distance scale, so meaningful values sit in `[0, 2]`.
    pub low_confidence: f32,
    /// How many leading query tokens the broadening pass considers.
    pub max_terms: usize,
    /// Tokens must be strictly longer than this many characters to be
    /// used as broadening terms.
    pub min_term_chars: usize,
    /// Hits requested per broadening term.
    pub per_term_k: usize,
    /// Accepted chunk texts longer than this many characters are cut and
    /// marked with [`TRUNCATION_MARKER`].
    pub max_chunk_chars: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            max_chunks: 10,
            low_confidence: 0.8,
            max_terms: 5,
            min_term_chars: 3,
            per_term_k: 3,
            max_chunk_chars: 800,
        }
    }
}

impl AssemblerConfig {
    /// Create a new builder for constructing an [`AssemblerConfig`].
    pub fn builder() -> AssemblerConfigBuilder {
        AssemblerConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`AssemblerConfig`].
#[derive(Debug, Clone, Default)]
pub struct AssemblerConfigBuilder {
    config: AssemblerConfig,
}

impl AssemblerConfigBuilder {
    /// Set the maximum number of chunks in the assembled context.
    pub fn max_chunks(mut self, max_chunks: usize) -> Self {
        self.config.max_chunks = max_chunks;
        self
    }

    /// Set the low-confidence distance threshold.
    pub fn low_confidence(mut self, low_confidence: f32) -> Self {
        self.config.low_confidence = low_confidence;
        self
    }

    /// Set how many leading query tokens the broadening pass considers.
    pub fn max_terms(mut self, max_terms: usize) -> Self {
        self.config.max_terms = max_terms;
        self
    }

    /// Set the minimum term length (exclusive) for broadening terms.
    pub fn min_term_chars(mut self, min_term_chars: usize) -> Self {
        self.config.min_term_chars = min_term_chars;
        self
    }

    /// Set the number of hits requested per broadening term.
    pub fn per_term_k(mut self, per_term_k: usize) -> Self {
        self.config.per_term_k = per_term_k;
        self
    }

    /// Set the per-chunk character bound.
    pub fn max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.config.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Build the [`AssemblerConfig`], validating that parameters are
    /// consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any count is zero or the
    /// threshold is outside the cosine distance range.
    pub fn build(self) -> Result<AssemblerConfig> {
        if self.config.max_chunks == 0 {
            return Err(RagError::Config("max_chunks must be greater than zero".to_string()));
        }
        if self.config.per_term_k == 0 {
            return Err(RagError::Config("per_term_k must be greater than zero".to_string()));
        }
        if self.config.max_chunk_chars == 0 {
            return Err(RagError::Config("max_chunk_chars must be greater than zero".to_string()));
        }
        if !(0.0..=2.0).contains(&self.config.low_confidence) {
            return Err(RagError::Config(format!(
                "low_confidence ({}) must be within the cosine distance range [0, 2]",
                self.config.low_confidence
            )));
        }
        Ok(self.config)
    }
}

/// Turns search hits into one bounded, deduplicated context string.
///
/// Two-phase retrieval: a primary whole-query search, then, only when
/// every primary hit is low-confidence, a keyword pass that searches a
/// few query terms individually and pours the hits into the same pool.
/// The keyword pass is a recall booster for queries that embed poorly as
/// a whole sentence; it may admit lower-quality hits, and both passes use
/// the same distance metric.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    config: AssemblerConfig,
}

impl ContextAssembler {
    /// Create an assembler with the given configuration.
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// The assembler's configuration.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble a context block for `query` from `index`.
    ///
    /// Returns `Ok(None)` when no usable context exists: the index is
    /// empty, or every candidate text is blank after trimming. Callers
    /// must treat `None` as "answer without grounding", not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if embedding the query or a
    /// broadening term fails, or any error `index.search` raises other
    /// than [`RagError::EmptyIndex`].
    pub async fn assemble(
        &self,
        query: &str,
        index: &VectorIndex,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Option<String>> {
        let query_vector = provider.embed(query).await?;
        let mut pool = match index.search(&query_vector, self.config.max_chunks) {
            Ok(hits) => hits,
            Err(RagError::EmptyIndex) => return Ok(None),
            Err(e) => return Err(e),
        };

        if pool.iter().all(|hit| hit.score > self.config.low_confidence) {
            let terms =
                extract_terms(query, self.config.max_terms, self.config.min_term_chars);
            debug!(
                primary_hits = pool.len(),
                terms = terms.len(),
                "primary search low-confidence, broadening with query terms"
            );
            for term in &terms {
                let term_vector = provider.embed(term).await?;
                pool.extend(index.search(&term_vector, self.config.per_term_k)?);
            }
        }

        // Stable sort keeps the pool deterministic for equal scores.
        pool.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));

        let mut seen: HashSet<&str> = HashSet::new();
        let mut parts: Vec<String> = Vec::new();
        for hit in &pool {
            if parts.len() == self.config.max_chunks {
                break;
            }
            let text = hit.entry.text.trim();
            if text.is_empty() || !seen.insert(text) {
                continue;
            }
            parts.push(clip(text, self.config.max_chunk_chars));
        }

        if parts.is_empty() {
            debug!("no usable context after deduplication");
            return Ok(None);
        }
        Ok(Some(parts.join(CHUNK_SEPARATOR)))
    }
}

/// The first `max_terms` whitespace tokens of the lower-cased query that
/// are strictly longer than `min_chars` characters.
fn extract_terms(query: &str, max_terms: usize, min_chars: usize) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .take(max_terms)
        .filter(|term| term.chars().count() > min_chars)
        .map(str::to_string)
        .collect()
}

/// Cut `text` to at most `max_chars` characters, appending the
/// truncation marker when anything was cut.
fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_come_from_the_leading_tokens_only() {
        let terms = extract_terms("What IS a call stack frame", 5, 3);
        // "frame" is the sixth token and never considered.
        assert_eq!(terms, vec!["what", "call", "stack"]);
    }

    #[test]
    fn short_tokens_are_skipped() {
        assert!(extract_terms("is a to of", 5, 3).is_empty());
    }

    #[test]
    fn clip_leaves_short_text_alone() {
        assert_eq!(clip("short", 800), "short");
    }

    #[test]
    fn clip_cuts_at_char_boundaries() {
        let text = "é".repeat(10);
        let clipped = clip(&text, 4);
        assert_eq!(clipped, format!("{}{TRUNCATION_MARKER}", "é".repeat(4)));
    }

    #[test]
    fn builder_rejects_zero_max_chunks() {
        let result = AssemblerConfig::builder().max_chunks(0).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }

    #[test]
    fn builder_rejects_out_of_range_threshold() {
        let result = AssemblerConfig::builder().low_confidence(2.5).build();
        assert!(matches!(result, Err(RagError::Config(_))));
    }
}
