//! Recursive text splitting for ingestion.
//!
//! Splits at the coarsest boundary that keeps pieces under the size
//! limit: blank-line paragraphs first, then sentence ends, then single
//! spaces. Only unbroken runs longer than the limit fall back to hard
//! character windows with overlap.

use std::collections::HashMap;

use crate::document::Chunk;

/// Boundary ladder, coarse to fine. Separators stay attached to the
/// preceding piece so reassembled chunks read naturally.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// Splits raw text into chunks bounded by a character count.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

impl RecursiveSplitter {
    /// Create a splitter producing chunks of at most `chunk_size`
    /// characters, with `overlap` characters shared between consecutive
    /// windowed pieces.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self { chunk_size, overlap }
    }

    /// Split `text` into trimmed, non-empty pieces in document order.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &SEPARATORS)
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    /// Split `text` and wrap each piece as a [`Chunk`] tagged with its
    /// `source` and position.
    pub fn chunk(&self, text: &str, source: &str) -> Vec<Chunk> {
        self.split(text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = HashMap::new();
                metadata.insert("source".to_string(), source.to_string());
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk { text, metadata }
            })
            .collect()
    }

    /// Split at the first separator level, merging adjacent pieces up to
    /// the size limit; oversized pieces recurse into the next level.
    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let Some((separator, rest)) = separators.split_first() else {
            return self.window(text);
        };

        let mut out = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0usize;

        for piece in split_after(text, separator) {
            let piece_chars = piece.chars().count();
            if !current.is_empty() && current_chars + piece_chars > self.chunk_size {
                out.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            if piece_chars > self.chunk_size {
                out.extend(self.split_with(piece, rest));
            } else {
                current.push_str(piece);
                current_chars += piece_chars;
            }
        }

        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    /// Terminal fallback: hard character windows with overlap.
    fn window(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size.saturating_sub(self.overlap).max(1);

        let mut out = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        out
    }
}

/// Split `text` at every occurrence of `separator`, keeping the
/// separator attached to the preceding piece.
fn split_after<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(separator) {
        let cut = pos + separator.len();
        pieces.push(&rest[..cut]);
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }
    pieces
}
