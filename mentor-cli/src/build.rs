//! The `build` subcommand: discover documents, split, embed, persist.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use tracing::info;
use walkdir::WalkDir;

use mentor_model::mock::HashEmbedding;
use mentor_model::ollama::OllamaEmbedding;
use mentor_rag::document::Chunk;
use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::index::VectorIndex;
use mentor_rag::splitter::RecursiveSplitter;

use crate::BuildArgs;

pub(crate) async fn run(args: BuildArgs) -> anyhow::Result<()> {
    let files = discover_docs(&args.docs_dir)?;
    if files.is_empty() {
        bail!("no .txt or .md files found under {}", args.docs_dir.display());
    }

    let splitter = RecursiveSplitter::default();
    let mut chunks: Vec<Chunk> = Vec::new();
    for path in &files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let source = path.display().to_string();
        let file_chunks = splitter.chunk(&text, &source);
        info!(source = %source, chunks = file_chunks.len(), "split document");
        chunks.extend(file_chunks);
    }
    if chunks.is_empty() {
        bail!("every discovered file was empty after splitting");
    }

    let embedder = embedding_backend(&args);
    info!(chunks = chunks.len(), provider = embedder.name(), "embedding chunks");

    // A failed build never touches an existing index file; only a
    // complete index is saved.
    let index = VectorIndex::build(chunks, embedder.as_ref()).await?;
    index.save(&args.index)?;

    println!("Indexed {} chunks from {} files into {}", index.len(), files.len(), args.index.display());
    Ok(())
}

fn embedding_backend(args: &BuildArgs) -> Arc<dyn EmbeddingProvider> {
    if args.mock {
        Arc::new(HashEmbedding::new(args.embed_dimensions))
    } else {
        Arc::new(OllamaEmbedding::with_base_url(
            &args.ollama_url,
            &args.embed_model,
            args.embed_dimensions,
        ))
    }
}

/// All .txt and .md files under `root`, sorted for a deterministic
/// chunk order.
fn discover_docs(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.path().extension().is_some_and(|ext| ext == "md" || ext == "txt")
        })
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_only_text_and_markdown_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();

        fs::write(root.join("b.md"), "beta").unwrap();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("nested/c.txt"), "gamma").unwrap();
        fs::write(root.join("ignore.pdf"), "binary").unwrap();

        let files = discover_docs(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.txt", "b.md", "nested/c.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        assert!(discover_docs(&temp.path().join("absent")).is_err());
    }
}
