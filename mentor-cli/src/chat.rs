//! The `chat` subcommand: an interactive REPL over a loaded index.

use std::sync::Arc;

use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use mentor_chat::{ChatEngine, TurnRole};
use mentor_model::chat::ChatModel;
use mentor_model::mock::{HashEmbedding, MockChatModel};
use mentor_model::ollama::{OllamaChatModel, OllamaEmbedding};
use mentor_rag::embedding::EmbeddingProvider;
use mentor_rag::error::RagError;
use mentor_rag::index::VectorIndex;

use crate::ChatArgs;

pub(crate) async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let index = match VectorIndex::load(&args.index) {
        Ok(index) => index,
        Err(e @ (RagError::IndexNotFound(_) | RagError::CorruptIndex(_))) => {
            return Err(anyhow::Error::new(e).context(format!(
                "could not load {}; run `mentor build` first",
                args.index.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let (embedder, model) = backends(&args, index.dimension());
    let mut engine = ChatEngine::new(index, embedder, model);

    println!("Mentor: ask about your docs ({} chunks loaded).", engine.index_len());
    println!("Commands: clear, history, status, quit");

    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    loop {
        let line = match editor.readline("\n> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("readline failed"),
        };

        let input = line.trim();
        if input.is_empty() {
            println!("(empty question; try \"explain ...\" or \"how do I ...\")");
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "clear" => {
                engine.clear_history();
                println!("Conversation cleared.");
            }
            "status" => {
                println!(
                    "Index loaded: {} chunks. Conversation: {} turns.",
                    engine.index_len(),
                    engine.history().count()
                );
            }
            "history" => {
                if engine.history().count() == 0 {
                    println!("No conversation yet.");
                }
                for turn in engine.history() {
                    let label = match turn.role {
                        TurnRole::User => "You",
                        TurnRole::Assistant => "Mentor",
                    };
                    println!("{label}: {}", turn.content);
                }
            }
            _ => {
                let answer = engine.ask(input).await;
                println!("\n{answer}");
            }
        }
    }

    println!("Bye.");
    Ok(())
}

fn backends(
    args: &ChatArgs,
    dimensions: usize,
) -> (Arc<dyn EmbeddingProvider>, Arc<dyn ChatModel>) {
    if args.mock {
        (
            Arc::new(HashEmbedding::new(dimensions)),
            Arc::new(MockChatModel::replying(
                "(offline mode, no language model behind this answer)",
            )),
        )
    } else {
        (
            Arc::new(OllamaEmbedding::with_base_url(
                &args.ollama_url,
                &args.embed_model,
                dimensions,
            )),
            Arc::new(OllamaChatModel::with_base_url(&args.ollama_url, &args.model)),
        )
    }
}
