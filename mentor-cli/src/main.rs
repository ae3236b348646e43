//! Command-line entry point: build an index from a docs folder, then
//! chat over it.

mod build;
mod chat;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use mentor_model::ollama::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(name = "mentor", version, about = "Doc-grounded programmer Q&A assistant")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "mentor_rag=debug").
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split, embed, and index every .txt/.md file in a docs directory.
    Build(BuildArgs),
    /// Chat over a previously built index.
    Chat(ChatArgs),
}

#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Directory of source documents.
    #[arg(long, default_value = "docs")]
    pub docs_dir: PathBuf,

    /// Where to write the index file.
    #[arg(long, default_value = "mentor-index.json")]
    pub index: PathBuf,

    /// Ollama embedding model.
    #[arg(long, default_value = "nomic-embed-text")]
    pub embed_model: String,

    /// Dimensionality of the embedding model's vectors.
    #[arg(long, default_value_t = 768)]
    pub embed_dimensions: usize,

    /// Base URL of the Ollama server.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub ollama_url: String,

    /// Use the deterministic offline embedder instead of Ollama.
    #[arg(long)]
    pub mock: bool,
}

#[derive(Args)]
pub(crate) struct ChatArgs {
    /// Index file written by `mentor build`.
    #[arg(long, default_value = "mentor-index.json")]
    pub index: PathBuf,

    /// Ollama chat model.
    #[arg(long, default_value = "llama3.2")]
    pub model: String,

    /// Ollama embedding model (must match the one the index was built with).
    #[arg(long, default_value = "nomic-embed-text")]
    pub embed_model: String,

    /// Base URL of the Ollama server.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub ollama_url: String,

    /// Use offline mock backends instead of Ollama.
    #[arg(long)]
    pub mock: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Build(args) => build::run(args).await,
        Commands::Chat(args) => chat::run(args).await,
    }
}
