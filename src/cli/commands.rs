//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "fischgpt")]
#[command(about = "FischGPT gateway: retrieval-augmented answers about one person")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS
        #[arg(long)]
        no_cors: bool,
    },
    /// Ask a question through the full pipeline
    Ask {
        /// The question
        query: String,
        /// Sampling temperature (0.0-1.0)
        #[arg(long)]
        temperature: Option<f32>,
        /// Token budget
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Nucleus sampling (0.0-1.0)
        #[arg(long)]
        top_p: Option<f32>,
        /// Print the retrieved context and prompt before the answer
        #[arg(long)]
        show_context: bool,
    },
    /// Run retrieval only and print the ranked documents
    Search {
        /// The query
        query: String,
        /// Maximum number of documents
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Add documents from a JSON file `{ids?, documents, metadatas}`
    Ingest {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Wake up the inference backend
    Wake {
        /// Only report whether the backend is warm
        #[arg(long)]
        status: bool,
    },
    /// Show current configuration
    Config,
}
