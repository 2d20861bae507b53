//! Embeddings generation module
//!
//! Converts text into fixed-length vectors using a remote feature-extraction
//! model (Hugging Face inference router by default).
//!
//! # Examples
//!
//! ```rust,no_run
//! use fischgpt::config::AppConfig;
//! use fischgpt::embeddings::{Embedder, EmbeddingClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_config(&config.embeddings)?;
//!
//!     let embedding = client.embed("What does Kristian work on?").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

use async_trait::async_trait;
pub use client::EmbeddingClient;

use crate::errors::Result;

/// Native dimensionality of all-MiniLM-L6-v2
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Anything that turns text into vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts in one round trip, preserving input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}
