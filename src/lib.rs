//! FischGPT gateway: retrieval-augmented answers about one person.
//!
//! A question is embedded, matched against a remote vector store, filtered
//! by distance, formatted into a context block and wrapped into the prompt
//! format the hosted model was fine-tuned on.

pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod rag;
pub mod vector_store;


pub use config::AppConfig;
pub use errors::*;
