//! RAG (Retrieval-Augmented Generation) module
//!
//! This module provides the query-time pipeline for answering questions
//! about the subject:
//! - Similarity search against the document store
//! - Relevance filtering and ranking by distance
//! - Context assembly from retrieved documents
//! - Prompt composition and answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use fischgpt::config::AppConfig;
//! use fischgpt::rag::RagService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::from_config(&config)?;
//!
//!     let context = service.perform_rag("What languages does he use?").await;
//!     println!("Context:\n{context}");
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod retriever;

pub use context::format_documents_as_context;
pub use pipeline::ChatAnswer;
pub use pipeline::RagService;
pub use prompts::build_full_prompt;
pub use prompts::estimate_token_count;
pub use ranking::filter_and_rank;
pub use ranking::RELEVANCE_DISTANCE_THRESHOLD;
pub use retriever::Retriever;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Document category, drives the label in the formatted context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Skills,
    Experience,
    Projects,
    Education,
    Contact,
    #[default]
    #[serde(other)]
    Other,
}

/// Metadata stored next to each document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub section: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Keys we do not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentMetadata {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_subsection(mut self, subsection: impl Into<String>) -> Self {
        self.subsection = Some(subsection.into());
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.project_name = Some(project_name.into());
        self
    }
}

/// One match that survived the relevance filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Smaller is more relevant
    pub distance: f64,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>, metadata: DocumentMetadata, distance: f64) -> Self {
        Self {
            content: content.into(),
            metadata,
            distance,
        }
    }
}
