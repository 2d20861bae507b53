//! Vector store access
//!
//! The store is a remote service; this module only speaks its query,
//! count and add operations. Index internals live on the other side.

pub mod chroma;

use async_trait::async_trait;
pub use chroma::ChromaClient;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::errors::Result;

/// Default number of nearest neighbours requested per query
pub const DEFAULT_N_RESULTS: usize = 5;

/// What a similarity query is keyed on
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// Raw text, embedded by the store
    Text(String),
    /// A vector embedded on our side
    Embedding(Vec<f32>),
}

/// Raw query response: one inner list per query, parallel across fields.
///
/// Any entry may be `null` in the store's response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    pub metadatas: Vec<Vec<Option<Value>>>,
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
}

impl QueryResult {
    /// Columns for the first (and only) query
    pub fn into_first(self) -> (Vec<Option<String>>, Vec<Option<Value>>, Vec<Option<f64>>) {
        (
            self.documents.into_iter().next().unwrap_or_default(),
            self.metadatas.into_iter().next().unwrap_or_default(),
            self.distances.into_iter().next().unwrap_or_default(),
        )
    }
}

/// Documents written in one `add` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentBatch {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl DocumentBatch {
    /// Parallel sequences must line up one-to-one
    pub fn check_lengths(&self) -> std::result::Result<(), String> {
        let n = self.documents.len();
        if n == 0 {
            return Err("documents must not be empty".to_string());
        }
        if self.ids.len() != n {
            return Err(format!("ids has {} entries, documents has {n}", self.ids.len()));
        }
        if self.metadatas.len() != n {
            return Err(format!(
                "metadatas has {} entries, documents has {n}",
                self.metadatas.len()
            ));
        }
        if let Some(embeddings) = &self.embeddings {
            if embeddings.len() != n {
                return Err(format!(
                    "embeddings has {} entries, documents has {n}",
                    embeddings.len()
                ));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// A remote document collection
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Number of indexed documents
    async fn count(&self) -> Result<usize>;

    /// Nearest neighbours with documents, metadatas and distances
    async fn query(&self, input: QueryInput, n_results: usize) -> Result<QueryResult>;

    /// Ingest a batch of documents
    async fn add(&self, batch: DocumentBatch) -> Result<()>;
}
