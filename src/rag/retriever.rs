//! Retrieval: embed, query the store, filter and rank

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::ranking::filter_and_rank;
use super::RetrievedDocument;
use crate::config::QueryMode;
use crate::config::RetrievalConfig;
use crate::embeddings::Embedder;
use crate::errors::GatewayError;
use crate::errors::Result;
use crate::vector_store::QueryInput;
use crate::vector_store::VectorStore;

/// Similarity search over the document store
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Option<Arc<dyn Embedder>>,
    mode: QueryMode,
    threshold: f64,
    max_documents: usize,
}

impl Retriever {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Option<Arc<dyn Embedder>>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            mode: config.query_mode,
            threshold: config.distance_threshold,
            max_documents: config.max_documents,
        }
    }

    pub fn max_documents(&self) -> usize {
        self.max_documents
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Relevant documents for `query`, nearest first.
    ///
    /// Never fails. Any embedding or store problem is logged and yields an
    /// empty result, so the caller falls back to a context-free prompt.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<RetrievedDocument> {
        match self.try_search(query, limit).await {
            Ok(documents) => documents,
            Err(e @ GatewayError::ConfigError(_)) => {
                error!("RAG: retrieval is not configured: {}", e);
                Vec::new()
            }
            Err(e) => {
                if e.is_retrieval() {
                    warn!("RAG: retrieval failed, continuing without context: {}", e);
                } else {
                    error!("RAG: unexpected retrieval error: {}", e);
                }
                Vec::new()
            }
        }
    }

    /// Same as [`Self::search`] but surfaces the failure
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<RetrievedDocument>> {
        let count = self.store.count().await?;
        if count == 0 {
            warn!("RAG: no documents in the collection");
            return Ok(Vec::new());
        }
        debug!(count, "RAG: collection size");

        let input = match self.mode {
            QueryMode::Text => QueryInput::Text(query.to_string()),
            QueryMode::Embedding => {
                let embedder = self.embedder.as_ref().ok_or_else(|| {
                    GatewayError::ConfigError(
                        "embedding query mode needs an embedding client".to_string(),
                    )
                })?;
                QueryInput::Embedding(embedder.embed(query).await?)
            }
        };

        let n_results = limit.clamp(1, count);
        let (documents, metadatas, distances) =
            self.store.query(input, n_results).await?.into_first();
        let raw = documents.len();

        let relevant = filter_and_rank(documents, metadatas, distances, self.threshold);
        info!(
            raw,
            relevant = relevant.len(),
            threshold = self.threshold,
            "RAG: retrieved documents"
        );

        Ok(relevant)
    }
}
