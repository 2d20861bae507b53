//! Complete RAG pipeline: Retrieve -> Format -> Prompt -> Generate

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::context::format_documents_as_context;
use super::prompts::build_full_prompt;
use super::Retriever;
use crate::config::AppConfig;
use crate::config::QueryMode;
use crate::config::SubjectConfig;
use crate::embeddings::Embedder;
use crate::embeddings::EmbeddingClient;
use crate::errors::GatewayError;
use crate::errors::Result;
use crate::llm::GenerationClient;
use crate::llm::GenerationError;
use crate::llm::GenerationParams;
use crate::llm::GenerationResult;
use crate::llm::TextGenerator;
use crate::vector_store::ChromaClient;
use crate::vector_store::DocumentBatch;
use crate::vector_store::VectorStore;

/// Generated answer plus what went into it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    #[serde(flatten)]
    pub result: GenerationResult,
    pub documents_used: usize,
    pub context_chars: usize,
    /// Formatted context the prompt was built from, empty when none
    #[serde(skip)]
    pub context: String,
    /// Exact text sent to the model
    #[serde(skip)]
    pub prompt: String,
}

/// Query-time orchestration over injected clients
pub struct RagService {
    retriever: Retriever,
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn VectorStore>,
    embedder: Option<Arc<dyn Embedder>>,
    query_mode: QueryMode,
    subject: SubjectConfig,
}

impl RagService {
    /// Build every client from configuration.
    ///
    /// # Errors
    /// - HTTP client construction errors
    /// - Invalid vector store base URL
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn VectorStore> = Arc::new(ChromaClient::new(&config.vector_store)?);
        let embedder: Arc<dyn Embedder> =
            Arc::new(EmbeddingClient::from_config(&config.embeddings)?);
        let generator: Arc<dyn TextGenerator> =
            Arc::new(GenerationClient::from_config(&config.generation)?);

        Ok(Self::from_services(config, store, Some(embedder), generator))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        config: &AppConfig,
        store: Arc<dyn VectorStore>,
        embedder: Option<Arc<dyn Embedder>>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let retriever = Retriever::new(Arc::clone(&store), embedder.clone(), &config.retrieval);
        Self {
            retriever,
            generator,
            store,
            embedder,
            query_mode: config.retrieval.query_mode,
            subject: config.subject.clone(),
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn generator(&self) -> Arc<dyn TextGenerator> {
        Arc::clone(&self.generator)
    }

    pub fn subject(&self) -> &str {
        &self.subject.name
    }

    /// Retrieve and format context for `query`. Never fails; an empty
    /// string means no usable context.
    pub async fn perform_rag(&self, query: &str) -> String {
        self.retrieve_context(query).await.0
    }

    async fn retrieve_context(&self, query: &str) -> (String, usize) {
        let documents = self
            .retriever
            .search(query, self.retriever.max_documents())
            .await;
        let context = format_documents_as_context(&documents);

        if context.is_empty() {
            warn!("RAG: no context generated, answering without retrieval");
        } else {
            info!(
                documents = documents.len(),
                chars = context.len(),
                "RAG: generated context for query"
            );
        }

        (context, documents.len())
    }

    /// Prompt for `query` given already formatted context
    pub fn build_prompt(&self, query: &str, context: &str) -> String {
        build_full_prompt(&self.subject, query, context)
    }

    /// Answer a question end to end.
    ///
    /// Retrieval problems never surface here; only generation failures do.
    pub async fn answer(
        &self,
        query: &str,
        params: &GenerationParams,
    ) -> std::result::Result<ChatAnswer, GenerationError> {
        let started = std::time::Instant::now();
        let (context, documents_used) = self.retrieve_context(query).await;
        let prompt = self.build_prompt(query, &context);
        debug!(prompt_chars = prompt.len(), "RAG: prompt composed");

        let result = self.generator.generate(&prompt, params).await?;
        log_latency(started.elapsed(), documents_used);

        Ok(ChatAnswer {
            result,
            documents_used,
            context_chars: context.len(),
            context,
            prompt,
        })
    }

    /// Write documents to the store, embedding them first when the store
    /// is queried by vector and the batch carries no vectors.
    ///
    /// # Errors
    /// - Length mismatch between ids, documents and metadatas
    /// - Embedding or store failures
    pub async fn ingest(&self, mut batch: DocumentBatch) -> Result<usize> {
        batch
            .check_lengths()
            .map_err(|e| GatewayError::ValidationError(vec![e]))?;

        if self.query_mode == QueryMode::Embedding && batch.embeddings.is_none() {
            let embedder = self.embedder.as_ref().ok_or_else(|| {
                GatewayError::ConfigError("embedding query mode needs an embedding client".into())
            })?;
            let vectors = embedder.embed_batch(&batch.documents).await?;
            if vectors.len() != batch.len() {
                return Err(GatewayError::EmbeddingError(format!(
                    "expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }
            batch.embeddings = Some(vectors);
        }

        let count = batch.len();
        self.store.add(batch).await?;
        info!(count, "Documents added to the collection");
        Ok(count)
    }
}

fn log_latency(elapsed: Duration, documents_used: usize) {
    info!(
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        documents_used,
        "RAG: answer generated"
    );
}
