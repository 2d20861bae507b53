//! Shared fakes and stub servers for integration tests

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use fischgpt::config::QueryMode;
use fischgpt::embeddings::Embedder;
use fischgpt::llm::GenerationError;
use fischgpt::llm::GenerationParams;
use fischgpt::llm::GenerationResult;
use fischgpt::llm::TextGenerator;
use fischgpt::rag::RagService;
use fischgpt::vector_store::DocumentBatch;
use fischgpt::vector_store::QueryInput;
use fischgpt::vector_store::QueryResult;
use fischgpt::vector_store::VectorStore;
use fischgpt::AppConfig;
use fischgpt::GatewayError;
use fischgpt::Result;
use serde_json::json;
use serde_json::Value;

/// In-memory store returning a fixed query result
pub struct FakeStore {
    /// `None` makes `count` fail
    pub count: Option<usize>,
    /// `None` makes `query` fail
    pub result: Option<QueryResult>,
    pub fail_add: bool,
    pub count_calls: AtomicUsize,
    pub queries: Mutex<Vec<(QueryInput, usize)>>,
    pub added: Mutex<Vec<DocumentBatch>>,
}

impl FakeStore {
    /// A store holding `(content, metadata, distance)` matches in store order
    pub fn with_matches(matches: &[(&str, Value, f64)]) -> Self {
        let result = QueryResult {
            documents: vec![matches.iter().map(|m| Some(m.0.to_string())).collect()],
            metadatas: vec![matches.iter().map(|m| Some(m.1.clone())).collect()],
            distances: vec![matches.iter().map(|m| Some(m.2)).collect()],
        };
        Self {
            count: Some(matches.len()),
            result: Some(result),
            fail_add: false,
            count_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_matches(&[])
    }

    /// Every call fails like an unreachable store
    pub fn failing() -> Self {
        Self {
            count: None,
            result: None,
            fail_add: true,
            ..Self::empty()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn count(&self) -> Result<usize> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.count
            .ok_or_else(|| GatewayError::HttpError("connection refused".to_string()))
    }

    async fn query(&self, input: QueryInput, n_results: usize) -> Result<QueryResult> {
        self.queries.lock().unwrap().push((input, n_results));
        self.result
            .clone()
            .ok_or_else(|| GatewayError::VectorStoreError("query failed".to_string()))
    }

    async fn add(&self, batch: DocumentBatch) -> Result<()> {
        if self.fail_add {
            return Err(GatewayError::VectorStoreError("add failed".to_string()));
        }
        self.added.lock().unwrap().push(batch);
        Ok(())
    }
}

/// Deterministic embedder
#[derive(Default)]
pub struct FakeEmbedder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::EmbeddingError("model is loading".to_string()));
        }
        Ok(vec![text.len() as f32, 0.5, 0.25])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Generator that records prompts and returns a fixed reply
pub struct FakeGenerator {
    pub reply: std::result::Result<String, GenerationError>,
    pub prompts: Mutex<Vec<(String, GenerationParams)>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|(p, _)| p.clone())
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> std::result::Result<GenerationResult, GenerationError> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), *params));
        self.reply.clone().map(|text| GenerationResult {
            text,
            metadata: json!({"model": "fake"}),
        })
    }
}

pub fn test_config(mode: QueryMode) -> AppConfig {
    let mut config = AppConfig::default();
    config.retrieval.query_mode = mode;
    config
}

pub fn service(
    config: &AppConfig,
    store: Arc<FakeStore>,
    embedder: Arc<FakeEmbedder>,
    generator: Arc<FakeGenerator>,
) -> RagService {
    let embedder: Arc<dyn Embedder> = embedder;
    RagService::from_services(config, store, Some(embedder), generator)
}

/// The three experience/skills matches used across tests, plus one that is
/// too far away
pub fn resume_matches() -> Vec<(&'static str, Value, f64)> {
    vec![
        (
            "Built the data platform",
            json!({"section": "experience", "company": "Acme"}),
            1.5,
        ),
        (
            "Rust, Python, TypeScript",
            json!({"section": "skills", "subsection": "Languages"}),
            0.3,
        ),
        ("Unrelated hobby text", json!({"section": "other"}), 2.1),
        (
            "A fine-tuned GPT-2 assistant",
            json!({"section": "projects", "project_name": "FischGPT"}),
            0.9,
        ),
    ]
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A local URL nothing is listening on
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
