//! End-to-end pipeline behaviour over fake collaborators

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use fischgpt::config::QueryMode;
use fischgpt::llm::GenerationError;
use fischgpt::llm::GenerationParams;
use fischgpt::vector_store::DocumentBatch;
use fischgpt::vector_store::QueryInput;
use fischgpt::GatewayError;
use serde_json::json;

const EXPECTED_CONTEXT: &str = "Languages: Rust, Python, TypeScript\n\
                                Project: A fine-tuned GPT-2 assistant (FischGPT)\n\
                                Work Experience: Built the data platform (at Acme)";

#[tokio::test]
async fn test_context_is_filtered_and_ordered() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::with_matches(&resume_matches()));
    let service = service(
        &config,
        store.clone(),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let context = service.perform_rag("What does he know?").await;
    assert_eq!(context, EXPECTED_CONTEXT);
    assert!(!context.contains("Unrelated hobby text"));
}

#[tokio::test]
async fn test_answer_puts_context_before_question() {
    let config = test_config(QueryMode::Embedding);
    let generator = Arc::new(FakeGenerator::replying("He writes Rust."));
    let service = service(
        &config,
        Arc::new(FakeStore::with_matches(&resume_matches())),
        Arc::new(FakeEmbedder::default()),
        generator.clone(),
    );

    let answer = service
        .answer("Which languages?", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(answer.result.text, "He writes Rust.");
    assert_eq!(answer.documents_used, 3);
    assert_eq!(answer.context_chars, EXPECTED_CONTEXT.len());

    let prompt = generator.last_prompt().unwrap();
    assert_eq!(
        prompt,
        format!(
            "I'm looking for information about Kristian Fischer. Here's what I know about him:\n\n\
             {EXPECTED_CONTEXT}\n\nBased on this information: Which languages?"
        )
    );
    // The answer carries exactly what was sent, not a second retrieval
    assert_eq!(answer.context, EXPECTED_CONTEXT);
    assert_eq!(answer.prompt, prompt);
}

#[tokio::test]
async fn test_store_failure_degrades_to_fallback_prompt() {
    let config = test_config(QueryMode::Embedding);
    let generator = Arc::new(FakeGenerator::replying("Still answering"));
    let service = service(
        &config,
        Arc::new(FakeStore::failing()),
        Arc::new(FakeEmbedder::default()),
        generator.clone(),
    );

    let answer = service
        .answer("Where did he study?", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(answer.result.text, "Still answering");
    assert_eq!(answer.documents_used, 0);
    assert_eq!(
        generator.last_prompt().unwrap(),
        "Tell me about Kristian Fischer: Where did he study?"
    );
}

#[tokio::test]
async fn test_embedding_failure_degrades_without_querying() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::with_matches(&resume_matches()));
    let generator = Arc::new(FakeGenerator::replying("ok"));
    let service = service(
        &config,
        store.clone(),
        Arc::new(FakeEmbedder::failing()),
        generator.clone(),
    );

    assert_eq!(service.perform_rag("anything").await, "");
    assert_eq!(store.query_count(), 0);

    service
        .answer("anything", &GenerationParams::default())
        .await
        .unwrap();
    assert_eq!(
        generator.last_prompt().unwrap(),
        "Tell me about Kristian Fischer: anything"
    );
}

#[tokio::test]
async fn test_empty_collection_short_circuits() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::empty());
    let embedder = Arc::new(FakeEmbedder::default());
    let service = service(
        &config,
        store.clone(),
        embedder.clone(),
        Arc::new(FakeGenerator::replying("ok")),
    );

    assert_eq!(service.perform_rag("skills?").await, "");
    assert_eq!(store.count_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.query_count(), 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_retrieval_is_deterministic() {
    let config = test_config(QueryMode::Embedding);
    let service = service(
        &config,
        Arc::new(FakeStore::with_matches(&resume_matches())),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let first = service.perform_rag("same question").await;
    let second = service.perform_rag("same question").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_generation_failure_is_surfaced() {
    let config = test_config(QueryMode::Embedding);
    let service = service(
        &config,
        Arc::new(FakeStore::with_matches(&resume_matches())),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::failing(GenerationError::Timeout)),
    );

    let err = service
        .answer("hello", &GenerationParams::default())
        .await
        .unwrap_err();
    assert_eq!(err, GenerationError::Timeout);
}

#[tokio::test]
async fn test_embedding_mode_sends_vector() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::with_matches(&resume_matches()));
    let embedder = Arc::new(FakeEmbedder::default());
    let service = service(
        &config,
        store.clone(),
        embedder.clone(),
        Arc::new(FakeGenerator::replying("ok")),
    );

    service.perform_rag("abc").await;

    let queries = store.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, QueryInput::Embedding(vec![3.0, 0.5, 0.25]));
    // Four documents stored, five requested
    assert_eq!(queries[0].1, 4);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_text_mode_sends_raw_query() {
    let config = test_config(QueryMode::Text);
    let store = Arc::new(FakeStore::with_matches(&resume_matches()));
    let embedder = Arc::new(FakeEmbedder::default());
    let service = service(
        &config,
        store.clone(),
        embedder.clone(),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let context = service.perform_rag("What projects?").await;
    assert_eq!(context, EXPECTED_CONTEXT);

    let queries = store.queries.lock().unwrap();
    assert_eq!(queries[0].0, QueryInput::Text("What projects?".to_string()));
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_threshold_applies() {
    let mut config = test_config(QueryMode::Embedding);
    config.retrieval.distance_threshold = 1.0;
    let service = service(
        &config,
        Arc::new(FakeStore::with_matches(&resume_matches())),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let documents = service.retriever().search("q", 5).await;
    let distances: Vec<f64> = documents.iter().map(|d| d.distance).collect();
    assert_eq!(distances, vec![0.3, 0.9]);
}

#[tokio::test]
async fn test_try_search_surfaces_store_error() {
    let config = test_config(QueryMode::Embedding);
    let service = service(
        &config,
        Arc::new(FakeStore::failing()),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let err = service.retriever().try_search("q", 5).await.unwrap_err();
    assert!(err.is_retrieval());
}

#[tokio::test]
async fn test_ingest_embeds_missing_vectors() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::empty());
    let embedder = Arc::new(FakeEmbedder::default());
    let service = service(
        &config,
        store.clone(),
        embedder.clone(),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let batch = DocumentBatch {
        ids: vec!["a".into(), "b".into()],
        documents: vec!["one".into(), "three".into()],
        metadatas: vec![json!({"section": "skills"}), json!({"section": "contact"})],
        embeddings: None,
    };
    assert_eq!(service.ingest(batch).await.unwrap(), 2);

    let added = store.added.lock().unwrap();
    let vectors = added[0].embeddings.as_ref().unwrap();
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[1][0], 5.0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_ingest_text_mode_leaves_embedding_to_store() {
    let config = test_config(QueryMode::Text);
    let store = Arc::new(FakeStore::empty());
    let embedder = Arc::new(FakeEmbedder::default());
    let service = service(
        &config,
        store.clone(),
        embedder.clone(),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let batch = DocumentBatch {
        ids: vec!["a".into()],
        documents: vec!["one".into()],
        metadatas: vec![json!({})],
        embeddings: None,
    };
    service.ingest(batch).await.unwrap();

    assert!(store.added.lock().unwrap()[0].embeddings.is_none());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ingest_rejects_length_mismatch() {
    let config = test_config(QueryMode::Embedding);
    let store = Arc::new(FakeStore::empty());
    let service = service(
        &config,
        store.clone(),
        Arc::new(FakeEmbedder::default()),
        Arc::new(FakeGenerator::replying("ok")),
    );

    let batch = DocumentBatch {
        ids: vec!["a".into()],
        documents: vec!["one".into(), "two".into()],
        metadatas: vec![json!({}), json!({})],
        embeddings: None,
    };
    let err = service.ingest(batch).await.unwrap_err();
    assert!(matches!(err, GatewayError::ValidationError(_)));
    assert!(store.added.lock().unwrap().is_empty());
}
