//! HTTP clients against local stub servers

mod common;

use std::time::Duration;

use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use common::dead_url;
use common::spawn_stub;
use fischgpt::config::EmbeddingsConfig;
use fischgpt::config::VectorStoreConfig;
use fischgpt::embeddings::Embedder;
use fischgpt::embeddings::EmbeddingClient;
use fischgpt::llm::GenerationClient;
use fischgpt::llm::GenerationError;
use fischgpt::llm::GenerationParams;
use fischgpt::llm::TextGenerator;
use fischgpt::vector_store::ChromaClient;
use fischgpt::vector_store::DocumentBatch;
use fischgpt::vector_store::QueryInput;
use fischgpt::vector_store::VectorStore;
use fischgpt::GatewayError;
use serde_json::json;
use serde_json::Value;

// ====== Generation client ======

async fn generation_stub(handler_reply: Value) -> String {
    let router = Router::new().route(
        "/api/predict",
        post(move || {
            let reply = handler_reply.clone();
            async move { Json(reply) }
        }),
    );
    spawn_stub(router).await
}

fn generation_client(base: &str) -> GenerationClient {
    GenerationClient::new(base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_request_body_is_positional_data() {
    // Echo the positional fields back so the test can see what was sent
    let router = Router::new().route(
        "/api/predict",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "data": [{
                    "response": body["data"][0],
                    "metadata": {
                        "temperature": body["data"][1],
                        "max_tokens": body["data"][2],
                        "top_p": body["data"][3],
                        "fields": body["data"].as_array().map(Vec::len),
                    }
                }]
            }))
        }),
    );
    let base = spawn_stub(router).await;

    let params = GenerationParams {
        temperature: 0.5,
        max_tokens: 123,
        top_p: 0.25,
    };
    let result = generation_client(&base)
        .generate("the prompt", &params)
        .await
        .unwrap();

    assert_eq!(result.text, "the prompt");
    assert_eq!(result.metadata["max_tokens"], 123);
    assert_eq!(result.metadata["temperature"], 0.5);
    assert_eq!(result.metadata["top_p"], 0.25);
    assert_eq!(result.metadata["fields"], 4);
}

#[tokio::test]
async fn test_wrapped_and_bare_responses_agree() {
    let payload = json!({"response": "Kristian builds things", "metadata": {"tokens": 42}});
    let wrapped = generation_stub(json!({"data": [payload.clone()], "duration": 0.7})).await;
    let bare = generation_stub(payload).await;
    let params = GenerationParams::default();

    let a = generation_client(&wrapped).generate("p", &params).await.unwrap();
    let b = generation_client(&bare).generate("p", &params).await.unwrap();

    assert_eq!(a, b);
    assert_eq!(a.text, "Kristian builds things");
}

#[tokio::test]
async fn test_error_payload_is_remote_error() {
    let base = generation_stub(json!({"data": [{"error": "CUDA out of memory"}]})).await;

    let err = generation_client(&base)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::RemoteError("CUDA out of memory".to_string()));
    assert_eq!(err.to_string(), "AI API Error: CUDA out of memory");
}

#[tokio::test]
async fn test_http_error_status_is_remote_error() {
    let router = Router::new().route(
        "/api/predict",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "Space is sleeping") }),
    );
    let base = spawn_stub(router).await;

    let err = generation_client(&base)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    match err {
        GenerationError::RemoteError(message) => {
            assert!(message.contains("503"));
            assert!(message.contains("Space is sleeping"));
        }
        other => panic!("expected RemoteError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_backend_is_timeout() {
    let router = Router::new().route(
        "/api/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let base = spawn_stub(router).await;

    let client = GenerationClient::new(&base, Duration::from_millis(200)).unwrap();
    let err = client
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, GenerationError::Timeout);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let base = dead_url().await;

    let err = generation_client(&base)
        .generate("p", &GenerationParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Unreachable(_)), "{err:?}");
}

#[tokio::test]
async fn test_health_check() {
    let healthy = generation_stub(json!({"response": "Hello!"})).await;
    assert!(generation_client(&healthy).check_health().await);

    let failing = generation_stub(json!({"error": "overloaded"})).await;
    assert!(!generation_client(&failing).check_health().await);
}

// ====== Embedding client ======

#[tokio::test]
async fn test_embedding_client_sends_token_and_parses() {
    let router = Router::new().route(
        "/embed",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            if headers.get("authorization").and_then(|v| v.to_str().ok())
                != Some("Bearer hf_test")
            {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad token"})));
            }
            let rows: Vec<Value> = body["inputs"]
                .as_array()
                .unwrap()
                .iter()
                .map(|_| json!([0.1, 0.2, 0.3]))
                .collect();
            (StatusCode::OK, Json(Value::Array(rows)))
        }),
    );
    let base = spawn_stub(router).await;

    let client = EmbeddingClient::new(
        format!("{base}/embed"),
        Some("hf_test".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    let vector = client.embed("hello").await.unwrap();
    assert_eq!(vector.len(), 3);

    let batch = client
        .embed_batch(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    assert_eq!(batch.len(), 2);

    let wrong = EmbeddingClient::new(
        format!("{base}/embed"),
        Some("nope".to_string()),
        Duration::from_secs(5),
    )
    .unwrap();
    assert!(matches!(
        wrong.embed("hello").await,
        Err(GatewayError::EmbeddingError(_))
    ));
}

#[tokio::test]
async fn test_embedding_client_rejects_wrong_dimension() {
    let router = Router::new().route(
        "/embed",
        post(|| async { Json(json!([[0.1, 0.2, 0.3]])) }),
    );
    let base = spawn_stub(router).await;

    let config = EmbeddingsConfig {
        endpoint: format!("{base}/embed"),
        api_token: Some("hf_test".to_string()),
        timeout_secs: 5,
        ..EmbeddingsConfig::default()
    };
    let client = EmbeddingClient::from_config(&config).unwrap();
    assert!(matches!(
        client.embed("hello").await,
        Err(GatewayError::EmbeddingError(_))
    ));

    let matching = EmbeddingClient::from_config(&EmbeddingsConfig {
        dimension: 3,
        ..config
    })
    .unwrap();
    assert_eq!(matching.embed("hello").await.unwrap().len(), 3);
}

// ====== Vector store client ======

const COLLECTION_PATH: &str = "/api/v2/tenants/t1/databases/db/collections/c1";

fn chroma_config(base: &str) -> VectorStoreConfig {
    VectorStoreConfig {
        base_url: base.to_string(),
        tenant: Some("t1".to_string()),
        database: "db".to_string(),
        collection: "c1".to_string(),
        api_token: Some("ck-test".to_string()),
        timeout_secs: 5,
    }
}

fn has_token(headers: &HeaderMap) -> bool {
    headers.get("x-chroma-token").and_then(|v| v.to_str().ok()) == Some("ck-test")
}

async fn chroma_stub() -> String {
    let router = Router::new()
        .route(
            &format!("{COLLECTION_PATH}/count"),
            get(|headers: HeaderMap| async move {
                if has_token(&headers) {
                    (StatusCode::OK, Json(json!(2)))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"})))
                }
            }),
        )
        .route(
            &format!("{COLLECTION_PATH}/query"),
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["include"], json!(["documents", "metadatas", "distances"]));
                assert!(body["query_embeddings"].is_array());
                Json(json!({
                    "ids": [["x", "y"]],
                    "documents": [["Rust", "Go"]],
                    "metadatas": [[{"section": "skills"}, null]],
                    "distances": [[0.2, 1.7]],
                    "n": body["n_results"]
                }))
            }),
        )
        .route(
            &format!("{COLLECTION_PATH}/add"),
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["ids"].as_array().map(Vec::len), Some(1));
                Json(json!(true))
            }),
        );
    spawn_stub(router).await
}

#[tokio::test]
async fn test_chroma_count_query_add() {
    let base = chroma_stub().await;
    let client = ChromaClient::new(&chroma_config(&base)).unwrap();

    assert_eq!(client.count().await.unwrap(), 2);

    let result = client
        .query(QueryInput::Embedding(vec![0.1, 0.2]), 2)
        .await
        .unwrap();
    let (docs, metas, dists) = result.into_first();
    assert_eq!(docs, vec![Some("Rust".to_string()), Some("Go".to_string())]);
    assert!(metas[1].is_none());
    assert_eq!(dists, vec![Some(0.2), Some(1.7)]);

    let batch = DocumentBatch {
        ids: vec!["doc-1".to_string()],
        documents: vec!["Rust".to_string()],
        metadatas: vec![json!({"section": "skills"})],
        embeddings: None,
    };
    client.add(batch).await.unwrap();
}

#[tokio::test]
async fn test_chroma_rejected_token_is_store_error() {
    let base = chroma_stub().await;
    let mut config = chroma_config(&base);
    config.api_token = Some("wrong".to_string());
    let client = ChromaClient::new(&config).unwrap();

    assert!(matches!(
        client.count().await,
        Err(GatewayError::VectorStoreError(_))
    ));
}

#[tokio::test]
async fn test_chroma_unreachable_is_retrieval_error() {
    let base = dead_url().await;
    let client = ChromaClient::new(&chroma_config(&base)).unwrap();

    let err = client.count().await.unwrap_err();
    assert!(err.is_retrieval());
}
