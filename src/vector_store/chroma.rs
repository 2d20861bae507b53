//! Chroma HTTP API (v2) client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use url::Url;

use super::DocumentBatch;
use super::QueryInput;
use super::QueryResult;
use super::VectorStore;
use crate::config::VectorStoreConfig;
use crate::errors::GatewayError;
use crate::errors::Result;

const TOKEN_HEADER: &str = "X-Chroma-Token";

/// Handle on one collection in a hosted Chroma database.
///
/// Built once at startup and shared; holds no per-request state.
pub struct ChromaClient {
    base_url: Url,
    tenant: Option<String>,
    database: String,
    collection: String,
    api_token: Option<String>,
    client: Client,
}

impl ChromaClient {
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GatewayError::ConfigError(format!("Invalid vector_store.base_url: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::ConfigError(format!(
                "vector_store.base_url cannot be a base URL: {base_url}"
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        info!(
            database = %config.database,
            collection = %config.collection,
            has_token = config.api_token.is_some(),
            has_tenant = config.tenant.is_some(),
            "ChromaDB: client created"
        );

        Ok(Self {
            base_url,
            tenant: config.tenant.clone(),
            database: config.database.clone(),
            collection: config.collection.clone(),
            api_token: config.api_token.clone(),
            client,
        })
    }

    /// `{base}/api/v2/tenants/{t}/databases/{d}/collections/{c}/{operation}`
    pub fn operation_url(&self, operation: &str) -> Result<Url> {
        let tenant = self.tenant.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| {
            GatewayError::ConfigError("Missing required ChromaDB configuration: tenant".to_string())
        })?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::ConfigError("vector_store.base_url".to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "v2",
                "tenants",
                tenant,
                "databases",
                self.database.as_str(),
                "collections",
                self.collection.as_str(),
                operation,
            ]);
        Ok(url)
    }

    fn token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GatewayError::ConfigError(
                    "Missing required ChromaDB configuration: api token".to_string(),
                )
            })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .header(TOKEN_HEADER, self.token()?)
            .send()
            .await
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(GatewayError::VectorStoreError(format!(
            "ChromaDB API error ({status}): {error_text}"
        )))
    }
}

/// Body for `POST .../query`
pub fn query_body(input: &QueryInput, n_results: usize) -> Value {
    let mut body = json!({
        "n_results": n_results,
        "include": ["documents", "metadatas", "distances"],
    });
    match input {
        QueryInput::Text(text) => body["query_texts"] = json!([text]),
        QueryInput::Embedding(vector) => body["query_embeddings"] = json!([vector]),
    }
    body
}

#[async_trait]
impl VectorStore for ChromaClient {
    async fn count(&self) -> Result<usize> {
        let url = self.operation_url("count")?;
        let response = self.send(self.client.get(url)).await?;
        let count: u64 = response.json().await.map_err(|e| {
            GatewayError::VectorStoreError(format!("Failed to parse count response: {e}"))
        })?;
        Ok(count as usize)
    }

    async fn query(&self, input: QueryInput, n_results: usize) -> Result<QueryResult> {
        let url = self.operation_url("query")?;
        debug!("Calling ChromaDB query API: {}", url);

        let response = self
            .send(self.client.post(url).json(&query_body(&input, n_results)))
            .await?;

        response.json().await.map_err(|e| {
            GatewayError::VectorStoreError(format!("Failed to parse query response: {e}"))
        })
    }

    async fn add(&self, batch: DocumentBatch) -> Result<()> {
        batch
            .check_lengths()
            .map_err(|msg| GatewayError::ValidationError(vec![msg]))?;

        let url = self.operation_url("add")?;
        let count = batch.len();
        self.send(self.client.post(url).json(&batch)).await?;

        info!("ChromaDB: added {} documents", count);
        Ok(())
    }
}
