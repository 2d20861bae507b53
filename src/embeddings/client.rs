//! Feature-extraction API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::error;

use super::Embedder;
use crate::config::EmbeddingsConfig;
use crate::errors::GatewayError;
use crate::errors::Result;

/// Client for a Hugging Face style `feature-extraction` pipeline
pub struct EmbeddingClient {
    endpoint: String,
    api_token: Option<String>,
    /// Reject vectors of any other length when set
    dimension: Option<usize>,
    client: Client,
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}

impl EmbeddingClient {
    /// Create a new embedding client
    ///
    /// A missing token is accepted here; every call checks it before
    /// touching the network.
    pub fn new(endpoint: String, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        Ok(Self {
            endpoint,
            api_token,
            dimension: None,
            client,
        })
    }

    /// Require every returned vector to have `dimension` entries
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    pub fn from_config(config: &EmbeddingsConfig) -> Result<Self> {
        Ok(Self::new(
            config.endpoint.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_dimension(config.dimension))
    }

    fn token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                GatewayError::ConfigError(
                    "HUGGINGFACE_API_TOKEN environment variable is required".to_string(),
                )
            })
    }

    async fn request(&self, inputs: &[String]) -> Result<Value> {
        let token = self.token()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
            .json(&FeatureExtractionRequest { inputs })
            .send()
            .await
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(%status, body = %error_text, "Embeddings: request rejected");
            return Err(GatewayError::EmbeddingError(format!(
                "Hugging Face API error ({status}): {error_text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::EmbeddingError(format!("Failed to parse response: {e}")))
    }
}

/// Turn `[[f32, ...], ...]` into `expected` vectors, rejecting anything else.
///
/// With `dimension` set, every vector must have exactly that many entries.
pub fn parse_embeddings(
    value: &Value,
    expected: usize,
    dimension: Option<usize>,
) -> Result<Vec<Vec<f32>>> {
    let invalid = || {
        GatewayError::EmbeddingError("Invalid embeddings response from Hugging Face API".to_string())
    };

    let rows = value.as_array().ok_or_else(invalid)?;
    if rows.len() != expected {
        return Err(GatewayError::EmbeddingError(format!(
            "Expected {expected} embeddings, got {}",
            rows.len()
        )));
    }

    rows.iter()
        .map(|row| {
            let values = row.as_array().filter(|v| !v.is_empty()).ok_or_else(invalid)?;
            if let Some(dimension) = dimension {
                if values.len() != dimension {
                    return Err(GatewayError::EmbeddingError(format!(
                        "Expected {dimension}-dimensional embeddings, got {}",
                        values.len()
                    )));
                }
            }
            values
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32).ok_or_else(invalid))
                .collect()
        })
        .collect()
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        let embedding = embeddings.pop().ok_or_else(|| {
            GatewayError::EmbeddingError("No embedding in response".to_string())
        })?;
        debug!("Embeddings: Generated {}-dimensional embedding", embedding.len());
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let value = self.request(texts).await?;
        parse_embeddings(&value, texts.len(), self.dimension)
    }
}
