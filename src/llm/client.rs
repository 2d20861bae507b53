//! Client for the hosted model's predict endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;
use tracing::debug;
use tracing::error;
use tracing::info;

use super::GenerationError;
use super::GenerationParams;
use super::GenerationResult;
use super::TextGenerator;
use crate::config::GenerationConfig;
use crate::errors::GatewayError;

/// Client for `POST {endpoint}/api/predict`
#[derive(Clone)]
pub struct GenerationClient {
    predict_url: String,
    client: Client,
}

impl GenerationClient {
    pub fn new(endpoint: &str, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        Ok(Self {
            predict_url: format!("{}/api/predict", endpoint.trim_end_matches('/')),
            client,
        })
    }

    pub fn from_config(config: &GenerationConfig) -> crate::Result<Self> {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

/// The two shapes the endpoint answers with
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictionEnvelope {
    /// `{ "data": [ payload, ... ] }`
    Wrapped { data: Vec<Value> },
    /// `{ "response": ..., "metadata": ..., "error": ... }`
    Bare(PredictionPayload),
}

#[derive(Deserialize, Default)]
struct PredictionPayload {
    #[serde(default)]
    response: Option<Value>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Unwrap any known response shape into a [`GenerationResult`].
///
/// An `error` field becomes [`GenerationError::RemoteError`]. Anything
/// without a usable `response` is [`GenerationError::Unknown`].
pub fn normalize_prediction(raw: Value) -> Result<GenerationResult, GenerationError> {
    let envelope: PredictionEnvelope = serde_json::from_value(raw)
        .map_err(|e| GenerationError::Unknown(format!("Unexpected AI API response shape: {e}")))?;

    let payload = match envelope {
        PredictionEnvelope::Bare(payload) => payload,
        PredictionEnvelope::Wrapped { data } => {
            let first = data.into_iter().next().ok_or_else(|| {
                GenerationError::Unknown("AI API returned an empty data array".to_string())
            })?;
            match first {
                // Plain Gradio output: the text itself
                Value::String(text) => PredictionPayload {
                    response: Some(Value::String(text)),
                    ..PredictionPayload::default()
                },
                other => serde_json::from_value(other).map_err(|e| {
                    GenerationError::Unknown(format!("Unexpected AI API payload: {e}"))
                })?,
            }
        }
    };

    if let Some(err) = payload.error.filter(has_content) {
        let message = match err {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return Err(GenerationError::RemoteError(message));
    }

    match payload.response {
        Some(Value::String(text)) => Ok(GenerationResult {
            text,
            metadata: payload.metadata.unwrap_or_else(|| json!({})),
        }),
        _ => Err(GenerationError::Unknown(
            "AI API response is missing the response text".to_string(),
        )),
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Map a transport failure onto the taxonomy
pub fn classify_transport_error(err: &reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else if err.is_connect() || err.is_request() {
        GenerationError::Unreachable(err.to_string())
    } else {
        GenerationError::Unknown(err.to_string())
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResult, GenerationError> {
        info!(
            prompt_chars = prompt.len(),
            temperature = params.temperature,
            max_tokens = params.max_tokens,
            top_p = params.top_p,
            "Sending request to AI API"
        );

        let body = json!({
            "data": [prompt, params.temperature, params.max_tokens, params.top_p]
        });

        let response = self
            .client
            .post(&self.predict_url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let err = classify_transport_error(&e);
                error!(kind = err.kind(), "AI API request failed: {}", e);
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(%status, body = %error_text, "AI API returned an error status");
            return Err(GenerationError::RemoteError(format!(
                "AI API returned {status}: {error_text}"
            )));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| classify_transport_error(&e))?;
        debug!("Raw AI API response: {}", raw);

        let result = normalize_prediction(raw).map_err(|e| {
            error!(kind = e.kind(), "AI API returned error: {}", e);
            e
        })?;

        info!(response_chars = result.text.len(), "AI API response received");
        Ok(result)
    }
}
