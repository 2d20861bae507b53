//! API request and response types

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::llm::MAX_PUBLIC_TOKENS;
use crate::vector_store::DocumentBatch;

/// Longest accepted chat query, in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            details: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// `POST /api/chat` body.
///
/// Fields are kept as raw JSON so a wrong type is reported as a validation
/// message rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
    #[serde(default)]
    pub top_p: Option<Value>,
}

/// A chat request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedChat {
    pub query: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

impl ChatRequest {
    /// Typed values from a non-HTTP caller, checked by the same rules
    pub fn from_parts(
        query: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        top_p: Option<f32>,
    ) -> Self {
        Self {
            query: Some(Value::from(query)),
            temperature: temperature.map(Value::from),
            max_tokens: max_tokens.map(Value::from),
            top_p: top_p.map(Value::from),
        }
    }

    /// Check every field and collect all problems at once
    pub fn validate(&self) -> Result<ValidatedChat, Vec<String>> {
        let mut errors = Vec::new();

        let query = self
            .query
            .as_ref()
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty());
        if query.is_none() {
            errors.push("Query is required and must be a non-empty string".to_string());
        }
        if let Some(q) = self.query.as_ref().and_then(Value::as_str) {
            if q.chars().count() > MAX_QUERY_CHARS {
                errors.push(format!(
                    "Query must be less than {MAX_QUERY_CHARS} characters"
                ));
            }
        }

        let temperature = unit_interval(self.temperature.as_ref());
        if temperature.is_err() {
            errors.push("Temperature must be a number between 0 and 1".to_string());
        }

        let max_tokens = token_count(self.max_tokens.as_ref());
        if max_tokens.is_err() {
            errors.push(format!(
                "Max tokens must be an integer between 1 and {MAX_PUBLIC_TOKENS}"
            ));
        }

        let top_p = unit_interval(self.top_p.as_ref());
        if top_p.is_err() {
            errors.push("Top P must be a number between 0 and 1".to_string());
        }

        match (query, temperature, max_tokens, top_p) {
            (Some(query), Ok(temperature), Ok(max_tokens), Ok(top_p)) if errors.is_empty() => {
                Ok(ValidatedChat {
                    query: query.to_string(),
                    temperature,
                    max_tokens,
                    top_p,
                })
            }
            _ => Err(errors),
        }
    }
}

fn unit_interval(value: Option<&Value>) -> Result<Option<f32>, ()> {
    match value {
        None => Ok(None),
        Some(v) => match v.as_f64() {
            Some(n) if (0.0..=1.0).contains(&n) => Ok(Some(n as f32)),
            _ => Err(()),
        },
    }
}

fn token_count(value: Option<&Value>) -> Result<Option<u32>, ()> {
    match value {
        None => Ok(None),
        Some(v) => match v.as_f64() {
            Some(n) if n.fract() == 0.0 && (1.0..=f64::from(MAX_PUBLIC_TOKENS)).contains(&n) => {
                Ok(Some(n as u32))
            }
            _ => Err(()),
        },
    }
}

/// `data` of a successful chat response
#[derive(Debug, Serialize)]
pub struct ChatData {
    pub response: String,
    pub metadata: Value,
}

/// `POST /api/documents` body, also the file format of `fischgpt ingest`
#[derive(Debug, Deserialize)]
pub struct AddDocumentsRequest {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    pub documents: Vec<String>,
    #[serde(default)]
    pub metadatas: Option<Vec<Value>>,
    #[serde(default)]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl AddDocumentsRequest {
    /// Fill in what the caller left out: a fresh UUID per document when
    /// `ids` is absent, an empty object per document when `metadatas` is.
    ///
    /// Lengths are not checked here; see [`DocumentBatch::check_lengths`].
    pub fn into_batch(self) -> DocumentBatch {
        let ids = self.ids.unwrap_or_else(|| {
            self.documents
                .iter()
                .map(|_| Uuid::new_v4().to_string())
                .collect()
        });
        let metadatas = self
            .metadatas
            .unwrap_or_else(|| vec![Value::Object(Map::new()); self.documents.len()]);

        DocumentBatch {
            ids,
            documents: self.documents,
            metadatas,
            embeddings: self.embeddings,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddDocumentsResponse {
    pub message: String,
    pub count: usize,
    pub ids: Vec<String>,
}

/// Body of an unexpected server-side failure
#[derive(Debug, Serialize)]
pub struct InternalErrorResponse {
    pub error: String,
    pub details: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationHealth {
    pub status: String,
    pub system_prompt_tokens: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub gpt_service: GenerationHealth,
    pub uptime: f64,
    pub environment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub status: String,
    pub uptime: f64,
    pub timestamp: DateTime<Utc>,
    pub service: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub success: bool,
    pub version: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

/// `POST /api/wake` response
#[derive(Debug, Serialize)]
pub struct WakeAccepted {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// `GET /api/wake/status` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeStatusResponse {
    pub success: bool,
    pub warmed_up: bool,
    pub responding: bool,
    pub response_time: Option<u64>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/wake/force` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeForceResponse {
    pub success: bool,
    pub wake_up_time: Option<f64>,
    pub status: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
