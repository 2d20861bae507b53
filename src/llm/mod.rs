//! Remote text generation
//!
//! Talks to the hosted fine-tuned model. All response-shape quirks are
//! handled in [`client::normalize_prediction`]; everything past this module
//! sees a [`GenerationResult`].

pub mod client;
pub mod wake;

use async_trait::async_trait;
pub use client::GenerationClient;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
pub use wake::WakeClient;
pub use wake::WakeService;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default budget. The remote side counts the whole prompt, injected context
/// included, against this number.
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Default nucleus sampling
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Largest `maxTokens` a chat caller may request
pub const MAX_PUBLIC_TOKENS: u32 = 300;

/// Sampling parameters sent with every prompt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl GenerationParams {
    /// Fill unset values from `defaults`
    pub fn resolve(
        defaults: Self,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        top_p: Option<f32>,
    ) -> Self {
        Self {
            temperature: temperature.unwrap_or(defaults.temperature),
            max_tokens: max_tokens.unwrap_or(defaults.max_tokens),
            top_p: top_p.unwrap_or(defaults.top_p),
        }
    }
}

impl From<&crate::config::GenerationConfig> for GenerationParams {
    fn from(config: &crate::config::GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        }
    }
}

/// Canonical model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub metadata: Value,
}

/// Why a generation call failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Deadline exceeded
    #[error("Request timeout - the AI service is taking too long to respond")]
    Timeout,

    /// The service answered with an explicit error
    #[error("AI API Error: {0}")]
    RemoteError(String),

    /// No response at all
    #[error("Unable to reach the AI service - please try again later ({0})")]
    Unreachable(String),

    #[error("{0}")]
    Unknown(String),
}

impl GenerationError {
    /// Stable label for logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RemoteError(_) => "remote_error",
            Self::Unreachable(_) => "unreachable",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A model endpoint that turns prompts into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<GenerationResult, GenerationError>;

    /// Cheap end-to-end probe; `true` when the model answers
    async fn check_health(&self) -> bool {
        let params = GenerationParams {
            temperature: 0.1,
            max_tokens: MAX_PUBLIC_TOKENS,
            ..GenerationParams::default()
        };
        match self.generate("Hello", &params).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Generation health check failed: {}", e);
                false
            }
        }
    }
}
