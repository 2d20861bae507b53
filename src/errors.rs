use thiserror::Error;

use crate::llm::GenerationError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Config loading error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl GatewayError {
    /// Failures on the retrieval path. These are absorbed by the retriever
    /// and never reach the caller of a chat request.
    pub fn is_retrieval(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingError(_) | Self::VectorStoreError(_) | Self::HttpError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
