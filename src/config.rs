use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::embeddings::DEFAULT_EMBEDDING_DIM;
use crate::rag::ranking::RELEVANCE_DISTANCE_THRESHOLD;
use crate::vector_store::DEFAULT_N_RESULTS;
use crate::GatewayError;

/// Prefix for environment overrides, e.g. `FISCHGPT__SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "FISCHGPT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Restrict CORS to this origin instead of allowing any
    pub frontend_url: Option<String>,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: true,
            frontend_url: None,
            environment: "development".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub endpoint: String,
    pub model: String,
    pub dimension: usize,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

fn default_embeddings_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        let model = default_embeddings_model();
        Self {
            endpoint: format!(
                "https://router.huggingface.co/hf-inference/models/{model}/pipeline/feature-extraction"
            ),
            model,
            dimension: DEFAULT_EMBEDDING_DIM,
            api_token: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub base_url: String,
    pub tenant: Option<String>,
    pub database: String,
    pub collection: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.trychroma.com".to_string(),
            tenant: None,
            database: "fischgpt".to_string(),
            collection: "fischgpt".to_string(),
            api_token: None,
            timeout_secs: 10,
        }
    }
}

/// How the query reaches the vector store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// Embed locally, send the vector
    Embedding,
    /// Send raw text, the store embeds server-side
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub max_documents: usize,
    pub distance_threshold: f64,
    pub query_mode: QueryMode,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_N_RESULTS,
            distance_threshold: RELEVANCE_DISTANCE_THRESHOLD,
            query_mode: QueryMode::Embedding,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    /// Counts prompt and output tokens on the remote side
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://kristianfischerai12345-fischgpt-api.hf.space".to_string(),
            timeout_secs: 90,
            temperature: 0.8,
            max_tokens: 400,
            top_p: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub status_timeout_secs: u64,
    pub warm_threshold_ms: u64,
    pub queue_capacity: usize,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            url: "https://kristianfischerai12345-fischgpt-api.hf.space/api/wake-up".to_string(),
            timeout_secs: 90,
            status_timeout_secs: 10,
            warm_threshold_ms: 5000,
            queue_capacity: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    pub name: String,
    /// Object pronoun the fine-tuned prompt uses for the subject
    pub pronoun: String,
    pub description: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            name: "Kristian Fischer".to_string(),
            pronoun: "him".to_string(),
            description: "Software Developer & AI/ML Engineer".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub vector_store: VectorStoreConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub wake: WakeConfig,
    pub subject: SubjectConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;
        config.apply_env_fallbacks();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a file layered with `FISCHGPT__*` environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = settings.try_deserialize()?;
        config.apply_env_fallbacks();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::load_from("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::load_from("config.example.toml")
        } else {
            Err(GatewayError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Fill unset credentials from the variables the deployment already exports
    fn apply_env_fallbacks(&mut self) {
        fill_from_env(&mut self.embeddings.api_token, "HUGGINGFACE_API_TOKEN");
        fill_from_env(&mut self.vector_store.api_token, "CHROMA_API_TOKEN");
        fill_from_env(&mut self.vector_store.tenant, "CHROMA_TENANT_ID");
        fill_from_env(&mut self.server.frontend_url, "FRONTEND_URL");
    }

    /// Reject values that can never work at runtime.
    ///
    /// Missing credentials are not rejected here: they fail fast inside the
    /// client that needs them, and retrieval degrades to an empty context.
    pub fn validate(&self) -> crate::Result<()> {
        let mut problems = Vec::new();

        if !(0.0..=1.0).contains(&self.generation.temperature) {
            problems.push("generation.temperature must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&self.generation.top_p) {
            problems.push("generation.top_p must be in [0.0, 1.0]");
        }
        if self.generation.max_tokens == 0 {
            problems.push("generation.max_tokens must be > 0");
        }
        if self.retrieval.max_documents == 0 {
            problems.push("retrieval.max_documents must be >= 1");
        }
        if !self.retrieval.distance_threshold.is_finite() || self.retrieval.distance_threshold <= 0.0
        {
            problems.push("retrieval.distance_threshold must be a positive number");
        }
        if self.embeddings.timeout_secs == 0
            || self.vector_store.timeout_secs == 0
            || self.generation.timeout_secs == 0
            || self.wake.timeout_secs == 0
        {
            problems.push("timeouts must be > 0 seconds");
        }
        if self.embeddings.dimension == 0 {
            problems.push("embeddings.dimension must be >= 1");
        }
        if self.wake.queue_capacity == 0 {
            problems.push("wake.queue_capacity must be >= 1");
        }
        if self.subject.name.trim().is_empty() {
            problems.push("subject.name must not be empty");
        }
        if self.subject.pronoun.trim().is_empty() {
            problems.push("subject.pronoun must not be empty");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::ConfigError(problems.join("; ")))
        }
    }

    /// Get bind address for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get subject name used in prompts
    pub fn subject_name(&self) -> &str {
        &self.subject.name
    }

    /// Whether both retrieval credentials are present
    pub fn has_retrieval_credentials(&self) -> bool {
        let store_ready = self.vector_store.api_token.is_some() && self.vector_store.tenant.is_some();
        match self.retrieval.query_mode {
            QueryMode::Embedding => store_ready && self.embeddings.api_token.is_some(),
            QueryMode::Text => store_ready,
        }
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.as_deref().map_or(true, str::is_empty) {
        *slot = std::env::var(var).ok().filter(|v| !v.is_empty());
    }
}
