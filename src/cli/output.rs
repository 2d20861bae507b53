//! CLI output formatting utilities

use crate::llm::wake::WakeOutcome;
use crate::llm::wake::WakeStatus;
use crate::rag::ChatAnswer;
use crate::rag::RetrievedDocument;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the string with a "..." suffix if it was truncated.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Show that a secret is set without printing it
#[must_use]
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        Some(s) if s.chars().count() > 8 => {
            let head: String = s.chars().take(4).collect();
            format!("{head}****")
        }
        Some(_) => "****".to_string(),
        None => "(not set)".to_string(),
    }
}

/// Print ranked documents
pub fn print_documents(documents: &[RetrievedDocument]) {
    if documents.is_empty() {
        println!("No relevant documents found.");
        return;
    }

    println!("Found {} relevant documents:", documents.len());
    for (i, doc) in documents.iter().enumerate() {
        let section = serde_json::to_value(doc.metadata.section)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        println!(
            "  {}. [{}] distance {:.4} | {}",
            i + 1,
            section,
            doc.distance,
            truncate_str(&doc.content, 100)
        );
    }
}

pub fn print_answer(answer: &ChatAnswer) {
    println!("{}", answer.result.text);
    println!();
    println!(
        "({} documents, {} context chars)",
        answer.documents_used, answer.context_chars
    );
}

pub fn print_wake_outcome(outcome: &WakeOutcome) {
    if outcome.success {
        println!("Wake-up succeeded: {}", outcome.message);
        if let Some(seconds) = outcome.wake_up_time {
            println!("  Wake-up time: {seconds:.2}s");
        }
        if let Some(status) = &outcome.status {
            println!("  Backend status: {status}");
        }
    } else {
        println!("Wake-up failed: {}", outcome.message);
        if let Some(error) = &outcome.error {
            println!("  Error: {error}");
        }
    }
}

pub fn print_wake_status(status: &WakeStatus) {
    println!("Warmed up:  {}", status.warmed_up);
    println!("Responding: {}", status.responding);
    match status.response_time_ms {
        Some(ms) => println!("Response:   {ms}ms"),
        None => println!("Response:   n/a"),
    }
    if let Some(error) = &status.error {
        println!("Error:      {error}");
    }
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("FischGPT Configuration:");
    println!();

    println!("Server:");
    println!("  Bind: {}", config.bind_address());
    println!("  CORS: {}", config.server.enable_cors);
    println!(
        "  Frontend URL: {}",
        config.server.frontend_url.as_deref().unwrap_or("(any origin)")
    );
    println!("  Environment: {}", config.server.environment);
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.directory);
    println!();

    println!("Embeddings:");
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embeddings.model);
    println!("  Dimension: {}", config.embeddings.dimension);
    println!(
        "  API token: {}",
        mask_secret(config.embeddings.api_token.as_deref())
    );
    println!();

    println!("Vector store:");
    println!("  Base URL: {}", config.vector_store.base_url);
    println!(
        "  Tenant: {}",
        config.vector_store.tenant.as_deref().unwrap_or("(not set)")
    );
    println!("  Database: {}", config.vector_store.database);
    println!("  Collection: {}", config.vector_store.collection);
    println!(
        "  API token: {}",
        mask_secret(config.vector_store.api_token.as_deref())
    );
    println!();

    println!("Retrieval:");
    println!("  Query mode: {:?}", config.retrieval.query_mode);
    println!("  Max documents: {}", config.retrieval.max_documents);
    println!("  Distance threshold: {}", config.retrieval.distance_threshold);
    println!();

    println!("Generation:");
    println!("  Endpoint: {}", config.generation.endpoint);
    println!("  Timeout: {}s", config.generation.timeout_secs);
    println!(
        "  Defaults: temperature {} | max tokens {} | top_p {}",
        config.generation.temperature, config.generation.max_tokens, config.generation.top_p
    );
    println!();

    println!("Wake-up:");
    println!("  URL: {}", config.wake.url);
    println!("  Warm threshold: {}ms", config.wake.warm_threshold_ms);
    println!();

    println!("Subject: {} ({})", config.subject.name, config.subject.description);
}
