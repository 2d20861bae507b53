//! RAG command handlers

use std::path::Path;

use crate::api::types::AddDocumentsRequest;
use crate::api::types::ChatRequest;
use crate::cli::output::print_answer;
use crate::cli::output::print_documents;
use crate::llm::GenerationParams;
use crate::rag::RagService;
use crate::AppConfig;
use crate::GatewayError;
use crate::Result;

pub async fn handle_ask(
    config: &AppConfig,
    query: &str,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    show_context: bool,
) -> Result<()> {
    // Same limits as POST /api/chat
    let chat = ChatRequest::from_parts(query, temperature, max_tokens, top_p)
        .validate()
        .map_err(GatewayError::ValidationError)?;

    let service = RagService::from_config(config)?;
    let params = GenerationParams::resolve(
        GenerationParams::from(&config.generation),
        chat.temperature,
        chat.max_tokens,
        chat.top_p,
    );
    let answer = service.answer(&chat.query, &params).await?;

    if show_context {
        let context = if answer.context.is_empty() {
            "(none)"
        } else {
            answer.context.as_str()
        };
        println!("Context:\n{context}\n");
        println!("Prompt:\n{}\n", answer.prompt);
    }
    print_answer(&answer);
    Ok(())
}

pub async fn handle_search(config: &AppConfig, query: &str, limit: Option<usize>) -> Result<()> {
    let service = RagService::from_config(config)?;
    let retriever = service.retriever();
    let limit = limit.unwrap_or_else(|| retriever.max_documents());

    // Surface the failure here instead of degrading to an empty list
    let documents = retriever.try_search(query, limit).await?;
    print_documents(&documents);
    Ok(())
}

/// Ingest a JSON file shaped like the `POST /api/documents` body
pub async fn handle_ingest(config: &AppConfig, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let request: AddDocumentsRequest = serde_json::from_str(&content)?;

    let batch = request.into_batch();
    batch
        .check_lengths()
        .map_err(|e| GatewayError::ValidationError(vec![e]))?;

    let service = RagService::from_config(config)?;
    let count = service.ingest(batch).await?;
    println!("Added {count} documents from {}", file.display());
    Ok(())
}
