//! Logging configuration for the FischGPT gateway

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

const LOG_FILE_PREFIX: &str = "fischgpt.log";

/// Initialize logging with console and daily rolling file output
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let logs_dir = Path::new(&config.directory);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},fischgpt={}", config.level, config.level))
    });

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::GatewayError::Custom(format!("Failed to install logger: {e}")))?;

    tracing::info!(
        "Logging initialized with level: {} - console and file output enabled",
        config.level
    );
    tracing::info!(
        "Log files will be saved to: {}/{}.YYYY-MM-DD",
        config.directory,
        LOG_FILE_PREFIX
    );

    // The writer thread must outlive main
    std::mem::forget(guard);

    Ok(())
}

/// Initialize console-only logging at the given level
pub fn init_simple_logging(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,fischgpt={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| crate::GatewayError::Custom(format!("Failed to install logger: {e}")))?;

    Ok(())
}
