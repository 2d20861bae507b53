use anyhow::Context;
use clap::Parser;
use fischgpt::cli::handle_ask;
use fischgpt::cli::handle_config_command;
use fischgpt::cli::handle_ingest;
use fischgpt::cli::handle_search;
use fischgpt::cli::handle_serve_api;
use fischgpt::cli::handle_wake;
use fischgpt::cli::Cli;
use fischgpt::cli::Commands;
use fischgpt::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    // Initialize logging
    if cli.verbose {
        fischgpt::logging::init_simple_logging("debug")?;
    } else if matches!(cli.command, Commands::Serve { .. }) {
        fischgpt::logging::init_logging_with_config(&config.logging)?;
    } else {
        fischgpt::logging::init_simple_logging(&config.logging.level)?;
    }
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => handle_serve_api(config, host, port, no_cors).await?,
        Commands::Ask {
            query,
            temperature,
            max_tokens,
            top_p,
            show_context,
        } => {
            handle_ask(
                &config,
                &query,
                temperature,
                max_tokens,
                top_p,
                show_context,
            )
            .await?;
        }
        Commands::Search { query, limit } => handle_search(&config, &query, limit).await?,
        Commands::Ingest { file } => handle_ingest(&config, &file).await?,
        Commands::Wake { status } => handle_wake(&config, status).await?,
        Commands::Config => handle_config_command(&config)?,
    }

    Ok(())
}
