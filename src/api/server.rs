//! HTTP server implementation

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::config::ServerConfig;
use crate::llm::WakeService;
use crate::rag::RagService;
use crate::GatewayError;
use crate::Result;

/// Build the full application router with middleware
pub fn build_router(state: AppState, server: &ServerConfig) -> Result<Router> {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .nest("/api", routes::api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        );

    if server.enable_cors {
        app = app.layer(cors_layer(server.frontend_url.as_deref())?);
    }

    Ok(app)
}

fn cors_layer(frontend_url: Option<&str>) -> Result<CorsLayer> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    match frontend_url {
        Some(origin) => {
            let origin = origin.parse::<HeaderValue>().map_err(|e| {
                GatewayError::ConfigError(format!("invalid server.frontend_url {origin}: {e}"))
            })?;
            info!("CORS restricted to {:?}", origin);
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(methods)
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true))
        }
        None => {
            info!("CORS enabled for any origin");
            Ok(CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any))
        }
    }
}

/// Start the API server
pub async fn serve_api(config: AppConfig) -> Result<()> {
    info!("Starting FischGPT API server...");

    if !config.has_retrieval_credentials() {
        warn!("Retrieval credentials are missing; chat will answer without context");
    }

    let rag = Arc::new(RagService::from_config(&config)?);
    let wake = WakeService::from_config(&config.wake)?;
    let addr = config.bind_address();
    let server_config = config.server.clone();

    let state = AppState::new(Arc::new(config), rag, wake);
    let app = build_router(state, &server_config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  POST /api/chat         - Ask a question");
    info!("  GET  /api/health       - Health check");
    info!("  GET  /api/info         - Service information");
    info!("  GET  /api/status       - Liveness");
    info!("  GET  /api/version      - Version");
    info!("  POST /api/wake         - Background wake-up");
    info!("  GET  /api/wake/status  - Warm-up status");
    info!("  POST /api/wake/force   - Wake-up and wait");
    info!("  POST /api/documents    - Add documents");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
