//! API server handlers

use crate::AppConfig;
use crate::Result;

pub async fn handle_serve_api(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    use crate::api::serve_api;

    // CLI arguments take priority over config
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if no_cors {
        config.server.enable_cors = false;
    }

    println!("Starting FischGPT API Server");
    println!("============================\n");
    println!("Bind: {}", config.bind_address());
    println!(
        "CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!("Subject: {}", config.subject_name());
    println!();

    serve_api(config).await
}
