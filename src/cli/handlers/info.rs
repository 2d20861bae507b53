//! Information display handlers

use crate::cli::output::print_config;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);

    if !config.has_retrieval_credentials() {
        println!();
        println!("Warning: retrieval credentials are incomplete; answers will carry no context.");
    }
    Ok(())
}
