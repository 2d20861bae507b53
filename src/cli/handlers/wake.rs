//! Wake-up handlers

use crate::cli::output::print_wake_outcome;
use crate::cli::output::print_wake_status;
use crate::llm::WakeClient;
use crate::AppConfig;
use crate::Result;

pub async fn handle_wake(config: &AppConfig, status_only: bool) -> Result<()> {
    let client = WakeClient::new(&config.wake)?;

    if status_only {
        print_wake_status(&client.probe().await);
    } else {
        println!("Waking up {} ...", client.url());
        print_wake_outcome(&client.wake_up().await);
    }
    Ok(())
}
