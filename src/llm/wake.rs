//! Wake-up for the cold-started inference backend
//!
//! A wake-up is an out-of-band POST that makes the hosting platform spin the
//! model up before a real request arrives. It is never on the chat path:
//! [`WakeService::trigger`] hands the job to a background worker and returns.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use chrono::DateTime;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::WakeConfig;
use crate::errors::GatewayError;

/// Result of one wake-up attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeOutcome {
    pub success: bool,
    /// Seconds the backend reported for the wake-up
    pub wake_up_time: Option<f64>,
    pub status: Option<String>,
    pub message: String,
    pub error: Option<String>,
}

/// Responsiveness snapshot of the backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeStatus {
    pub warmed_up: bool,
    pub responding: bool,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

/// What happened to a [`WakeService::trigger`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerResult {
    Queued,
    /// A wake-up is already waiting; this one was folded into it
    AlreadyPending,
    WorkerStopped,
}

/// HTTP client for the wake endpoint
#[derive(Clone)]
pub struct WakeClient {
    url: String,
    client: Client,
    status_timeout: Duration,
    warm_threshold: Duration,
}

impl WakeClient {
    pub fn new(config: &WakeConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::HttpError(e.to_string()))?;

        Ok(Self {
            url: config.url.clone(),
            client,
            status_timeout: Duration::from_secs(config.status_timeout_secs),
            warm_threshold: Duration::from_millis(config.warm_threshold_ms),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one wake-up and wait for it. Never fails; failure is reported in
    /// the outcome.
    pub async fn wake_up(&self) -> WakeOutcome {
        info!(url = %self.url, "Sending wake-up request");
        let started = Instant::now();

        let response = match self
            .client
            .post(&self.url)
            .json(&json!({ "data": [] }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return failed_outcome(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return failed_outcome(format!("wake endpoint returned {status}: {body}"));
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => return failed_outcome(e.to_string()),
        };

        let wake_up_time = body
            .get("duration")
            .and_then(Value::as_f64)
            .or_else(|| Some(started.elapsed().as_secs_f64()));
        let backend_status = body
            .pointer("/data/0/status")
            .and_then(Value::as_str)
            .map(str::to_string);

        WakeOutcome {
            success: true,
            wake_up_time,
            status: backend_status,
            message: "AI model wake-up completed successfully".to_string(),
            error: None,
        }
    }

    /// Probe the endpoint with a short deadline
    pub async fn probe(&self) -> WakeStatus {
        let started = Instant::now();
        let result = self
            .client
            .post(&self.url)
            .timeout(self.status_timeout)
            .json(&json!({ "data": [] }))
            .send()
            .await;
        let elapsed = started.elapsed();

        match result {
            Ok(response) if response.status().is_success() => WakeStatus {
                warmed_up: elapsed < self.warm_threshold,
                responding: true,
                response_time_ms: Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
                error: None,
                checked_at: Utc::now(),
            },
            Ok(response) => WakeStatus {
                warmed_up: false,
                responding: false,
                response_time_ms: None,
                error: Some(format!("wake endpoint returned {}", response.status())),
                checked_at: Utc::now(),
            },
            Err(e) => WakeStatus {
                warmed_up: false,
                responding: false,
                response_time_ms: None,
                error: Some(e.to_string()),
                checked_at: Utc::now(),
            },
        }
    }
}

fn failed_outcome(error: String) -> WakeOutcome {
    warn!("Wake-up failed (non-critical): {}", error);
    WakeOutcome {
        success: false,
        wake_up_time: None,
        status: None,
        message: "AI model wake-up failed - the model will wake up on the first chat request"
            .to_string(),
        error: Some(error),
    }
}

#[derive(Debug)]
struct WakeRequest {
    requested_at: DateTime<Utc>,
}

/// Background wake-up worker plus direct access to the client
#[derive(Clone)]
pub struct WakeService {
    sender: mpsc::Sender<WakeRequest>,
    client: Arc<WakeClient>,
}

impl WakeService {
    /// Start the worker task. Must be called inside a tokio runtime.
    pub fn spawn(client: WakeClient, capacity: usize) -> Self {
        let client = Arc::new(client);
        let (sender, mut receiver) = mpsc::channel::<WakeRequest>(capacity.max(1));

        let worker_client = Arc::clone(&client);
        tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let outcome = worker_client.wake_up().await;
                if outcome.success {
                    info!(
                        requested_at = %request.requested_at,
                        wake_up_time = ?outcome.wake_up_time,
                        status = ?outcome.status,
                        "Wake-up completed"
                    );
                } else {
                    warn!(
                        requested_at = %request.requested_at,
                        error = ?outcome.error,
                        "Wake-up did not succeed"
                    );
                }
            }
            debug!("Wake-up worker stopped");
        });

        Self { sender, client }
    }

    pub fn from_config(config: &WakeConfig) -> crate::Result<Self> {
        Ok(Self::spawn(WakeClient::new(config)?, config.queue_capacity))
    }

    /// Queue a wake-up and return immediately
    pub fn trigger(&self) -> TriggerResult {
        let request = WakeRequest {
            requested_at: Utc::now(),
        };
        match self.sender.try_send(request) {
            Ok(()) => TriggerResult::Queued,
            Err(TrySendError::Full(_)) => {
                debug!("Wake-up already pending");
                TriggerResult::AlreadyPending
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Wake-up worker is not running");
                TriggerResult::WorkerStopped
            }
        }
    }

    /// Wake up now and wait for the outcome
    pub async fn force(&self) -> WakeOutcome {
        self.client.wake_up().await
    }

    pub async fn status(&self) -> WakeStatus {
        self.client.probe().await
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }
}
