//! HTTP client for a running Kula node.

use kula_core::{
    EventKind, ExchangeError, Intent, IntentDraft, Match, Result, SolveReport, SolverState,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::stream::EventStream;

/// Client for interacting with a Kula node over its REST and WebSocket APIs.
#[derive(Clone)]
pub struct KulaClient {
    /// Base URL of the node.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

/// Receipt returned when an intent is admitted to the pool.
#[derive(Debug, Deserialize)]
pub struct SubmitReceipt {
    pub id: Uuid,
    pub seq: u64,
    pub status: String,
    pub message: String,
}

/// Receipt returned when a solver pass is accepted.
#[derive(Debug, Deserialize)]
pub struct SolveReceipt {
    pub run_id: u64,
    pub status: String,
    pub message: String,
}

/// Solver status as reported by the node.
#[derive(Debug, Deserialize)]
pub struct SolverStatus {
    pub state: SolverState,
    pub solver: String,
    pub config: serde_json::Value,
    pub last_report: Option<SolveReport>,
}

fn ws_url(base_url: &str) -> String {
    format!(
        "{}/ws/events",
        base_url
            .replace("http://", "ws://")
            .replace("https://", "wss://")
    )
}

impl KulaClient {
    /// Connect to a Kula node, verifying it is reachable.
    pub async fn connect(url: &str) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();
        let http_client = reqwest::Client::new();

        // Verify connection with health check
        let health_url = format!("{}/health", base_url);
        http_client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Submit an intent into the node's pool.
    pub async fn submit_intent(&self, draft: IntentDraft) -> Result<SubmitReceipt> {
        let url = format!("{}/api/v1/intent", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&draft)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Internal(format!(
                "Failed to submit intent: {}",
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ExchangeError::Serialization(e.to_string()))
    }

    /// Trigger a solver pass. The pass runs on the node; follow it through
    /// [`KulaClient::solver_status`] or [`KulaClient::events`].
    pub async fn request_solve(&self) -> Result<SolveReceipt> {
        let url = format!("{}/api/v1/solve", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        match response.status().as_u16() {
            409 => return Err(ExchangeError::AlreadyRunning),
            422 => return Err(ExchangeError::EmptyPool),
            _ => {}
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Internal(format!(
                "Failed to trigger solve: {}",
                error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ExchangeError::Serialization(e.to_string()))
    }

    /// Current solver state and the report of the last completed pass.
    pub async fn solver_status(&self) -> Result<SolverStatus> {
        self.get_json("/api/v1/solver").await
    }

    /// Open intents in the pool, oldest first.
    pub async fn pool(&self) -> Result<Vec<Intent>> {
        self.get_json("/api/v1/intents").await
    }

    /// Look up a single open intent by id.
    pub async fn get_intent(&self, id: Uuid) -> Result<Intent> {
        let url = format!("{}/api/v1/intent/{}", self.base_url, id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(ExchangeError::NotFound {
                resource: "Intent".to_string(),
                id: id.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ExchangeError::Serialization(e.to_string()))
    }

    /// Settled matches, oldest first.
    pub async fn matches(&self) -> Result<Vec<Match>> {
        self.get_json("/api/v1/matches").await
    }

    /// Open the node's event stream.
    pub async fn events(&self) -> Result<EventStream> {
        EventStream::connect(&ws_url(&self.base_url)).await
    }

    /// Open the event stream restricted to a single event kind.
    pub async fn events_of(&self, kind: EventKind) -> Result<EventStream> {
        let url = format!("{}?kind={}", ws_url(&self.base_url), kind.as_str());
        EventStream::connect(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ExchangeError::Connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| ExchangeError::Connection(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| ExchangeError::Serialization(e.to_string()))
    }
}
