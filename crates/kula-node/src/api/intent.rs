//! Intent API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use kula_core::{Intent, IntentDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

/// Request to submit a new intent.
#[derive(Debug, Deserialize)]
pub struct SubmitIntentRequest {
    /// Who is trading.
    pub participant: String,

    /// The item they want.
    pub wanted: String,

    /// The item they offer in return.
    pub offered: String,
}

/// Response after submitting an intent.
#[derive(Debug, Serialize)]
pub struct SubmitIntentResponse {
    pub id: Uuid,
    pub seq: u64,
    pub status: String,
    pub message: String,
}

/// Submit a new intent into the pool.
pub async fn submit_intent(
    State(state): State<AppState>,
    Json(req): Json<SubmitIntentRequest>,
) -> Result<(StatusCode, Json<SubmitIntentResponse>), (StatusCode, String)> {
    let draft = IntentDraft::new(req.participant, req.wanted, req.offered);

    let intent = state
        .exchange
        .submit_intent(draft)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitIntentResponse {
            id: intent.id,
            seq: intent.seq,
            status: "open".to_string(),
            message: "Intent admitted to the pool".to_string(),
        }),
    ))
}

/// Get an open intent by ID. Settled intents leave the pool and are only
/// visible through their match.
pub async fn get_intent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Intent>, (StatusCode, String)> {
    let intent = state
        .exchange
        .pool_view()
        .await
        .into_iter()
        .find(|intent| intent.id == id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Intent {} not found", id)))?;

    Ok(Json(intent))
}

/// List the open intents, oldest first.
pub async fn list_intents(State(state): State<AppState>) -> Json<Vec<Intent>> {
    Json(state.exchange.pool_view().await)
}
