//! Solver API endpoints.

use axum::{extract::State, http::StatusCode, Json};
use kula_core::{ExchangeError, Match, SolveReport, SolverState};
use kula_solver::SolverConfig;
use serde::Serialize;

use crate::state::AppState;

/// Response after triggering a solver pass.
#[derive(Debug, Serialize)]
pub struct TriggerSolveResponse {
    pub run_id: u64,
    pub status: String,
    pub message: String,
}

/// Solver status response.
#[derive(Debug, Serialize)]
pub struct SolverStatusResponse {
    pub state: SolverState,
    pub solver: String,
    pub config: SolverConfig,
    pub last_report: Option<SolveReport>,
}

/// Trigger a solver pass.
///
/// Accepted passes run in the background; observe them through
/// `GET /api/v1/solver` or the event stream.
pub async fn trigger_solve(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TriggerSolveResponse>), (StatusCode, String)> {
    match state.exchange.request_solve().await {
        Ok(run_id) => Ok((
            StatusCode::ACCEPTED,
            Json(TriggerSolveResponse {
                run_id,
                status: "running".to_string(),
                message: "Solver pass started".to_string(),
            }),
        )),
        Err(e @ ExchangeError::AlreadyRunning) => Err((StatusCode::CONFLICT, e.to_string())),
        Err(e @ ExchangeError::EmptyPool) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
        }
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// Current solver state, configuration and the last pass report.
pub async fn solver_status(State(state): State<AppState>) -> Json<SolverStatusResponse> {
    Json(SolverStatusResponse {
        state: state.exchange.solver_state(),
        solver: state.exchange.solver_name().to_string(),
        config: state.exchange.solver_config().clone(),
        last_report: state.exchange.last_report().await,
    })
}

/// List settled matches, oldest first.
pub async fn list_matches(State(state): State<AppState>) -> Json<Vec<Match>> {
    Json(state.exchange.match_history().await)
}
