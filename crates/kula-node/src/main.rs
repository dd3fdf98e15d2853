//! # Kula Node
//!
//! Main Kula exchange node binary with API server.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use kula_core::IntentDraft;
use kula_exchange::{Exchange, ExchangeConfig};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod api;
mod state;

use state::AppState;

/// The barter scenario seeded at startup, so a fresh node has a pool worth
/// solving straight away.
const DEMO_DRAFTS: [(&str, &str, &str); 3] = [
    ("Alice", "1984", "The Great Gatsby"),
    ("Bob", "The Great Gatsby", "To Kill a Mockingbird"),
    ("Charlie", "To Kill a Mockingbird", "1984"),
];

/// Run the Kula node server.
pub async fn run_server(addr: SocketAddr) -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Kula Node starting...");

    // Create shared application state. Passes carry a short artificial
    // delay so their progress is visible on the event stream.
    let state = AppState::with_exchange(Exchange::with_config(ExchangeConfig {
        solve_delay: Duration::from_secs(2),
    }));

    seed_demo_pool(&state).await?;

    // Build the router
    let app = create_router(state);

    info!("🌐 Listening on http://{}", addr);

    // Start the server
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the demo intents into the pool.
async fn seed_demo_pool(state: &AppState) -> anyhow::Result<()> {
    for (participant, wanted, offered) in DEMO_DRAFTS {
        state
            .exchange
            .submit_intent(IntentDraft::new(participant, wanted, offered))
            .await?;
    }

    info!("📚 Seeded {} demo intents", DEMO_DRAFTS.len());
    Ok(())
}

/// Create the API router.
fn create_router(state: AppState) -> Router {
    // CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Intent API
        .route("/api/v1/intent", post(api::intent::submit_intent))
        .route("/api/v1/intent/:id", get(api::intent::get_intent))
        .route("/api/v1/intents", get(api::intent::list_intents))
        // Solver API
        .route("/api/v1/solve", post(api::solve::trigger_solve))
        .route("/api/v1/solver", get(api::solve::solver_status))
        .route("/api/v1/matches", get(api::solve::list_matches))
        // WebSocket events
        .route("/ws/events", get(api::ws::events_stream))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    run_server(addr).await
}
