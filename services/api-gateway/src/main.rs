// Wallet API Gateway - public REST entry point
// Translates REST calls into internal RPC toward the ledger and analytics
// services; stateless, never retries, maps RPC codes onto HTTP statuses.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use dotenv::dotenv;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

mod clients;
mod error;
mod handlers;
mod types;

use clients::{AnalyticsClient, BankClient};

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<BankClient>,
    pub analytics: Arc<AnalyticsClient>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub ledger_connected: bool,
    pub analytics_connected: bool,
}

// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ledger_connected = state.bank.health_check().await;
    let analytics_connected = state.analytics.health_check().await;

    Json(HealthResponse {
        status: if ledger_connected && analytics_connected {
            "healthy"
        } else {
            "degraded"
        },
        service: "api-gateway",
        version: env!("CARGO_PKG_VERSION"),
        ledger_connected,
        analytics_connected,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_line_number(true)
        .init();

    info!("Starting Wallet API Gateway");

    // Load configuration from environment
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let ledger_url = std::env::var("LEDGER_SERVICE_URL")
        .unwrap_or_else(|_| "http://localhost:8091".to_string());
    let analytics_url = std::env::var("ANALYTICS_SERVICE_URL")
        .unwrap_or_else(|_| "http://localhost:8092".to_string());
    let rpc_timeout_secs = std::env::var("RPC_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(10);

    // Initialize RPC clients
    let state = AppState {
        bank: Arc::new(BankClient::new(ledger_url, rpc_timeout_secs)),
        analytics: Arc::new(AnalyticsClient::new(analytics_url, rpc_timeout_secs)),
    };

    // Build router with CORS
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/accounts/:account_id/transfers",
            post(handlers::transfer_between_accounts),
        )
        .route(
            "/accounts/:account_id/operations",
            get(handlers::get_account_operations),
        )
        .route("/accounts/:account_id", get(handlers::get_account))
        .route(
            "/accounts/:account_id/topup",
            post(handlers::top_up_account),
        )
        .layer(cors)
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Gateway listening on: {}", bind_addr);
    info!("   POST /accounts/:account_id/transfers - Execute transfer");
    info!("   GET  /accounts/:account_id/operations - Operation history");
    info!("   GET  /accounts/:account_id - Account state");
    info!("   POST /accounts/:account_id/topup - Card top-up (reserved)");
    info!("   GET  /health - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
