//! HTTP routes for the agent.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ertdrive_core::WalletRecord;
use ertdrive_device::DriveSummary;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Body of `GET /wallet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletResponse {
    pub found: bool,
    #[serde(rename = "walletData")]
    pub wallet_data: Option<String>,
}

impl WalletResponse {
    pub fn not_found() -> Self {
        Self {
            found: false,
            wallet_data: None,
        }
    }

    pub fn found(record: &WalletRecord) -> Self {
        Self {
            found: true,
            wallet_data: Some(record.content().to_string()),
        }
    }
}

/// Body of `GET /drives`.
#[derive(Debug, Serialize)]
pub struct DrivesResponse {
    pub drives: Vec<DriveSummary>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Build the agent's router.
///
/// CORS is wide open (any origin, method and header); the agent is meant to
/// be reached by a local web UI.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/drives", get(list_drives))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wallet content from the first removable drive, if any.
///
/// Always answers 200: a failed volume enumeration is logged and reported
/// as not found.
async fn get_wallet(State(state): State<AppState>) -> Json<WalletResponse> {
    let mount = match state.locator.locate_async().await {
        Ok(Some(mount)) => mount,
        Ok(None) => {
            debug!("Wallet query: no removable drive");
            return Json(WalletResponse::not_found());
        }
        Err(e) => {
            error!("Wallet query: drive enumeration failed: {}", e);
            return Json(WalletResponse::not_found());
        }
    };

    match state.scanner.scan(&mount.path).await {
        Some(record) => Json(WalletResponse::found(&record)),
        None => Json(WalletResponse::not_found()),
    }
}

async fn list_drives(State(state): State<AppState>) -> Result<Json<DrivesResponse>, ApiError> {
    let drives = state.locator.list_async().await.map_err(|e| {
        error!("Drive listing failed: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(DrivesResponse { drives }))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_response_shape() {
        let json = serde_json::to_value(WalletResponse::not_found()).expect("serialize");
        assert_eq!(json, serde_json::json!({ "found": false, "walletData": null }));

        let record = WalletRecord::new("mySecretSeed".to_string(), "/media/usb/w.ert", false);
        let json = serde_json::to_value(WalletResponse::found(&record)).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "found": true, "walletData": "mySecretSeed" })
        );
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }
}
