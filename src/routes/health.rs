use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize, Deserialize)]
pub struct HealthChecks {
    pub provider_credential: ComponentHealth,
    pub asset_store: ComponentHealth,
}

#[derive(Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /health — readiness of the provider credential and the asset store.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let credential = if state.generation.client().is_configured() {
        ComponentHealth {
            status: "ok".to_string(),
            detail: None,
        }
    } else {
        ComponentHealth {
            status: "error".to_string(),
            detail: Some("REPLICATE_API_TOKEN is not set".to_string()),
        }
    };

    let asset_store = ComponentHealth {
        status: "ok".to_string(),
        detail: Some(format!("{} assets", state.assets.len())),
    };

    let all_healthy = credential.status == "ok";
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if all_healthy {
            "ok".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            provider_credential: credential,
            asset_store,
        },
    };

    (status_code, Json(response))
}
