use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: checks that Wix is reachable and the client id is configured.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let wix_res = state.health_service.check_wix().await;
    let config_res = state.health_service.check_config();

    let mut status_code = StatusCode::OK;
    let wix_status = if let Err(e) = wix_res {
        tracing::warn!(error = %e, component = "wix", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let config_status = if let Err(e) = config_res {
        tracing::warn!(error = %e, component = "config", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        wix: wix_status.to_string(),
        config: config_status.to_string(),
    };

    (status_code, Json(response))
}
