use crate::api::AppState;
use crate::api::schemas::env::{EnvCheck, EnvDebug};
use crate::error::{AppError, Result};
use axum::{Json, extract::State, response::IntoResponse};

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Keeps the first four characters of a secret and hides the rest.
fn mask(value: Option<&String>) -> Option<String> {
    let value = value.map(|v| v.trim()).filter(|v| !v.is_empty())?;
    let visible: String = value.chars().take(4).collect();
    let hidden = value.chars().count().saturating_sub(4);
    Some(format!("{visible}{}", "*".repeat(hidden.max(4))))
}

pub async fn env_check(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    Json(EnvCheck {
        wix_client_id: config.wix.client_id().is_some(),
        wix_api_key: present(config.wix.api_key.as_ref()),
        wix_site_id: present(config.wix.site_id.as_ref()),
        shipengine_api_key: present(config.tracking.api_key.as_ref()),
        otlp_endpoint: present(config.telemetry.otlp_endpoint.as_ref()),
    })
}

pub async fn env_debug(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let config = &state.config;
    if config.is_production() {
        return Err(AppError::NotFound);
    }

    let client_id = config.wix.client_id().map(str::to_string);
    Ok(Json(EnvDebug {
        node_env: config.node_env.as_str(),
        wix_client_id: mask(client_id.as_ref()),
        wix_api_key: mask(config.wix.api_key.as_ref()),
        wix_site_id: mask(config.wix.site_id.as_ref()),
        shipengine_api_key: mask(config.tracking.api_key.as_ref()),
        wix_api_base_url: config.wix.base_url.clone(),
        auction_base_url: config.auction.base_url.clone(),
    }))
}
