use crate::api::AppState;
use crate::api::middleware::{JsonBody, PathParam};
use crate::api::schemas::auction::PlaceBid;
use crate::error::Result;
use axum::{
    Json,
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

pub async fn get_auction(
    State(state): State<AppState>,
    PathParam(auction_id): PathParam<String>,
) -> Result<impl IntoResponse> {
    let snapshot = state.auction_service.snapshot(&auction_id).await?;
    Ok(Json(snapshot))
}

pub async fn place_bid(State(state): State<AppState>, JsonBody(payload): JsonBody<PlaceBid>) -> Result<impl IntoResponse> {
    let outcome = state.auction_service.place_bid(payload.into()).await?;
    Ok(Json(outcome))
}

/// Relays the upstream body, status and content type without interpretation.
pub async fn proxy(State(state): State<AppState>, RawQuery(query): RawQuery) -> Result<Response> {
    let upstream = state.auction_service.proxy(query.as_deref()).await?;

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, upstream.body).into_response();
    if let Some(value) = upstream.content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    Ok(response)
}
