use crate::api::AppState;
use crate::api::middleware::QueryParams;
use crate::api::schemas::tracking::TrackingParams;
use crate::error::Result;
use crate::services::tracking_service::TrackingQuery;
use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};

pub async fn track(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<TrackingParams>,
) -> Result<impl IntoResponse> {
    let query = TrackingQuery::from_params(params.tracking_number, params.carrier_code, params.order_id)?;
    let info = state.tracking_service.track(query).await?;
    Ok(Json(info))
}
