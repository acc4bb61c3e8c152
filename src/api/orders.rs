use crate::api::AppState;
use crate::api::middleware::{MemberSession, PathParam};
use crate::api::schemas::orders::{OrderResponse, OrdersResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

pub async fn list_orders(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = state.order_service.orders(session).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(OrdersResponse { orders: result.value })))
}

pub async fn get_order(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
    PathParam(order_id): PathParam<String>,
) -> Result<impl IntoResponse> {
    let result = state.order_service.order(session, &order_id).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(OrderResponse { order: result.value })))
}
