use crate::api::AppState;
use crate::api::middleware::{JsonBody, PathParam, Session};
use crate::api::schemas::cart::{AddItem, CartResponse, Checkout, UpdateItem};
use crate::domain::cart::Cart;
use crate::error::{AppError, Result};
use crate::services::WithSession;
use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

pub async fn get_cart(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = state.cart_service.cart(session).await?;
    respond(&state, jar, result)
}

pub async fn add_item(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    JsonBody(payload): JsonBody<AddItem>,
) -> Result<impl IntoResponse> {
    let result = state.cart_service.add_item(session, payload.into_line()).await?;
    respond(&state, jar, result)
}

pub async fn update_item(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    PathParam(line_item_id): PathParam<String>,
    JsonBody(payload): JsonBody<UpdateItem>,
) -> Result<impl IntoResponse> {
    let result = state.cart_service.update_item(session, &line_item_id, payload.quantity()).await?;
    respond(&state, jar, result)
}

pub async fn remove_item(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    PathParam(line_item_id): PathParam<String>,
) -> Result<impl IntoResponse> {
    let result = state.cart_service.remove_item(session, &line_item_id).await?;
    respond(&state, jar, result)
}

pub async fn checkout(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    payload: std::result::Result<JsonBody<Checkout>, AppError>,
) -> Result<impl IntoResponse> {
    let payload = payload.map(|JsonBody(body)| body).unwrap_or_default();
    let result = state.cart_service.checkout(session, payload.post_flow_url.as_deref()).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(result.value)))
}

fn respond(state: &AppState, jar: CookieJar, result: WithSession<Cart>) -> Result<(CookieJar, Json<CartResponse>)> {
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(CartResponse { cart: result.value })))
}
