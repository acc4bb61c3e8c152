use crate::api::AppState;
use crate::api::middleware::{JsonBody, MemberSession, Session};
use crate::api::schemas::auth::{
    Login, Logout, LogoutResponse, MemberResponse, RefreshResponse, Registration, SignedInResponse, TokenAuth,
};
use crate::error::{AppError, Result};
use crate::services::auth_service::{NewMember, SignedIn};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<Login>,
) -> Result<impl IntoResponse> {
    let signed_in = state.auth_service.login(&payload.email, &payload.password).await?;
    let jar = state.session_cookies.write(jar, &signed_in.tokens)?;
    Ok((jar, Json(map_signed_in(signed_in))))
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<Registration>,
) -> Result<impl IntoResponse> {
    let new_member = NewMember {
        email: payload.email,
        password: payload.password,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };
    let signed_in = state.auth_service.register(new_member).await?;
    let jar = state.session_cookies.write(jar, &signed_in.tokens)?;
    Ok((StatusCode::CREATED, jar, Json(map_signed_in(signed_in))))
}

/// Always succeeds and always clears the cookies; the platform logout URL is
/// included when the session could be resolved.
pub async fn logout(
    State(state): State<AppState>,
    Session(session): Session,
    jar: CookieJar,
    payload: std::result::Result<JsonBody<Logout>, AppError>,
) -> impl IntoResponse {
    let payload = payload.map(|JsonBody(body)| body).unwrap_or_default();
    let logout_url = state.auth_service.logout(session, payload.post_logout_url.as_deref()).await;
    (state.session_cookies.clear(jar), Json(LogoutResponse { logout_url }))
}

pub async fn token_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<TokenAuth>,
) -> Result<impl IntoResponse> {
    let result = state.auth_service.token_auth(payload.into()).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(MemberResponse { member: result.value })))
}

pub async fn session(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = state.auth_service.current_member(session).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(MemberResponse { member: result.value })))
}

/// Forces the refresh grant for a member session. A rejected refresh token
/// clears both cookies so the browser stops replaying it.
pub async fn refresh(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
) -> Result<Response> {
    match state.auth_service.refresh(&session).await {
        Ok(tokens) => {
            let jar = state.session_cookies.write(jar, &tokens)?;
            Ok((jar, Json(RefreshResponse { expires_at: tokens.access_token.expires_at })).into_response())
        }
        Err(AppError::Unauthorized) => Ok((state.session_cookies.clear(jar), AppError::Unauthorized).into_response()),
        Err(e) => Err(e),
    }
}

fn map_signed_in(signed_in: SignedIn) -> SignedInResponse {
    SignedInResponse { member: signed_in.member, tokens: signed_in.tokens }
}
