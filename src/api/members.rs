use crate::api::AppState;
use crate::api::middleware::{JsonBody, MemberSession};
use crate::api::schemas::auth::MemberResponse;
use crate::domain::member::ProfileUpdate;
use crate::error::Result;
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

pub async fn get_member(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    let result = state.member_service.profile(session).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(MemberResponse { member: result.value })))
}

pub async fn update_member(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    jar: CookieJar,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    let result = state.member_service.update_profile(session, update).await?;
    let jar = state.session_cookies.persist(jar, result.session.as_ref())?;
    Ok((jar, Json(MemberResponse { member: result.value })))
}
