use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{AppState, AuthUser, JsonBody};
use crate::auth::{LoginSurface, SessionUser, SignInResponse, VolunteerSignUp};
use crate::error::PortalError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn staff_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<SignInResponse>, PortalError> {
    let response = state
        .auth
        .sign_in(LoginSurface::Staff, &request.email, &request.password)
        .await?;
    Ok(Json(response))
}

pub async fn volunteer_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<SignInResponse>, PortalError> {
    let response = state
        .auth
        .sign_in(LoginSurface::Volunteer, &request.email, &request.password)
        .await?;
    Ok(Json(response))
}

pub async fn volunteer_signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VolunteerSignUp>,
) -> Result<(StatusCode, Json<Value>), PortalError> {
    let (session, profile) = state.auth.sign_up_volunteer(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session": session,
            "profile": profile,
        })),
    ))
}

pub async fn current_session(AuthUser(user): AuthUser) -> Json<SessionUser> {
    Json(user)
}
