//! Session endpoints under `/api/auth`

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use super::success;
use crate::api::error::ApiResult;
use crate::api::extract::{AdminSession, JsonRequest};
use crate::core::AppState;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Exchange credentials for a session token and cookie
pub async fn login(
    State(state): State<AppState>,
    JsonRequest(request): JsonRequest<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = state.auth.login(&request.email, &request.password).await?;
    let cookie = state.auth.session_cookie(&session);
    Ok(([(SET_COOKIE, cookie)], Json(session)))
}

/// Drop the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    ([(SET_COOKIE, state.auth.clear_cookie())], Json(success()))
}

/// The current session, or 401
pub async fn current_session(AdminSession(claims): AdminSession) -> ApiResult<Json<serde_json::Value>> {
    let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0);
    Ok(Json(json!({
        "user": claims.user(),
        "expiresAt": expires_at,
    })))
}
