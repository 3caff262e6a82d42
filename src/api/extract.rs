//! Request extractors

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ApiError;
use crate::auth::{token_from_bearer, token_from_cookies, AuthService, Claims};
use crate::core::{AppState, Error};

/// Custom JSON extractor that returns proper JSON error responses
pub struct JsonRequest<T>(pub T);

impl<T, S> FromRequest<S> for JsonRequest<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonRequest(value)),
            Err(rejection) => {
                let error_message = match rejection {
                    JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON".to_string(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing or invalid Content-Type header. Expected 'application/json'".to_string()
                    }
                    JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
                    _ => "Invalid JSON request".to_string(),
                };

                warn!("JSON parsing error: {}", error_message);
                Err(ApiError(Error::invalid_input(error_message)))
            }
        }
    }
}

/// Resolve the admin session carried by request headers.
///
/// A bearer token wins over the session cookie.
pub fn authorize(auth: &AuthService, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_bearer);
    let token = bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(token_from_cookies)
    });

    let token = token.ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    Ok(auth.verify(token)?)
}

/// A request made with a valid admin session
#[derive(Debug, Clone)]
pub struct AdminSession(pub Claims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authorize(&state.auth, &parts.headers).map(AdminSession)
    }
}
