//! Public inquiry form

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::extract::JsonRequest;
use crate::content::document::{CONTACTS, ID_FIELD, NATIVE_ID_FIELD};
use crate::content::into_document;
use crate::core::{AppState, Error};
use crate::forms::schema_for;

/// Store an inquiry submitted through the contact page
pub async fn submit_inquiry(
    State(state): State<AppState>,
    JsonRequest(body): JsonRequest<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut inquiry = into_document(body)?;
    // Identity and timestamp are always assigned here.
    inquiry.remove(ID_FIELD);
    inquiry.remove(NATIVE_ID_FIELD);

    let schema = schema_for(CONTACTS).ok_or_else(|| Error::internal("Inquiry form missing"))?;
    let mut inquiry = schema.validate(&inquiry)?;
    inquiry.insert("createdAt".to_string(), Value::String(Utc::now().to_rfc3339()));

    let created = state.repository.create(CONTACTS, inquiry).await?;
    info!("Inquiry received");
    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}
