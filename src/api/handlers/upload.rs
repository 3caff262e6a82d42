//! Media upload

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::api::error::ApiResult;
use crate::api::extract::AdminSession;
use crate::core::{AppState, Error};
use crate::media::check_upload;

/// Multipart form field carrying the file
const FILE_FIELD: &str = "file";

/// Accept one image in the `file` field and return its public URL
pub async fn upload_file(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart =
        multipart.map_err(|e| Error::invalid_input(format!("Expected a multipart form: {}", e)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_input(format!("Failed to read upload: {}", e)))?;
        debug!(file = %file_name, size = data.len(), "upload received");

        check_upload(&content_type, data.len(), state.config.uploads.max_bytes)?;
        let url = state.media.save(&file_name, &content_type, data).await?;
        return Ok(Json(json!({ "url": url })));
    }

    Err(Error::invalid_input("No file provided").into())
}
