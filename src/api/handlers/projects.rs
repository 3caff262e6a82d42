//! Project listing: public normalised reads and admin editing

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

use super::{success, IdQuery};
use crate::api::error::ApiResult;
use crate::api::extract::{AdminSession, JsonRequest};
use crate::content::document::PROJECTS;
use crate::content::projects::{check_submission, normalize_for_read};
use crate::content::{ensure_collection_seeded, into_document};
use crate::core::{AppState, Error};

/// Public project listing, or one project with `?id=`
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<Value>> {
    ensure_collection_seeded(&state.repository, PROJECTS).await;

    match query.id() {
        Some(id) => {
            let project = state
                .repository
                .get_by_id(PROJECTS, id)
                .await
                .ok_or_else(|| Error::not_found("Project not found"))?;
            Ok(Json(Value::Object(normalize_for_read(project))))
        }
        None => {
            let projects = state
                .repository
                .list(PROJECTS)
                .await
                .into_iter()
                .map(|project| Value::Object(normalize_for_read(project)))
                .collect();
            Ok(Json(Value::Array(projects)))
        }
    }
}

/// Create a project from the admin editor
pub async fn create_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    JsonRequest(body): JsonRequest<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let project = check_submission(&into_document(body)?, false)?;
    let created = state.repository.create(PROJECTS, project).await?;
    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}

/// Save a project from the admin editor; the editor always sends every field
pub async fn update_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<IdQuery>,
    JsonRequest(body): JsonRequest<Value>,
) -> ApiResult<Json<Value>> {
    let id = query.require()?;
    let project = check_submission(&into_document(body)?, false)?;

    let updated = state
        .repository
        .update(PROJECTS, id, project)
        .await?
        .ok_or_else(|| Error::not_found("Project not found"))?;
    Ok(Json(Value::Object(updated)))
}

/// Delete a project
pub async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<Value>> {
    let id = query.require()?;

    if !state.repository.remove(PROJECTS, id).await? {
        return Err(Error::not_found("Project not found").into());
    }
    Ok(Json(success()))
}
