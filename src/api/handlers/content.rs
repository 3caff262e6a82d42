//! Generic collection endpoints under `/api/content/{collection}`

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use tracing::debug;

use super::{success, IdQuery};
use crate::api::error::ApiResult;
use crate::api::extract::{authorize, AdminSession, JsonRequest};
use crate::content::{
    into_document, is_private_collection, projects, validate_collection_name, Document,
};
use crate::content::document::PROJECTS;
use crate::core::{AppState, Error, Result};
use crate::forms::schema_for;

/// Run the collection's form over a submission, if it has one
pub(crate) fn check_document(collection: &str, doc: Document, partial: bool) -> Result<Document> {
    if collection == PROJECTS {
        return Ok(projects::check_submission(&doc, partial)?);
    }
    match schema_for(collection) {
        Some(schema) if partial => Ok(schema.validate_partial(&doc)?),
        Some(schema) => Ok(schema.validate(&doc)?),
        None => Ok(doc),
    }
}

/// List a collection, or fetch one document with `?id=`
pub async fn get_content(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<IdQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    validate_collection_name(&collection)?;
    if is_private_collection(&collection) {
        authorize(&state.auth, &headers)?;
    }

    match query.id() {
        Some(id) => {
            let doc = state
                .repository
                .get_by_id(&collection, id)
                .await
                .ok_or_else(|| Error::not_found("Item not found"))?;
            Ok(Json(Value::Object(doc)))
        }
        None => {
            let docs = state.repository.list(&collection).await;
            debug!(collection = %collection, count = docs.len(), "collection listed");
            Ok(Json(Value::Array(docs.into_iter().map(Value::Object).collect())))
        }
    }
}

/// Create a document
pub async fn create_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(collection): Path<String>,
    JsonRequest(body): JsonRequest<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validate_collection_name(&collection)?;
    let doc = check_document(&collection, into_document(body)?, false)?;

    let created = state.repository.create(&collection, doc).await?;
    Ok((StatusCode::CREATED, Json(Value::Object(created))))
}

/// Shallow-merge a partial document onto the stored one
pub async fn update_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(collection): Path<String>,
    Query(query): Query<IdQuery>,
    JsonRequest(body): JsonRequest<Value>,
) -> ApiResult<Json<Value>> {
    validate_collection_name(&collection)?;
    let id = query.require()?;
    let partial = check_document(&collection, into_document(body)?, true)?;

    let updated = state
        .repository
        .update(&collection, id, partial)
        .await?
        .ok_or_else(|| Error::not_found("Item not found"))?;
    Ok(Json(Value::Object(updated)))
}

/// Delete a document
pub async fn delete_content(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(collection): Path<String>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Json<Value>> {
    validate_collection_name(&collection)?;
    let id = query.require()?;

    if !state.repository.remove(&collection, id).await? {
        return Err(Error::not_found("Item not found").into());
    }
    Ok(Json(success()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        into_document(value).unwrap()
    }

    #[test]
    fn test_collections_without_a_form_pass_through() {
        let input = doc(json!({"anything": [1, 2, 3]}));
        assert_eq!(check_document("custom", input.clone(), false).unwrap(), input);
    }

    #[test]
    fn test_partial_update_of_singleton() {
        let checked = check_document("hero", doc(json!({"subtitle": "new"})), true).unwrap();
        assert_eq!(checked, doc(json!({"subtitle": "new"})));

        let err = check_document("hero", doc(json!({"subtitle": "new"})), false).unwrap_err();
        assert_eq!(err.reason(), "validation_failed");
    }

    #[test]
    fn test_projects_are_normalized() {
        let checked = check_document(
            "projects",
            doc(json!({"title": "X", "description": "Y", "iconName": "Home", "tags": "a,b"})),
            false,
        )
        .unwrap();
        assert_eq!(checked["tags"], json!(["a", "b"]));
        assert_eq!(checked["link"], "#");
    }
}
