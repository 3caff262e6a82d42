//! Site-wide endpoints: health, page aggregate, forms and admin diagnostics

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::api::error::ApiResult;
use crate::api::extract::AdminSession;
use crate::content::document::{
    ABOUT, CONTACT, FOOTER, HERO, KNOWN_COLLECTIONS, NAVIGATION, PROJECTS, SERVICES, SITE_CONFIG,
};
use crate::content::projects::normalize_for_read;
use crate::content::{ensure_collection_seeded, ContentRepository};
use crate::core::{AppState, Error};
use crate::forms::{form_names, schema_for};

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "site-cms",
        "version": crate::VERSION,
    }))
}

/// Endpoint index
pub async fn api_index() -> Json<Value> {
    Json(json!({
        "name": "site-cms",
        "version": crate::VERSION,
        "endpoints": {
            "content": {
                "list_or_get": "GET /api/content/{collection}?id=",
                "create": "POST /api/content/{collection}",
                "update": "PUT /api/content/{collection}?id=",
                "delete": "DELETE /api/content/{collection}?id=",
            },
            "site": {
                "page": "GET /api/page",
                "projects": "GET /api/projects?id=",
                "admin_projects": "POST|PUT|DELETE /api/admin/projects",
                "inquiry": "POST /api/contacts",
                "forms": "GET /api/forms/{collection}",
                "upload": "POST /api/upload",
            },
            "auth": {
                "login": "POST /api/auth/login",
                "logout": "POST /api/auth/logout",
                "session": "GET /api/auth/session",
            },
            "system": {
                "health": "GET /health",
                "stats": "GET /api/admin/stats",
                "store_status": "GET /api/store/status",
            },
        },
        "collections": KNOWN_COLLECTIONS,
        "forms": form_names(),
    }))
}

/// Sections that render as a single document rather than a list
const SINGLETONS: &[(&str, &str)] = &[
    (HERO, "hero"),
    (ABOUT, "about"),
    (CONTACT, "contact"),
    (FOOTER, "footer"),
    (SITE_CONFIG, "siteConfig"),
];

async fn first_document(repository: &ContentRepository, collection: &str) -> Value {
    repository
        .list(collection)
        .await
        .into_iter()
        .next()
        .map(Value::Object)
        .unwrap_or(Value::Null)
}

async fn seeded_list(repository: &ContentRepository, collection: &str) -> Vec<Value> {
    ensure_collection_seeded(repository, collection).await;
    repository
        .list(collection)
        .await
        .into_iter()
        .map(Value::Object)
        .collect()
}

/// Every public section of the site in one response
pub async fn page(State(state): State<AppState>) -> Json<Value> {
    let repository = &state.repository;
    let mut page = Map::new();

    page.insert(
        "navigation".to_string(),
        Value::Array(seeded_list(repository, NAVIGATION).await),
    );
    page.insert(
        "services".to_string(),
        Value::Array(seeded_list(repository, SERVICES).await),
    );

    ensure_collection_seeded(repository, PROJECTS).await;
    let projects = repository
        .list(PROJECTS)
        .await
        .into_iter()
        .map(|project| Value::Object(normalize_for_read(project)))
        .collect();
    page.insert("projects".to_string(), Value::Array(projects));

    for (collection, key) in SINGLETONS {
        ensure_collection_seeded(repository, collection).await;
        page.insert(key.to_string(), first_document(repository, collection).await);
    }

    Json(Value::Object(page))
}

/// Form descriptors for a collection's admin editor
pub async fn form_schema(Path(collection): Path<String>) -> ApiResult<Json<Value>> {
    let schema = schema_for(&collection)
        .ok_or_else(|| Error::not_found(format!("No form for collection '{}'", collection)))?;
    let value = serde_json::to_value(schema)
        .map_err(|e| Error::internal(format!("Failed to encode form: {}", e)))?;
    Ok(Json(value))
}

/// Document counts per collection
pub async fn admin_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Json<Value> {
    let mut counts = Map::new();
    for collection in KNOWN_COLLECTIONS {
        let count = state.repository.count(collection).await;
        counts.insert(collection.to_string(), json!(count));
    }

    Json(json!({
        "storage": state.repository.store_kind().to_string(),
        "collections": counts,
    }))
}

/// Backing store reachability
pub async fn store_status(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Json<Value> {
    let kind = state.repository.store_kind().to_string();

    match state.repository.store().list_collections().await {
        Ok(collections) => Json(json!({
            "kind": kind,
            "reachable": true,
            "collections": collections,
        })),
        Err(err) => {
            warn!("Store status check failed: {}", err);
            Json(json!({
                "kind": kind,
                "reachable": false,
                "collections": [],
                "error": err.to_string(),
            }))
        }
    }
}
