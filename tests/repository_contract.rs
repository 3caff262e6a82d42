//! Repository contract run against every backend.
//!
//! Memory and JSON-file stores always run; MongoDB runs when
//! `CMS_TEST_MONGODB_URI` points at a reachable server.

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use site_cms::content::{default_documents, ensure_seeded, ContentRepository, Document};
use site_cms::core::config::MongoConfig;
use site_cms::storage::{JsonFileStore, MemoryStore, MongoStore, SharedStore};

fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

async fn create_then_get(repo: &ContentRepository) {
    let input = doc(json!({"title": "Widget", "price": 12, "tags": ["a", "b"], "meta": {"x": 1}}));
    let created = repo.create("services", input.clone()).await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let fetched = repo.get_by_id("services", &id).await.unwrap();
    for (key, value) in &input {
        assert_eq!(fetched.get(key), Some(value), "field {}", key);
    }
    assert_eq!(fetched["id"], json!(id));
    assert!(!fetched.contains_key("_id"));
}

async fn update_changes_one_field(repo: &ContentRepository) {
    let created = repo
        .create(
            "hero",
            doc(json!({"title": "Old", "subtitle": "Sub", "buttonText": "Go", "buttonLink": "#x"})),
        )
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let updated = repo
        .update("hero", id, doc(json!({"subtitle": "new"})))
        .await
        .unwrap()
        .unwrap();

    let stored = repo.get_by_id("hero", id).await.unwrap();
    assert_eq!(stored, updated);
    for (key, value) in &created {
        if key == "subtitle" {
            assert_eq!(stored[key], "new");
        } else {
            assert_eq!(&stored[key], value, "field {}", key);
        }
    }
    assert_eq!(stored.len(), created.len());
}

async fn update_missing_is_none(repo: &ContentRepository) {
    let result = repo
        .update("hero", "does-not-exist", doc(json!({"title": "x"})))
        .await
        .unwrap();
    assert!(result.is_none());
}

async fn remove_then_get(repo: &ContentRepository) {
    let created = repo.create("navigation", doc(json!({"title": "Home", "href": "#home"}))).await.unwrap();
    let id = created["id"].as_str().unwrap();

    assert!(repo.remove("navigation", id).await.unwrap());
    assert!(repo.get_by_id("navigation", id).await.is_none());
    // Removing again is a plain miss.
    assert!(!repo.remove("navigation", id).await.unwrap());
}

async fn remove_nonexistent(repo: &ContentRepository) {
    assert!(!repo.remove("projects", "no-such-id").await.unwrap());
    assert!(!repo.remove("never-created", "no-such-id").await.unwrap());
}

async fn duplicate_id_is_rejected(repo: &ContentRepository) {
    let first = repo
        .create("services", doc(json!({"id": "dup-id", "title": "first"})))
        .await
        .unwrap();

    let err = repo
        .create("services", doc(json!({"id": "dup-id", "title": "second"})))
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.reason(), "conflict");

    let matching: Vec<_> = repo
        .list("services")
        .await
        .into_iter()
        .filter(|d| d["id"] == "dup-id")
        .collect();
    assert_eq!(matching, vec![first]);

    // One remove clears the only copy.
    assert!(repo.remove("services", "dup-id").await.unwrap());
    assert!(repo.get_by_id("services", "dup-id").await.is_none());
}

async fn seeding_is_idempotent(repo: &ContentRepository) {
    let defaults = default_documents("services").unwrap();
    let collection = "seed-check";

    assert!(ensure_seeded(repo, collection, defaults.clone()).await.unwrap());
    assert!(!ensure_seeded(repo, collection, defaults.clone()).await.unwrap());

    let stored = repo.list(collection).await;
    assert_eq!(stored.len(), defaults.len());
    for default in &defaults {
        assert!(stored.contains(default));
    }
}

async fn list_keeps_every_document(repo: &ContentRepository) {
    for n in 0..3 {
        repo.create("footer", doc(json!({"n": n}))).await.unwrap();
    }
    let listed = repo.list("footer").await;
    assert_eq!(listed.len(), 3);
    assert_eq!(repo.count("footer").await, 3);
    assert!(repo.list("empty-collection").await.is_empty());
}

async fn run_contract(repo: ContentRepository) {
    create_then_get(&repo).await;
    update_changes_one_field(&repo).await;
    update_missing_is_none(&repo).await;
    remove_then_get(&repo).await;
    remove_nonexistent(&repo).await;
    duplicate_id_is_rejected(&repo).await;
    seeding_is_idempotent(&repo).await;
    list_keeps_every_document(&repo).await;
}

#[tokio::test]
async fn memory_store_honours_contract() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    run_contract(ContentRepository::new(store)).await;
}

#[tokio::test]
async fn json_file_store_honours_contract() {
    let dir = TempDir::new().unwrap();
    let store: SharedStore = Arc::new(JsonFileStore::new(dir.path()));
    run_contract(ContentRepository::new(store)).await;
}

#[tokio::test]
async fn json_file_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let first = ContentRepository::new(Arc::new(JsonFileStore::new(dir.path())));
    let created = first.create("about", doc(json!({"title": "About"}))).await.unwrap();

    let reopened = ContentRepository::new(Arc::new(JsonFileStore::new(dir.path())));
    let id = created["id"].as_str().unwrap();
    assert_eq!(reopened.get_by_id("about", id).await, Some(created));
}

#[tokio::test]
async fn mongodb_store_honours_contract() {
    let Ok(uri) = std::env::var("CMS_TEST_MONGODB_URI") else {
        eprintln!("CMS_TEST_MONGODB_URI not set, skipping");
        return;
    };

    let database = format!("site_cms_test_{}", uuid::Uuid::new_v4().simple());
    let store = Arc::new(MongoStore::new(MongoConfig {
        uri,
        database,
        ..MongoConfig::default()
    }));
    let shared: SharedStore = store.clone();

    run_contract(ContentRepository::new(shared.clone())).await;

    for collection in shared.list_collections().await.unwrap() {
        shared.drop_collection(&collection).await.unwrap();
    }
}

#[tokio::test]
async fn unreachable_mongodb_degrades_reads_and_fails_writes() {
    let store: SharedStore = Arc::new(MongoStore::new(MongoConfig {
        uri: "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200".to_string(),
        database: "unreachable".to_string(),
        connect_timeout_secs: 1,
    }));
    let repo = ContentRepository::new(store);

    assert!(repo.list("hero").await.is_empty());
    assert!(repo.get_by_id("hero", "1").await.is_none());
    assert_eq!(repo.count("hero").await, 0);

    let err = repo.create("hero", doc(json!({"title": "x"}))).await.unwrap_err();
    assert!(err.is_server_error());
}
