//! MongoDB storage
//!
//! The connection is opened lazily on first use and shared by every request.
//! Documents are addressed by the application `id` field; ids that look like a
//! native ObjectId fall back to `_id` so legacy rows stay reachable. `_id`
//! itself never leaves this module.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document as BsonDocument};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::content::{document_id, validate_collection_name, Document, ID_FIELD, NATIVE_ID_FIELD};
use crate::core::config::MongoConfig;
use crate::core::{StoreError, StoreResult};
use crate::storage::{DocumentStore, StoreKind};

static OBJECT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid object id regex"));

/// Whether an id string could be a native ObjectId
pub fn looks_like_object_id(id: &str) -> bool {
    OBJECT_ID.is_match(id)
}

/// MongoDB-backed document store
pub struct MongoStore {
    config: MongoConfig,
    /// Single-flight connection: concurrent first callers await the same attempt
    database: OnceCell<Database>,
}

impl MongoStore {
    /// Create a store; no connection is made until the first operation
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            database: OnceCell::new(),
        }
    }

    /// Whether a connection has been established
    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    async fn database(&self) -> StoreResult<&Database> {
        // A failed attempt leaves the cell empty, so the next call retries.
        self.database
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.config.uri)
                    .await
                    .map_err(translate)?;
                options.app_name = Some("site-cms".to_string());
                options.connect_timeout = Some(self.config.connect_timeout());
                options.server_selection_timeout = Some(self.config.connect_timeout());

                let client = Client::with_options(options).map_err(translate)?;
                let database = client.database(&self.config.database);
                database
                    .run_command(doc! { "ping": 1 })
                    .await
                    .map_err(|e| {
                        warn!("Failed to connect to MongoDB: {}", e);
                        translate(e)
                    })?;

                info!(database = %self.config.database, "Connected to MongoDB");
                Ok::<Database, StoreError>(database)
            })
            .await
    }

    async fn collection(&self, name: &str) -> StoreResult<Collection<BsonDocument>> {
        validate_collection_name(name)
            .map_err(|_| StoreError::InvalidCollection(name.to_string()))?;
        Ok(self.database().await?.collection::<BsonDocument>(name))
    }

    /// Find the stored row for an id, returning the filter that matched it
    async fn locate(
        &self,
        collection: &Collection<BsonDocument>,
        id: &str,
    ) -> StoreResult<Option<(BsonDocument, BsonDocument)>> {
        let by_app_id = doc! { "id": id };
        if let Some(row) = collection
            .find_one(by_app_id.clone())
            .await
            .map_err(translate)?
        {
            return Ok(Some((by_app_id, row)));
        }

        let Some(oid) = parse_object_id(id) else {
            return Ok(None);
        };
        let by_native_id = doc! { "_id": oid };
        let row = collection
            .find_one(by_native_id.clone())
            .await
            .map_err(translate)?;
        Ok(row.map(|row| (by_native_id, row)))
    }
}

fn parse_object_id(id: &str) -> Option<ObjectId> {
    if looks_like_object_id(id) {
        ObjectId::parse_str(id).ok()
    } else {
        None
    }
}

/// Map driver errors into the store taxonomy
fn translate(err: MongoError) -> StoreError {
    match *err.kind {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
            StoreError::Unavailable(err.to_string())
        }
        ErrorKind::InvalidArgument { .. } => StoreError::Backend(err.to_string()),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            StoreError::Serialization(err.to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Convert a stored row into an application document with normalized identity
fn from_bson(mut row: BsonDocument) -> Document {
    let native_id = row.remove(NATIVE_ID_FIELD);
    let mut doc = match Bson::Document(row).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Document::new(),
    };

    let has_app_id = doc
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());
    if !has_app_id {
        if let Some(Bson::ObjectId(oid)) = native_id {
            doc.insert(ID_FIELD.to_string(), Value::String(oid.to_hex()));
        }
    }
    doc
}

/// Convert an application document into a row; `_id` is left to the database
fn to_bson(mut doc: Document) -> StoreResult<BsonDocument> {
    doc.remove(NATIVE_ID_FIELD);
    mongodb::bson::to_document(&doc).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn kind(&self) -> StoreKind {
        StoreKind::MongoDb
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let collection = self.collection(collection).await?;
        let mut cursor = collection.find(doc! {}).await.map_err(translate)?;

        let mut docs = Vec::new();
        while cursor.advance().await.map_err(translate)? {
            let row = cursor.deserialize_current().map_err(translate)?;
            docs.push(from_bson(row));
        }
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collection = self.collection(collection).await?;
        let found = self.locate(&collection, id).await?;
        Ok(found.map(|(_, row)| from_bson(row)))
    }

    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<()> {
        let collection = self.collection(collection).await?;
        if let Some(id) = document_id(&doc) {
            let taken = collection
                .find_one(doc! { "id": id })
                .await
                .map_err(translate)?;
            if taken.is_some() {
                return Err(StoreError::Conflict(id.to_string()));
            }
        }
        collection
            .insert_one(to_bson(doc)?)
            .await
            .map_err(translate)?;
        Ok(())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let collection = self.collection(collection).await?;
        let rows = docs
            .into_iter()
            .map(to_bson)
            .collect::<StoreResult<Vec<_>>>()?;
        collection.insert_many(rows).await.map_err(translate)?;
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Document) -> StoreResult<bool> {
        let collection = self.collection(collection).await?;
        let Some((filter, _)) = self.locate(&collection, id).await? else {
            return Ok(false);
        };
        let result = collection
            .replace_one(filter, to_bson(doc)?)
            .await
            .map_err(translate)?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let collection = self.collection(collection).await?;
        let Some((filter, _)) = self.locate(&collection, id).await? else {
            return Ok(false);
        };
        let result = collection.delete_one(filter).await.map_err(translate)?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        let collection = self.collection(collection).await?;
        collection.count_documents(doc! {}).await.map_err(translate)
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut names = self
            .database()
            .await?
            .list_collection_names()
            .await
            .map_err(translate)?;
        names.sort();
        Ok(names)
    }

    async fn drop_collection(&self, collection: &str) -> StoreResult<()> {
        let collection = self.collection(collection).await?;
        collection.drop().await.map_err(translate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_id_heuristic() {
        assert!(looks_like_object_id("65f1a2b3c4d5e6f7a8b9c0d1"));
        assert!(!looks_like_object_id("65f1a2b3c4d5e6f7a8b9c0d"));
        assert!(!looks_like_object_id("6f1c9a2e-1d9b-4c45-9d0e-2f0a3b4c5d6e"));
        assert!(!looks_like_object_id("zzzzzzzzzzzzzzzzzzzzzzzz"));
    }

    #[test]
    fn test_native_id_becomes_application_id() {
        let oid = ObjectId::new();
        let row = doc! { "_id": oid, "title": "Legacy" };
        let doc = from_bson(row);
        assert_eq!(doc.get("id"), Some(&json!(oid.to_hex())));
        assert!(doc.get("_id").is_none());
        assert_eq!(doc.get("title"), Some(&json!("Legacy")));
    }

    #[test]
    fn test_application_id_wins_over_native_id() {
        let row = doc! { "_id": ObjectId::new(), "id": "app-id", "n": 3_i64 };
        let doc = from_bson(row);
        assert_eq!(doc.get("id"), Some(&json!("app-id")));
        assert_eq!(doc.get("n"), Some(&json!(3)));
    }

    #[test]
    fn test_to_bson_strips_native_id() {
        let doc = json!({"id": "a", "_id": "junk", "tags": ["x", "y"]})
            .as_object()
            .cloned()
            .unwrap();
        let row = to_bson(doc).unwrap();
        assert!(!row.contains_key("_id"));
        assert_eq!(row.get_str("id").unwrap(), "a");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let store = MongoStore::new(MongoConfig {
            uri: "mongodb://127.0.0.1:1".to_string(),
            database: "site_cms_test".to_string(),
            connect_timeout_secs: 1,
        });
        let err = store.count("hero").await.unwrap_err();
        assert!(err.is_unavailable(), "unexpected error: {}", err);
        assert!(!store.is_connected());
    }
}
