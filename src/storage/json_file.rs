//! JSON file storage: one `<collection>.json` array per collection
//!
//! Every write replaces the whole file through a temp file and an atomic
//! rename, so readers only ever see a complete collection.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::content::{document_id, validate_collection_name, Document};
use crate::core::{StoreError, StoreResult};
use crate::storage::{DocumentStore, StoreKind};

const FILE_EXT: &str = "json";

/// File-backed document store
pub struct JsonFileStore {
    data_dir: PathBuf,
    /// Serialises read-modify-write cycles; files have no atomic update
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir` (created lazily on first write)
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Directory holding the collection files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: &str) -> StoreResult<PathBuf> {
        validate_collection_name(collection)
            .map_err(|_| StoreError::InvalidCollection(collection.to_string()))?;
        Ok(self.data_dir.join(format!("{}.{}", collection, FILE_EXT)))
    }

    async fn read_collection(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let path = self.collection_path(collection)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_collection(&self, collection: &str, docs: &[Document]) -> StoreResult<()> {
        let path = self.collection_path(collection)?;
        fs::create_dir_all(&self.data_dir).await?;

        let content = serde_json::to_string_pretty(docs)?;

        // Atomic write
        let tmp_file = self
            .data_dir
            .join(format!(".{}-{}.tmp", collection, Uuid::new_v4()));
        fs::write(&tmp_file, content).await?;
        if let Err(e) = fs::rename(&tmp_file, &path).await {
            let _ = fs::remove_file(&tmp_file).await;
            return Err(StoreError::Io(e));
        }

        debug!(collection, count = docs.len(), "collection file written");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    fn kind(&self) -> StoreKind {
        StoreKind::JsonFile
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.read_collection(collection).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let docs = self.read_collection(collection).await?;
        Ok(docs.into_iter().find(|doc| document_id(doc) == Some(id)))
    }

    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        if let Some(id) = document_id(&doc) {
            if docs.iter().any(|existing| document_id(existing) == Some(id)) {
                return Err(StoreError::Conflict(id.to_string()));
            }
        }
        docs.push(doc);
        self.write_collection(collection, &docs).await
    }

    async fn insert_many(&self, collection: &str, new_docs: Vec<Document>) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        docs.extend(new_docs);
        self.write_collection(collection, &docs).await
    }

    async fn replace(&self, collection: &str, id: &str, doc: Document) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        let Some(slot) = docs.iter_mut().find(|d| document_id(d) == Some(id)) else {
            return Ok(false);
        };
        *slot = doc;
        self.write_collection(collection, &docs).await?;
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.read_collection(collection).await?;
        let before = docs.len();
        docs.retain(|doc| document_id(doc) != Some(id));
        if docs.len() == before {
            return Ok(false);
        }
        self.write_collection(collection, &docs).await?;
        Ok(true)
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        Ok(self.read_collection(collection).await?.len() as u64)
    }

    async fn seed_if_empty(&self, collection: &str, seed: Vec<Document>) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        if !self.read_collection(collection).await?.is_empty() {
            return Ok(false);
        }
        self.write_collection(collection, &seed).await?;
        Ok(true)
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_collection_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn drop_collection(&self, collection: &str) -> StoreResult<()> {
        let path = self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
