//! Generic collection repository
//!
//! Uniform list/get/create/update/remove over any named collection, with no
//! per-collection schema knowledge. Reads degrade when the store fails so the
//! public site keeps rendering; writes always propagate the failure.

use tracing::{debug, error, info, warn};

use crate::content::document::{self, Document};
use crate::core::{Result, StoreError};
use crate::storage::{SharedStore, StoreKind};

/// Repository over the configured document store
#[derive(Clone)]
pub struct ContentRepository {
    store: SharedStore,
}

fn log_degraded_read(operation: &str, collection: &str, err: &StoreError) {
    if err.is_unavailable() {
        warn!(operation, collection, "store unavailable, degrading read: {}", err);
    } else {
        error!(operation, collection, "store read failed, degrading: {}", err);
    }
}

impl ContentRepository {
    /// Wrap a store
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Backend kind behind this repository
    pub fn store_kind(&self) -> StoreKind {
        self.store.kind()
    }

    /// Underlying store, for maintenance tasks like seeding and migration
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Every document in the collection; empty when the collection does not
    /// exist or the store cannot be read
    pub async fn list(&self, collection: &str) -> Vec<Document> {
        if document::validate_collection_name(collection).is_err() {
            return Vec::new();
        }
        match self.store.find_all(collection).await {
            Ok(docs) => docs,
            Err(err) => {
                log_degraded_read("list", collection, &err);
                Vec::new()
            }
        }
    }

    /// The document with this id, or `None` when absent or unreadable
    pub async fn get_by_id(&self, collection: &str, id: &str) -> Option<Document> {
        if id.is_empty() || document::validate_collection_name(collection).is_err() {
            return None;
        }
        match self.store.find_by_id(collection, id).await {
            Ok(doc) => doc,
            Err(err) => {
                log_degraded_read("get_by_id", collection, &err);
                None
            }
        }
    }

    /// Number of documents in the collection; 0 when unreadable
    pub async fn count(&self, collection: &str) -> u64 {
        if document::validate_collection_name(collection).is_err() {
            return 0;
        }
        match self.store.count(collection).await {
            Ok(count) => count,
            Err(err) => {
                log_degraded_read("count", collection, &err);
                0
            }
        }
    }

    /// Persist a new document, assigning an id when it has none.
    ///
    /// A client-supplied id already present in the collection is a
    /// [`StoreError::Conflict`].
    pub async fn create(&self, collection: &str, mut doc: Document) -> Result<Document> {
        document::validate_collection_name(collection)?;
        doc.remove(document::NATIVE_ID_FIELD);
        let id = document::ensure_id(&mut doc);

        self.store.insert(collection, doc.clone()).await?;
        info!(collection, id = %id, "document created");
        Ok(doc)
    }

    /// Shallow-merge `partial` onto the stored document. `Ok(None)` when no
    /// document has this id.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        partial: Document,
    ) -> Result<Option<Document>> {
        document::validate_collection_name(collection)?;
        if id.is_empty() {
            return Ok(None);
        }

        let Some(stored) = self.store.find_by_id(collection, id).await? else {
            debug!(collection, id, "update target not found");
            return Ok(None);
        };

        let merged = document::merge(&stored, partial);
        if !self.store.replace(collection, id, merged.clone()).await? {
            // Deleted between the read and the write.
            return Ok(None);
        }

        info!(collection, id, "document updated");
        Ok(Some(merged))
    }

    /// Delete the document with this id; false when it did not exist
    pub async fn remove(&self, collection: &str, id: &str) -> Result<bool> {
        document::validate_collection_name(collection)?;
        if id.is_empty() {
            return Ok(false);
        }

        let deleted = self.store.delete(collection, id).await?;
        if deleted {
            info!(collection, id, "document deleted");
        }
        Ok(deleted)
    }
}
