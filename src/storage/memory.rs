//! Simple in-memory storage implementation using DashMap
//!
//! Collections live in a concurrent map keyed by name; each collection is a
//! vector of JSON documents in insertion order. Nothing survives a restart.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::content::{document_id, Document};
use crate::core::{StoreError, StoreResult};
use crate::storage::{DocumentStore, StoreKind};

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    /// Map of collection name to its documents
    collections: DashMap<String, Vec<Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
        }
    }
}

fn position(docs: &[Document], id: &str) -> Option<usize> {
    docs.iter().position(|doc| document_id(doc) == Some(id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.clone())
            .unwrap_or_default())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            position(&docs, id).map(|index| docs[index].clone())
        }))
    }

    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<()> {
        // The entry guard covers both the id check and the push.
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if let Some(id) = document_id(&doc) {
            if position(&docs, id).is_some() {
                return Err(StoreError::Conflict(id.to_string()));
            }
        }
        docs.push(doc);
        debug!(collection, count = docs.len(), "memory insert");
        Ok(())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        Ok(())
    }

    async fn replace(&self, collection: &str, id: &str, doc: Document) -> StoreResult<bool> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match position(&docs, id) {
            Some(index) => {
                docs[index] = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| document_id(doc) != Some(id));
        Ok(docs.len() != before)
    }

    async fn count(&self, collection: &str) -> StoreResult<u64> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.len() as u64)
            .unwrap_or(0))
    }

    async fn seed_if_empty(&self, collection: &str, seed: Vec<Document>) -> StoreResult<bool> {
        // The entry guard holds the shard lock for the whole check-and-insert.
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        if !docs.is_empty() {
            return Ok(false);
        }
        docs.extend(seed);
        Ok(true)
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn drop_collection(&self, collection: &str) -> StoreResult<()> {
        self.collections.remove(collection);
        Ok(())
    }
}
