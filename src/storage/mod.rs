//! Storage layer for the content service
//!
//! This module provides the storage abstraction that lets the repository run
//! unchanged over different document stores. Every backend stores documents
//! that already carry an application `id`; generating ids, merging partial
//! updates and degrading reads are the repository's job.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::content::Document;
use crate::core::StoreResult;
#[cfg(doc)]
use crate::core::StoreError;

/// In-memory collections (DashMap)
pub mod memory;

/// One JSON file per collection
pub mod json_file;

/// MongoDB document database
pub mod mongo;

/// Backend selection from configuration
pub mod factory;

pub use factory::create_store;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Shared handle to whichever backend is configured
pub type SharedStore = Arc<dyn DocumentStore>;

/// Which backend is behind a [`DocumentStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// In-memory
    Memory,
    /// JSON files
    JsonFile,
    /// MongoDB
    MongoDb,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => write!(f, "memory"),
            StoreKind::JsonFile => write!(f, "json_file"),
            StoreKind::MongoDb => write!(f, "mongodb"),
        }
    }
}

/// Trait for document store implementations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend kind, for diagnostics
    fn kind(&self) -> StoreKind;

    /// Every document in a collection; a collection that does not exist is empty
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Look up one document by its id
    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Persist a new document (it already carries its id).
    ///
    /// Fails with [`StoreError::Conflict`] when the collection already holds that id.
    async fn insert(&self, collection: &str, doc: Document) -> StoreResult<()>;

    /// Persist several new documents
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> StoreResult<()> {
        for doc in docs {
            self.insert(collection, doc).await?;
        }
        Ok(())
    }

    /// Replace the stored document with this id; false when nothing matched
    async fn replace(&self, collection: &str, id: &str, doc: Document) -> StoreResult<bool>;

    /// Delete the document with this id; false when nothing matched
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Number of documents in a collection
    async fn count(&self, collection: &str) -> StoreResult<u64>;

    /// Insert `docs` only if the collection is empty; true when they were inserted.
    ///
    /// The default checks the count right before inserting, which leaves a narrow
    /// window for concurrent seeders. Backends that can do better override it.
    async fn seed_if_empty(&self, collection: &str, docs: Vec<Document>) -> StoreResult<bool> {
        if self.count(collection).await? > 0 {
            return Ok(false);
        }
        self.insert_many(collection, docs).await?;
        Ok(true)
    }

    /// Names of every collection that currently exists
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Remove a collection and all of its documents
    async fn drop_collection(&self, collection: &str) -> StoreResult<()>;
}
