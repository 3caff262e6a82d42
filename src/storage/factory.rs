//! Storage factory for creating storage implementations based on configuration

use std::sync::Arc;
use tracing::info;

use crate::core::config::{StorageConfig, StorageType};
use crate::storage::{JsonFileStore, MemoryStore, MongoStore, SharedStore};

/// Create a storage implementation based on configuration.
///
/// No backend touches the network or disk here; MongoDB connects on first use.
pub fn create_store(config: &StorageConfig) -> SharedStore {
    match config.storage_type {
        StorageType::Memory => {
            info!("Initializing in-memory store");
            Arc::new(MemoryStore::new())
        }
        StorageType::JsonFile => {
            info!("Initializing JSON file store at {:?}", config.data_dir);
            Arc::new(JsonFileStore::new(config.data_dir.clone()))
        }
        StorageType::MongoDb => {
            info!(
                "Initializing MongoDB store (database: {})",
                config.mongodb.database
            );
            Arc::new(MongoStore::new(config.mongodb.clone()))
        }
    }
}
