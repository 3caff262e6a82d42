//! Copy collections from one store into another
//!
//! Used to move a site from JSON files into the document database. Each
//! target collection is dropped and rewritten; source collections that do not
//! exist are skipped so the target keeps its current content.

use serde::Serialize;
use tracing::info;

use crate::content::document::{self, KNOWN_COLLECTIONS};
use crate::core::Result;
use crate::storage::DocumentStore;

/// Outcome of a migration run
#[derive(Debug, Default, Serialize)]
pub struct MigrationReport {
    /// Collections copied with the number of documents in each
    pub copied: Vec<(String, usize)>,
    /// Collections absent from the source
    pub skipped: Vec<String>,
}

impl MigrationReport {
    /// Total documents written to the target
    pub fn total_documents(&self) -> usize {
        self.copied.iter().map(|(_, count)| count).sum()
    }
}

/// Copy every known collection from `source` into `target`
pub async fn migrate_collections(
    source: &dyn DocumentStore,
    target: &dyn DocumentStore,
) -> Result<MigrationReport> {
    let available = source.list_collections().await?;
    let mut report = MigrationReport::default();

    for collection in KNOWN_COLLECTIONS {
        if !available.iter().any(|name| name == collection) {
            report.skipped.push(collection.to_string());
            continue;
        }

        let mut docs = source.find_all(collection).await?;
        for doc in docs.iter_mut() {
            doc.remove(document::NATIVE_ID_FIELD);
            document::ensure_id(doc);
        }

        target.drop_collection(collection).await?;
        let count = docs.len();
        target.insert_many(collection, docs).await?;

        info!(collection, count, "collection migrated");
        report.copied.push((collection.to_string(), count));
    }

    Ok(report)
}
