//! Site content: documents, the generic repository, seeding and project normalisation

pub mod document;
pub mod migrate;
pub mod projects;
pub mod repository;
pub mod seed;

pub use document::{
    document_id, ensure_id, into_document, is_private_collection, merge, validate_collection_name,
    Document, ID_FIELD, KNOWN_COLLECTIONS, NATIVE_ID_FIELD,
};
pub use migrate::{migrate_collections, MigrationReport};
pub use repository::ContentRepository;
pub use seed::{default_documents, ensure_collection_seeded, ensure_seeded, seed_defaults};
