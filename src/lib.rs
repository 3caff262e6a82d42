//! site-cms - a small content service for a marketing site
//!
//! Public pages read site sections (navigation, hero, services, projects and
//! so on) from named document collections; a single admin account edits them
//! through a schema-validated HTTP API. Collections live in memory, in JSON
//! files or in MongoDB behind one repository contract.

// Core foundational modules
pub mod core;

// Main functional modules
pub mod api;
pub mod auth;
pub mod content;
pub mod forms;
pub mod media;
pub mod storage;

// Re-export commonly used items for convenience
pub use crate::core::{Config, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
