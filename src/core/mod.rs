//! Core service foundations
//!
//! Configuration, error handling, logging and the shared application state
//! every request handler works against.

pub mod app_state;
pub mod config;
pub mod error;
pub mod factory;
pub mod logging;

// Re-export commonly used items
pub use app_state::AppState;
pub use config::Config;
pub use error::{Error, Result, StoreError, StoreResult};
pub use factory::{create_app_state, seed_on_boot};
