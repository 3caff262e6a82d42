//! Application State Management
//!
//! This module defines the central AppState that holds all application services.
//! It is built once by the factory and cloned into every request handler.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::content::ContentRepository;
use crate::core::config::Config;
use crate::media::MediaStore;

/// Central application state holding all services and components
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Generic collection repository over the configured store
    pub repository: ContentRepository,

    /// Admin login and session verification
    pub auth: Arc<AuthService>,

    /// Destination for uploaded media
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    /// Create a new AppState from initialized services
    pub fn new(
        config: Config,
        repository: ContentRepository,
        auth: AuthService,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repository,
            auth: Arc::new(auth),
            media,
        }
    }
}
