//! Application Factory
//!
//! Builds the AppState with all required services based on configuration.

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthService;
use crate::content::{seed_defaults, ContentRepository};
use crate::core::app_state::AppState;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::media::LocalMediaStore;
use crate::storage::create_store;

/// Create AppState from configuration.
///
/// Nothing here needs the backing store to be reachable; seeding is a
/// separate step (see [`seed_on_boot`]).
pub fn create_app_state(config: Config) -> Result<AppState> {
    config.validate()?;

    let store = create_store(&config.storage);
    let repository = ContentRepository::new(store);

    let auth = AuthService::new(config.auth.clone());
    if !auth.login_enabled() {
        warn!("No admin password hash configured; admin login is disabled");
    }

    let media = Arc::new(LocalMediaStore::new(
        config.uploads.dir.clone(),
        config.uploads.url_prefix.clone(),
    ));

    info!(
        storage = %repository.store_kind(),
        uploads = ?config.uploads.dir,
        "Application state initialized"
    );
    Ok(AppState::new(config, repository, auth, media))
}

/// Seed default content at startup. Failures are logged and the server keeps booting.
pub async fn seed_on_boot(state: &AppState) {
    match seed_defaults(&state.repository).await {
        Ok(seeded) if seeded.is_empty() => info!("Content already present, nothing seeded"),
        Ok(seeded) => info!(collections = ?seeded, "Seeded default content"),
        Err(err) => warn!("Seeding skipped: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageType;
    use crate::storage::StoreKind;

    fn memory_config() -> Config {
        let mut config = Config::default();
        config.storage.storage_type = StorageType::Memory;
        config
    }

    #[tokio::test]
    async fn test_app_state_from_config() {
        let state = create_app_state(memory_config()).unwrap();
        assert_eq!(state.repository.store_kind(), StoreKind::Memory);
        assert!(!state.auth.login_enabled());

        seed_on_boot(&state).await;
        assert_eq!(state.repository.count("hero").await, 1);
    }

    #[test]
    fn test_login_with_placeholder_secret_is_refused() {
        let mut config = memory_config();
        config.auth.admin_password_hash = Some("$2b$04$abc".into());
        assert!(create_app_state(config.clone()).is_err());

        config.auth.session_secret = "a-long-enough-random-session-secret".into();
        assert!(create_app_state(config).unwrap().auth.login_enabled());
    }
}
