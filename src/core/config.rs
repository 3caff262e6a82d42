//! Configuration management for the content service
//!
//! Settings come from a TOML file, then environment overrides, then validation.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "site-cms.toml";

/// Placeholder session secret; never accepted once login is enabled
pub const DEFAULT_SESSION_SECRET: &str = "change-me";

/// Shortest session secret accepted once login is enabled
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Available storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Volatile in-memory collections
    Memory,
    /// One JSON file per collection under `data_dir`
    JsonFile,
    /// MongoDB document database
    #[serde(rename = "mongodb")]
    MongoDb,
}

impl std::str::FromStr for StorageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(StorageType::Memory),
            "json_file" | "json" | "file" => Ok(StorageType::JsonFile),
            "mongodb" | "mongo" => Ok(StorageType::MongoDb),
            other => Err(Error::config(format!(
                "Invalid storage type: {}. Valid options: memory, json_file, mongodb",
                other
            ))),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Media upload configuration
    pub uploads: UploadConfig,

    /// Admin authentication
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub storage_type: StorageType,

    /// Data directory for the JSON file backend
    pub data_dir: PathBuf,

    /// Document database settings
    pub mongodb: MongoConfig,
}

/// MongoDB connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    /// Connection string
    pub uri: String,

    /// Database name
    pub database: String,

    /// Connect and server selection timeout in seconds
    pub connect_timeout_secs: u64,
}

/// Media upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded files are written to
    pub dir: PathBuf,

    /// Public URL prefix the directory is served under
    pub url_prefix: String,

    /// Largest accepted file in bytes
    pub max_bytes: usize,
}

/// Admin authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login email of the admin account
    pub admin_email: String,

    /// Display name of the admin account
    pub admin_name: String,

    /// bcrypt hash of the admin password (login disabled when unset)
    pub admin_password_hash: Option<String>,

    /// Secret the session signing key is derived from
    pub session_secret: String,

    /// Session lifetime in days
    pub session_ttl_days: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, compact)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::JsonFile,
            data_dir: PathBuf::from("./data"),
            mongodb: MongoConfig::default(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "website".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./public/uploads"),
            url_prefix: "/uploads".to_string(),
            max_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            admin_name: "Admin".to_string(),
            admin_password_hash: None,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_ttl_days: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl MongoConfig {
    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl AuthConfig {
    /// Whether a password hash is configured, which turns admin login on
    pub fn login_enabled(&self) -> bool {
        self.admin_password_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty())
    }
}

impl Config {
    /// Load configuration from an optional file, environment variables and defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Config::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the process environment in production)
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(addr) = lookup("CMS_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(storage_type) = lookup("CMS_STORAGE_TYPE") {
            self.storage.storage_type = storage_type.parse()?;
        }

        if let Some(data_dir) = lookup("CMS_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Some(uri) = lookup("MONGODB_URI") {
            self.storage.mongodb.uri = uri;
        }

        if let Some(db) = lookup("MONGODB_DB") {
            self.storage.mongodb.database = db;
        }

        if let Some(dir) = lookup("CMS_UPLOADS_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }

        if let Some(email) = lookup("ADMIN_EMAIL") {
            self.auth.admin_email = email;
        }

        if let Some(hash) = lookup("ADMIN_PASSWORD_HASH") {
            self.auth.admin_password_hash = Some(hash);
        }

        if let Some(secret) = lookup("CMS_SESSION_SECRET") {
            self.auth.session_secret = secret;
        }

        if let Some(level) = lookup("CMS_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => return Err(Error::config("Invalid log level")),
        }

        match self.logging.format.as_str() {
            "pretty" | "compact" => {}
            _ => return Err(Error::config("Invalid log format (pretty, compact)")),
        }

        if self.auth.session_secret.is_empty() {
            return Err(Error::config("Session secret must not be empty"));
        }

        if self.auth.login_enabled() {
            let secret = self.auth.session_secret.as_str();
            if secret == DEFAULT_SESSION_SECRET || secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(Error::config(format!(
                    "Admin login needs a session secret of at least {} characters (set CMS_SESSION_SECRET)",
                    MIN_SESSION_SECRET_LEN
                )));
            }
        }

        if self.auth.session_ttl_days == 0 {
            return Err(Error::config("Session lifetime must be at least one day"));
        }

        if self.uploads.max_bytes == 0 {
            return Err(Error::config("Upload size limit must be greater than zero"));
        }

        if !self.uploads.url_prefix.starts_with('/') {
            return Err(Error::config("Upload URL prefix must start with '/'"));
        }

        if self.storage.storage_type == StorageType::MongoDb && self.storage.mongodb.database.is_empty() {
            return Err(Error::config("MongoDB database name must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.storage_type, StorageType::JsonFile);
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.auth.session_ttl_days, 30);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [storage]
            storage_type = "mongodb"

            [storage.mongodb]
            database = "site"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.storage_type, StorageType::MongoDb);
        assert_eq!(config.storage.mongodb.database, "site");
        assert_eq!(config.storage.mongodb.uri, "mongodb://localhost:27017");
        assert_eq!(config.server.http_addr.port(), 3000);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CMS_STORAGE_TYPE", "memory"),
            ("CMS_HTTP_ADDR", "127.0.0.1:4000"),
            ("ADMIN_PASSWORD_HASH", "$2b$04$abc"),
        ]);
        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.server.http_addr.port(), 4000);
        assert_eq!(config.auth.admin_password_hash.as_deref(), Some("$2b$04$abc"));
    }

    #[test]
    fn test_invalid_storage_type_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "CMS_STORAGE_TYPE").then(|| "distributed".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = Config::default();
        config.logging.level = "verbose".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.session_secret.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.uploads.url_prefix = "uploads".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_login_requires_a_real_session_secret() {
        let mut config = Config::default();
        config.auth.admin_password_hash = Some("$2b$04$abc".into());
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.auth.session_secret = "short".into();
        assert!(config.validate().is_err());

        config.auth.session_secret = "k3v9-q8w2-z7x1-m4n6-p0r5-t2y8-u1i3".into();
        assert!(config.validate().is_ok());

        // Without a hash login is off and the placeholder is harmless.
        let config = Config::default();
        assert!(!config.auth.login_enabled());
        assert!(config.validate().is_ok());
    }
}
