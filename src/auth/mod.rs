//! Admin authentication
//!
//! One admin account comes from configuration. A successful login issues a
//! signed session token: the base64url-encoded claims, a dot, and a blake3
//! keyed hash of the encoded claims. Nothing is stored server side.

pub mod token;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::config::AuthConfig;
use crate::core::{Error, Result};

pub use token::Claims;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "cms_session";

/// Subject id of the single admin account
const ADMIN_SUBJECT: &str = "1";

/// Context string for deriving the signing key
const KEY_CONTEXT: &str = "site-cms 2024-01-01 session token signing";

/// The signed-in admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// An issued session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// Credential check and session token signing
pub struct AuthService {
    config: AuthConfig,
    key: [u8; 32],
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let key = blake3::derive_key(KEY_CONTEXT, config.session_secret.as_bytes());
        Self { config, key }
    }

    /// Whether a password hash is configured at all
    pub fn login_enabled(&self) -> bool {
        self.config.login_enabled()
    }

    /// Check credentials and issue a session. The bcrypt comparison runs on
    /// the blocking pool.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let Some(hash) = self.config.admin_password_hash.clone().filter(|h| !h.is_empty()) else {
            warn!("Login attempted but no admin password hash is configured");
            return Err(Error::unauthorized("Invalid email or password"));
        };

        if email.is_empty() || password.is_empty() {
            return Err(Error::unauthorized("Invalid email or password"));
        }
        if !email.trim().eq_ignore_ascii_case(&self.config.admin_email) {
            info!("Login rejected for unknown account");
            return Err(Error::unauthorized("Invalid email or password"));
        }

        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| Error::internal(format!("Password check aborted: {}", e)))?
            .map_err(|e| {
                warn!("Configured admin password hash is unusable: {}", e);
                Error::unauthorized("Invalid email or password")
            })?;

        if !verified {
            info!("Login rejected: wrong password");
            return Err(Error::unauthorized("Invalid email or password"));
        }

        info!(email = %self.config.admin_email, "Admin signed in");
        Ok(self.issue(Utc::now()))
    }

    /// Issue a session for the admin account starting at `now`
    pub fn issue(&self, now: DateTime<Utc>) -> Session {
        let expires_at = now + Duration::days(i64::from(self.config.session_ttl_days));
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            name: self.config.admin_name.clone(),
            email: self.config.admin_email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        Session {
            token: token::sign(&claims, &self.key),
            expires_at,
            user: claims.user(),
        }
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token's signature and expiry at a given instant
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let claims = token::open(token, &self.key)
            .ok_or_else(|| Error::unauthorized("Invalid session token"))?;

        if claims.exp <= now.timestamp() {
            return Err(Error::unauthorized("Session expired"));
        }
        Ok(claims)
    }

    /// `Set-Cookie` value carrying a session
    pub fn session_cookie(&self, session: &Session) -> String {
        let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, session.token, max_age
        )
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> String {
        format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
    }
}

/// Session token from a `Cookie` header value
pub fn token_from_cookies(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Session token from an `Authorization` header value
pub fn token_from_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// bcrypt hash for the admin password setting
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| Error::internal(format!("Failed to hash password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_password(password: &str) -> AuthService {
        AuthService::new(AuthConfig {
            admin_password_hash: Some(bcrypt::hash(password, 4).unwrap()),
            session_secret: "test-secret".to_string(),
            ..AuthConfig::default()
        })
    }

    #[tokio::test]
    async fn test_login_with_correct_credentials() {
        let auth = service_with_password("hunter2");
        let session = auth.login("Admin@Example.com", "hunter2").await.unwrap();
        assert_eq!(session.user.email, "admin@example.com");

        let claims = auth.verify(&session.token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_login_rejections() {
        let auth = service_with_password("hunter2");
        assert!(auth.login("admin@example.com", "wrong").await.is_err());
        assert!(auth.login("someone@example.com", "hunter2").await.is_err());
        assert!(auth.login("", "").await.is_err());

        let disabled = AuthService::new(AuthConfig::default());
        assert!(!disabled.login_enabled());
        let err = disabled.login("admin@example.com", "anything").await.unwrap_err();
        assert_eq!(err.reason(), "unauthorized");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = AuthService::new(AuthConfig::default());
        let issued = Utc::now() - Duration::days(31);
        let session = auth.issue(issued);
        assert!(auth.verify(&session.token).is_err());
        assert!(auth.verify_at(&session.token, issued + Duration::days(1)).is_ok());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let ours = AuthService::new(AuthConfig::default());
        let theirs = AuthService::new(AuthConfig {
            session_secret: "another".to_string(),
            ..AuthConfig::default()
        });
        let session = theirs.issue(Utc::now());
        assert!(ours.verify(&session.token).is_err());
    }

    #[test]
    fn test_header_parsing() {
        assert_eq!(token_from_cookies("a=1; cms_session=tok; b=2"), Some("tok"));
        assert_eq!(token_from_cookies("cms_session="), None);
        assert_eq!(token_from_cookies("other=x"), None);
        assert_eq!(token_from_bearer("Bearer abc"), Some("abc"));
        assert_eq!(token_from_bearer("Basic abc"), None);
    }

    #[test]
    fn test_cookies() {
        let auth = AuthService::new(AuthConfig::default());
        let session = auth.issue(Utc::now());
        let cookie = auth.session_cookie(&session);
        assert!(cookie.starts_with("cms_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(auth.clear_cookie().contains("Max-Age=0"));
    }
}
