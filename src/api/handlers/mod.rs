//! HTTP request handlers

pub mod auth;
pub mod contacts;
pub mod content;
pub mod projects;
pub mod site;
pub mod upload;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::Error;

/// `?id=` query parameter shared by the collection endpoints
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id when present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The id, or a 400 for mutating routes that need one
    pub fn require(&self) -> Result<&str, Error> {
        self.id()
            .ok_or_else(|| Error::invalid_input("Missing ID parameter"))
    }
}

/// Body returned by successful deletes and logouts
pub(crate) fn success() -> Value {
    json!({ "success": true })
}
