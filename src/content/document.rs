//! Documents, identity and collection naming

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::{Error, Result};

/// One record: a mapping from field name to value plus a reserved `id` field
pub type Document = Map<String, Value>;

/// Reserved application identity field
pub const ID_FIELD: &str = "id";

/// Native identity field of the document database
pub const NATIVE_ID_FIELD: &str = "_id";

/// Collections served by the public site
pub const NAVIGATION: &str = "navigation";
/// Hero section singleton
pub const HERO: &str = "hero";
/// Service listing
pub const SERVICES: &str = "services";
/// About section singleton
pub const ABOUT: &str = "about";
/// Project listing
pub const PROJECTS: &str = "projects";
/// Contact details singleton
pub const CONTACT: &str = "contact";
/// Footer singleton
pub const FOOTER: &str = "footer";
/// Site settings singleton
pub const SITE_CONFIG: &str = "site-config";
/// Inquiries submitted through the public contact form
pub const CONTACTS: &str = "contacts";

/// Every collection the site knows about, in display order
pub const KNOWN_COLLECTIONS: &[&str] = &[
    NAVIGATION, HERO, SERVICES, ABOUT, PROJECTS, CONTACT, FOOTER, SITE_CONFIG, CONTACTS,
];

/// Collections whose documents are not readable without an admin session
pub const PRIVATE_COLLECTIONS: &[&str] = &[CONTACTS];

static COLLECTION_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]{0,63}$").expect("valid collection regex"));

/// Reject collection names that could escape a data directory or are otherwise unusable
pub fn validate_collection_name(name: &str) -> Result<()> {
    if COLLECTION_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!("Invalid collection name: {:?}", name)))
    }
}

/// Whether a collection requires an admin session to read
pub fn is_private_collection(name: &str) -> bool {
    PRIVATE_COLLECTIONS.contains(&name)
}

/// Application id of a document; missing, non-string and empty ids count as absent
pub fn document_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Fresh 128-bit random identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Make sure the document carries an application id, generating one when absent
pub fn ensure_id(doc: &mut Document) -> String {
    match document_id(doc) {
        Some(id) => id.to_string(),
        None => {
            let id = new_id();
            doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

/// Field-wise shallow merge of `partial` onto `stored`; identity fields in `partial` are ignored
pub fn merge(stored: &Document, partial: Document) -> Document {
    let mut merged = stored.clone();
    for (key, value) in partial {
        if key == ID_FIELD || key == NATIVE_ID_FIELD {
            continue;
        }
        merged.insert(key, value);
    }
    merged
}

/// Interpret a JSON value as a document, rejecting anything that is not an object
pub fn into_document(value: Value) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_input(format!(
            "Expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        into_document(value).unwrap()
    }

    #[test]
    fn test_collection_names() {
        for ok in ["hero", "site-config", "contacts", "a1_b"] {
            assert!(validate_collection_name(ok).is_ok(), "{}", ok);
        }
        for bad in ["", "../etc", "Hero", "a/b", "-x", "a.json"] {
            assert!(validate_collection_name(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn test_absent_ids() {
        assert_eq!(document_id(&doc(json!({}))), None);
        assert_eq!(document_id(&doc(json!({"id": ""}))), None);
        assert_eq!(document_id(&doc(json!({"id": null}))), None);
        assert_eq!(document_id(&doc(json!({"id": 7}))), None);
        assert_eq!(document_id(&doc(json!({"id": "abc"}))), Some("abc"));
    }

    #[test]
    fn test_ensure_id_keeps_existing() {
        let mut d = doc(json!({"id": "keep"}));
        assert_eq!(ensure_id(&mut d), "keep");

        let mut d = doc(json!({"title": "x"}));
        let id = ensure_id(&mut d);
        assert_eq!(id.len(), 36);
        assert_eq!(document_id(&d), Some(id.as_str()));
    }

    #[test]
    fn test_merge_ignores_identity() {
        let stored = doc(json!({"id": "a", "title": "T", "subtitle": "S"}));
        let merged = merge(&stored, doc(json!({"id": "b", "_id": "c", "subtitle": "new"})));
        assert_eq!(Value::Object(merged), json!({"id": "a", "title": "T", "subtitle": "new"}));
    }

    #[test]
    fn test_into_document_rejects_non_objects() {
        assert!(into_document(json!([1, 2])).is_err());
        assert!(into_document(json!("x")).is_err());
    }

    proptest! {
        #[test]
        fn prop_merge_changes_only_the_given_field(
            fields in proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
            key in "[a-z]{1,6}",
            value in any::<i64>(),
        ) {
            let mut stored = Document::new();
            stored.insert(ID_FIELD.into(), json!("fixed"));
            for (k, v) in &fields {
                if k != ID_FIELD {
                    stored.insert(k.clone(), json!(v));
                }
            }

            let mut partial = Document::new();
            partial.insert(key.clone(), json!(value));
            let merged = merge(&stored, partial);

            if key != ID_FIELD {
                prop_assert_eq!(merged.get(&key), Some(&json!(value)));
            }
            prop_assert_eq!(merged.get(ID_FIELD), Some(&json!("fixed")));
            for (k, v) in &stored {
                if k != &key {
                    prop_assert_eq!(merged.get(k), Some(v));
                }
            }
        }
    }
}
