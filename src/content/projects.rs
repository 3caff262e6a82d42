//! Project listing normalisation
//!
//! Admin submissions send `tags` as a comma-separated string; legacy rows may
//! carry a bare string, nothing at all, or an empty `link`. Both paths below
//! turn those into the shape the public site renders: `tags` an array of
//! strings and `link` never empty.

use serde_json::Value;

use crate::content::document::{Document, PROJECTS};
use crate::forms::{schema_for, ValidationErrors};

/// Placeholder link for projects without one
pub const DEFAULT_LINK: &str = "#";

const TAGS: &str = "tags";
const LINK: &str = "link";

/// Split a comma-separated tag list, trimming and dropping empties
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn string_array(tags: Vec<String>) -> Value {
    Value::Array(tags.into_iter().map(Value::String).collect())
}

fn link_is_blank(doc: &Document) -> bool {
    match doc.get(LINK) {
        None | Some(Value::Null) => true,
        Some(Value::String(link)) => link.trim().is_empty(),
        Some(_) => false,
    }
}

/// Normalise a project on the admin write path.
///
/// When `partial` is set only fields present in the submission are touched,
/// so an update that leaves out `tags` or `link` keeps the stored values.
pub fn normalize_for_write(doc: &mut Document, partial: bool) {
    if !partial || doc.contains_key(TAGS) {
        let tags = match doc.get(TAGS) {
            Some(Value::String(raw)) => split_tags(raw),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        doc.insert(TAGS.to_string(), string_array(tags));
    }

    if (!partial || doc.contains_key(LINK)) && link_is_blank(doc) {
        doc.insert(LINK.to_string(), Value::String(DEFAULT_LINK.to_string()));
    }
}

/// Validate a project submission against its form, then normalise it for storage.
///
/// Tags already given as a list skip the text check and are cleaned by
/// normalisation instead.
pub fn check_submission(doc: &Document, partial: bool) -> Result<Document, ValidationErrors> {
    let mut view = doc.clone();
    let list_tags = match view.get(TAGS) {
        Some(Value::Array(_)) => view.remove(TAGS),
        _ => None,
    };

    let mut checked = match schema_for(PROJECTS) {
        Some(schema) if partial => schema.validate_partial(&view)?,
        Some(schema) => schema.validate(&view)?,
        None => view,
    };
    if let Some(tags) = list_tags {
        checked.insert(TAGS.to_string(), tags);
    }

    normalize_for_write(&mut checked, partial);
    Ok(checked)
}

/// Normalise a stored project for public display
pub fn normalize_for_read(mut doc: Document) -> Document {
    let tags = match doc.remove(TAGS) {
        Some(Value::Array(items)) => Value::Array(items),
        Some(Value::String(tag)) if !tag.is_empty() => Value::Array(vec![Value::String(tag)]),
        _ => Value::Array(Vec::new()),
    };
    doc.insert(TAGS.to_string(), tags);

    if link_is_blank(&doc) {
        doc.insert(LINK.to_string(), Value::String(DEFAULT_LINK.to_string()));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_comma_separated_tags_are_split() {
        let mut project = doc(json!({
            "title": "X", "description": "Y", "iconName": "Home",
            "tags": "a, b, c", "link": "https://x.test"
        }));
        normalize_for_write(&mut project, false);
        assert_eq!(project["tags"], json!(["a", "b", "c"]));
        assert_eq!(project["link"], "https://x.test");
    }

    #[test]
    fn test_empty_pieces_are_dropped() {
        assert_eq!(split_tags(" a,, ,b ,"), vec!["a", "b"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_write_defaults_missing_fields() {
        let mut project = doc(json!({"title": "X", "link": "  "}));
        normalize_for_write(&mut project, false);
        assert_eq!(project["tags"], json!([]));
        assert_eq!(project["link"], DEFAULT_LINK);
    }

    #[test]
    fn test_partial_write_leaves_absent_fields_alone() {
        let mut project = doc(json!({"title": "renamed"}));
        normalize_for_write(&mut project, true);
        assert!(!project.contains_key("tags"));
        assert!(!project.contains_key("link"));

        let mut project = doc(json!({"tags": ["x", "", 3, " y "]}));
        normalize_for_write(&mut project, true);
        assert_eq!(project["tags"], json!(["x", "y"]));
    }

    #[test]
    fn test_submission_is_validated_then_normalized() {
        let checked = check_submission(
            &doc(json!({
                "title": "X", "description": "Y", "iconName": "Home",
                "tags": "a, b, c", "link": "https://x.test"
            })),
            false,
        )
        .unwrap();
        assert_eq!(checked["tags"], json!(["a", "b", "c"]));

        let checked = check_submission(&doc(json!({"tags": ["a", " "]})), true).unwrap();
        assert_eq!(checked["tags"], json!(["a"]));

        let errors = check_submission(&doc(json!({"title": "X"})), false).unwrap_err();
        assert_eq!(errors.message_for("iconName"), Some("Icon is required"));
    }

    #[test]
    fn test_legacy_rows_are_normalized_for_read() {
        let legacy = normalize_for_read(doc(json!({"id": "1", "tags": "solo"})));
        assert_eq!(legacy["tags"], json!(["solo"]));
        assert_eq!(legacy["link"], DEFAULT_LINK);

        let bare = normalize_for_read(doc(json!({"id": "2", "tags": 5, "link": null})));
        assert_eq!(bare["tags"], json!([]));
        assert_eq!(bare["link"], DEFAULT_LINK);

        let fine = normalize_for_read(doc(json!({"id": "3", "tags": ["a"], "link": "/p"})));
        assert_eq!(fine["tags"], json!(["a"]));
        assert_eq!(fine["link"], "/p");
    }
}
