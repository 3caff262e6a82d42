//! Schema-driven form validation
//!
//! A form is a list of field descriptors. Validation walks the list, looks up
//! the rule for each field kind in a plain dispatch table and collects every
//! field error rather than stopping at the first. Fields not named by the
//! form pass through untouched.

mod rules;
pub mod schemas;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::content::Document;

pub use schemas::{form_names, schema_for};

/// Semantic type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text
    Text,
    /// Multi-line text
    Textarea,
    /// Number, numeric strings are coerced
    Number,
    /// Email address
    Email,
    /// Absolute URL
    Url,
    /// One value out of a fixed option list
    Select,
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Text shown to the user
    pub label: String,
    /// Stored value
    pub value: String,
}

/// Metadata describing one form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Document field name
    pub name: String,
    /// Human-readable label, used in messages
    pub label: String,
    /// Semantic type
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether a value must be present
    #[serde(default)]
    pub required: bool,
    /// Inclusive lower bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound for numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed values for select fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl FieldDescriptor {
    /// Optional field of the given kind
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            placeholder: None,
            description: None,
            required: false,
            min: None,
            max: None,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Options whose label and value are the same string
    pub fn options(mut self, values: &[&str]) -> Self {
        self.options = values
            .iter()
            .map(|value| SelectOption {
                label: value.to_string(),
                value: value.to_string(),
            })
            .collect();
        self
    }
}

/// A repeated sub-record stored as an array field of the parent document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubForm {
    /// Array field on the parent
    pub field: String,
    /// Schema every item must satisfy
    pub schema: FormSchema,
}

/// Declarative form: field descriptors plus optional sub-item forms
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormSchema {
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_forms: Vec<SubForm>,
}

/// One field-scoped validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Offending field, `parent[index].field` inside sub-items
    pub field: String,
    /// Message suitable for inline display
    pub message: String,
}

/// Every field error found in one submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }
}

/// Missing means absent, `null` or the empty string
fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl FormSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            sub_forms: Vec::new(),
        }
    }

    /// Attach a schema for the items of an array field
    pub fn with_sub_form(mut self, field: &str, schema: FormSchema) -> Self {
        self.sub_forms.push(SubForm {
            field: field.to_string(),
            schema,
        });
        self
    }

    /// Descriptor for a field name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a complete submission. On success returns the document with
    /// numeric fields coerced; everything else is passed through unchanged.
    pub fn validate(&self, doc: &Document) -> Result<Document, ValidationErrors> {
        self.check(doc, false)
    }

    /// Validate an update: required fields may be left out but not blanked
    pub fn validate_partial(&self, doc: &Document) -> Result<Document, ValidationErrors> {
        self.check(doc, true)
    }

    fn check(&self, doc: &Document, partial: bool) -> Result<Document, ValidationErrors> {
        let mut output = doc.clone();
        let mut errors = ValidationErrors::default();
        self.check_into(doc, partial, "", &mut output, &mut errors);

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    fn check_into(
        &self,
        doc: &Document,
        partial: bool,
        prefix: &str,
        output: &mut Document,
        errors: &mut ValidationErrors,
    ) {
        for field in &self.fields {
            let path = format!("{}{}", prefix, field.name);
            let value = doc.get(&field.name);

            if is_missing(value) {
                let left_out = value.is_none() && partial;
                if field.required && !left_out {
                    errors.push(path, format!("{} is required", field.label));
                }
                continue;
            }

            let Some(value) = value else { continue };
            match rules::apply(field, value) {
                Ok(Some(coerced)) => {
                    output.insert(field.name.clone(), coerced);
                }
                Ok(None) => {}
                Err(message) => errors.push(path, message),
            }
        }

        for sub_form in &self.sub_forms {
            let Some(value) = doc.get(&sub_form.field) else {
                continue;
            };
            let path = format!("{}{}", prefix, sub_form.field);
            let Value::Array(items) = value else {
                errors.push(path, format!("{} must be a list", sub_form.field));
                continue;
            };

            let mut checked_items = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_prefix = format!("{}[{}].", path, index);
                let Value::Object(item) = item else {
                    errors.push(format!("{}[{}]", path, index), "Item must be an object");
                    checked_items.push(Value::Null);
                    continue;
                };
                // Items are always whole records, even inside a partial update.
                let mut item_output = item.clone();
                sub_form
                    .schema
                    .check_into(item, false, &item_prefix, &mut item_output, errors);
                checked_items.push(Value::Object(item_output));
            }
            output.insert(sub_form.field.clone(), Value::Array(checked_items));
        }
    }
}
