//! Per-kind validation rules
//!
//! Each rule checks one present, non-empty value. `Ok(Some(v))` replaces the
//! submitted value (numeric coercion), `Ok(None)` keeps it as is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

use super::{FieldDescriptor, FieldKind};

type RuleResult = Result<Option<Value>, String>;
type Rule = fn(&FieldDescriptor, &Value) -> RuleResult;

/// Field kind to rule dispatch table
const RULES: &[(FieldKind, Rule)] = &[
    (FieldKind::Text, text),
    (FieldKind::Textarea, text),
    (FieldKind::Number, number),
    (FieldKind::Email, email),
    (FieldKind::Url, url),
    (FieldKind::Select, select),
];

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$").expect("valid url regex")
});

/// Run the rule for the field's kind
pub(super) fn apply(field: &FieldDescriptor, value: &Value) -> RuleResult {
    match RULES.iter().find(|(kind, _)| *kind == field.kind) {
        Some((_, rule)) => rule(field, value),
        None => Ok(None),
    }
}

fn as_text<'a>(field: &FieldDescriptor, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("{} must be text", field.label))
}

fn text(field: &FieldDescriptor, value: &Value) -> RuleResult {
    as_text(field, value)?;
    Ok(None)
}

fn email(field: &FieldDescriptor, value: &Value) -> RuleResult {
    let text = as_text(field, value)?;
    if EMAIL.is_match(text) {
        Ok(None)
    } else {
        Err("Invalid email address".to_string())
    }
}

fn url(field: &FieldDescriptor, value: &Value) -> RuleResult {
    let text = as_text(field, value)?;
    if URL.is_match(text) {
        Ok(None)
    } else {
        Err("Invalid URL".to_string())
    }
}

fn select(field: &FieldDescriptor, value: &Value) -> RuleResult {
    let text = as_text(field, value)?;
    if field.options.is_empty() || field.options.iter().any(|o| o.value == text) {
        return Ok(None);
    }
    let allowed: Vec<&str> = field.options.iter().map(|o| o.value.as_str()).collect();
    Err(format!("{} must be one of: {}", field.label, allowed.join(", ")))
}

fn number(field: &FieldDescriptor, value: &Value) -> RuleResult {
    let not_a_number = || format!("{} must be a number", field.label);

    let (parsed, coerced) = match value {
        Value::Number(n) => (n.as_f64().ok_or_else(not_a_number)?, None),
        Value::String(s) => {
            let parsed: f64 = s.trim().parse().map_err(|_| not_a_number())?;
            if !parsed.is_finite() {
                return Err(not_a_number());
            }
            (parsed, Some(to_json_number(parsed).ok_or_else(not_a_number)?))
        }
        _ => return Err(not_a_number()),
    };

    if let Some(min) = field.min {
        if parsed < min {
            return Err(format!("Minimum value is {}", min));
        }
    }
    if let Some(max) = field.max {
        if parsed > max {
            return Err(format!("Maximum value is {}", max));
        }
    }

    Ok(coerced)
}

/// Integral values become JSON integers, everything else a float
fn to_json_number(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor::new("f", "Field", kind)
    }

    #[test]
    fn test_every_kind_has_a_rule() {
        for kind in [
            FieldKind::Text,
            FieldKind::Textarea,
            FieldKind::Number,
            FieldKind::Email,
            FieldKind::Url,
            FieldKind::Select,
        ] {
            assert!(RULES.iter().any(|(k, _)| *k == kind), "{:?}", kind);
        }
    }

    #[test]
    fn test_urls() {
        let f = field(FieldKind::Url);
        assert!(apply(&f, &json!("https://example.com")).is_ok());
        assert!(apply(&f, &json!("http://localhost:3000/x?y=1")).is_ok());
        assert_eq!(apply(&f, &json!("example.com")), Err("Invalid URL".into()));
        assert_eq!(apply(&f, &json!("https://")), Err("Invalid URL".into()));
        assert_eq!(apply(&f, &json!("#")), Err("Invalid URL".into()));
    }

    #[test]
    fn test_text_rejects_non_strings() {
        let f = field(FieldKind::Textarea);
        assert_eq!(apply(&f, &json!("ok")), Ok(None));
        assert_eq!(apply(&f, &json!(["a"])), Err("Field must be text".into()));
    }

    #[test]
    fn test_select_membership() {
        let f = field(FieldKind::Select).options(&["Home", "Users"]);
        assert_eq!(apply(&f, &json!("Home")), Ok(None));
        assert_eq!(
            apply(&f, &json!("Truck")),
            Err("Field must be one of: Home, Users".into())
        );

        // Without declared options any string is accepted
        assert_eq!(apply(&field(FieldKind::Select), &json!("anything")), Ok(None));
    }

    #[test]
    fn test_number_strings_are_coerced() {
        let f = field(FieldKind::Number);
        assert_eq!(apply(&f, &json!(" 42 ")), Ok(Some(json!(42))));
        assert_eq!(apply(&f, &json!("1.5")), Ok(Some(json!(1.5))));
        assert_eq!(apply(&f, &json!(7)), Ok(None));
        assert!(apply(&f, &json!("NaN")).is_err());
        assert!(apply(&f, &json!(true)).is_err());
    }
}
