//! Cross-cutting validation rules
//!
//! Entity validators are pure functions: they consume a candidate field set
//! and either hand back a typed value or a [`FieldErrors`] map from field
//! name to a human-readable message. Invalid input is a normal return value,
//! never a panic.
//!
//! Rules shared across domains live here:
//! - blank and missing strings are the same thing ("required")
//! - Indian mobile numbers: exactly 10 ASCII digits, leading digit 6-9
//! - email shape: `local@domain.tld`
//! - numbers may arrive as JSON numbers or numeric strings

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static INDIAN_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("static regex"));

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

// ============================================================================
// FieldErrors
// ============================================================================

/// Field name → error message mapping
///
/// Only the first message recorded for a field is kept, so the most basic
/// failure ("required") wins over format complaints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for `field` unless one is already present
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors, prefixing their field names
    pub fn merge_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (field, message) in other.0 {
            self.add(format!("{}.{}", prefix, field), message);
        }
    }

    /// `Ok(value)` when no error was recorded
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Numeric input
// ============================================================================

/// A number as submitted by a form: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Parse to a finite `f64`; blank strings and NaN/inf are rejected
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(n) => *n,
            NumberInput::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        NumberInput::Number(value)
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Trimmed, non-empty view of an optional string
#[inline]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Required, trimmed text. Records `message` and returns `None` when missing or blank.
pub fn require_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    message: &str,
) -> Option<String> {
    match non_blank(value) {
        Some(s) => Some(s.to_string()),
        None => {
            errors.add(field, message);
            None
        }
    }
}

/// Optional trimmed text; blank collapses to `None`
#[inline]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

/// Enum field: must match one of the declared codes exactly (case-sensitive).
///
/// Missing input yields `default` when one is given, otherwise a "required" error.
pub fn parse_code<E: Copy>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    default: Option<E>,
    from_code: impl Fn(&str) -> Option<E>,
    message: &str,
) -> Option<E> {
    // Codes match verbatim; only an all-whitespace value counts as absent
    match value.filter(|v| !v.trim().is_empty()) {
        None => {
            if default.is_none() {
                errors.add(field, message);
            }
            default
        }
        Some(code) => {
            let parsed = from_code(code);
            if parsed.is_none() {
                errors.add(field, message);
            }
            parsed
        }
    }
}

/// Indian mobile number: 10 digits, first digit 6, 7, 8 or 9
#[inline]
pub fn is_indian_mobile(value: &str) -> bool {
    INDIAN_MOBILE.is_match(value.trim())
}

/// `local@domain.tld` shape check
#[inline]
pub fn is_email_shape(value: &str) -> bool {
    EMAIL_SHAPE.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_mobile() {
        assert!(is_indian_mobile("9876543210"));
        assert!(is_indian_mobile("6000000000"));
        assert!(is_indian_mobile(" 7012345678 "));
        assert!(!is_indian_mobile("5123456789"));
        assert!(!is_indian_mobile("987654321"));
        assert!(!is_indian_mobile("98765432100"));
        assert!(!is_indian_mobile("98765x3210"));
        assert!(!is_indian_mobile("9८७६५४३२१०"));
        assert!(!is_indian_mobile("９８７６５４３２１０"));
        assert!(!is_indian_mobile(""));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shape("ravi@example.com"));
        assert!(is_email_shape("a.b+c@farm.co.in"));
        assert!(!is_email_shape("ravi@example"));
        assert!(!is_email_shape("ravi example@x.com"));
        assert!(!is_email_shape("@example.com"));
        assert!(!is_email_shape("ravi@@example.com"));
    }

    #[test]
    fn test_require_text_blank_equals_missing() {
        let mut errors = FieldErrors::new();
        assert!(require_text(&mut errors, "title", None, "Title is required").is_none());
        assert!(require_text(&mut errors, "location", Some("   "), "Location is required").is_none());
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("location"), Some("Location is required"));

        let mut errors = FieldErrors::new();
        let value = require_text(&mut errors, "title", Some("  Tomatoes "), "required");
        assert_eq!(value.as_deref(), Some("Tomatoes"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_first_error_wins() {
        let mut errors = FieldErrors::new();
        errors.add("price", "Price is required");
        errors.add("price", "Price must be greater than 0");
        assert_eq!(errors.get("price"), Some("Price is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_number_input() {
        assert_eq!(NumberInput::Number(12.5).parse(), Some(12.5));
        assert_eq!(NumberInput::Text(" 80 ".into()).parse(), Some(80.0));
        assert_eq!(NumberInput::Text("abc".into()).parse(), None);
        assert_eq!(NumberInput::Text("".into()).parse(), None);
        assert_eq!(NumberInput::Number(f64::NAN).parse(), None);

        let from_json: NumberInput = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_json.parse(), Some(42.0));
        let from_json: NumberInput = serde_json::from_str("42").unwrap();
        assert_eq!(from_json.parse(), Some(42.0));
    }

    #[test]
    fn test_parse_code_is_case_sensitive() {
        let from_code = |s: &str| match s {
            "seeds" => Some(1),
            "tools" => Some(2),
            _ => None,
        };

        let mut errors = FieldErrors::new();
        assert_eq!(parse_code(&mut errors, "category", Some("seeds"), None, from_code, "bad"), Some(1));
        assert!(errors.is_empty());

        assert_eq!(parse_code(&mut errors, "category", Some("Seeds"), None, from_code, "bad"), None);
        assert!(errors.contains("category"));

        let mut errors = FieldErrors::new();
        assert_eq!(parse_code(&mut errors, "category", None, Some(2), from_code, "bad"), Some(2));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_parse_code_does_not_trim() {
        let from_code = |s: &str| match s {
            "seeds" => Some(1),
            _ => None,
        };

        let mut errors = FieldErrors::new();
        assert_eq!(parse_code(&mut errors, "category", Some(" seeds "), None, from_code, "bad"), None);
        assert_eq!(errors.get("category"), Some("bad"));

        let mut errors = FieldErrors::new();
        assert_eq!(parse_code(&mut errors, "status", Some("   "), Some(7), from_code, "bad"), Some(7));
        assert!(errors.is_empty());

        assert_eq!(parse_code(&mut errors, "category", Some("  "), None, from_code, "required"), None);
        assert_eq!(errors.get("category"), Some("required"));
    }

    #[test]
    fn test_display_and_serialize() {
        let mut errors = FieldErrors::new();
        errors.add("b", "second");
        errors.add("a", "first");
        assert_eq!(errors.to_string(), "a: first; b: second");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "a": "first", "b": "second" }));
    }
}
