//! Documents under comparison.

use std::fmt;

use serde_json::Value;

use crate::error::{CompareError, Side};

/// Declared content type of a comparison, used to pick a comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Both sides are JSON documents.
    Json,
    /// Both sides are opaque text.
    #[default]
    Text,
}

/// An expected or actual value: opaque text or a JSON tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Text compared as a single leaf.
    Text(String),
    /// A parsed JSON tree.
    Json(Value),
}

impl Document {
    /// Parse `text` as JSON for the given side.
    ///
    /// # Errors
    /// Returns [`CompareError::MalformedDocument`] when `text` is not valid
    /// JSON. The text is never reinterpreted as a plain string.
    pub fn parse_json(text: &str, side: Side) -> Result<Self, CompareError> {
        serde_json::from_str(text)
            .map(Self::Json)
            .map_err(|source| CompareError::MalformedDocument { side, source })
    }

    /// View the document as a JSON tree; text becomes a string leaf.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Text(text) => Value::String(text),
            Self::Json(value) => value,
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

/// Textual form of a scalar leaf, as matched against templates.
///
/// Strings render without quotes; numbers and booleans use their JSON
/// spelling. Containers and `null` have no textual form.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Short type label used in type mismatch reports.
pub(crate) fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
