//! Server error payloads and their translation into display text

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::localizer::Localizer;

/// One structured error from a server response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorEntry {
    /// Machine-readable error code
    #[serde(rename = "Code", default)]
    pub code: String,
    /// Server-provided text, may be empty
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    /// Property the error belongs to; absent or empty means model-level
    #[serde(rename = "Property", default)]
    pub property: Option<String>,
}

impl ApiErrorEntry {
    pub fn new(code: impl Into<String>, property: Option<&str>) -> Self {
        Self {
            code: code.into(),
            message: None,
            property: property.map(str::to_string),
        }
    }

    /// Property name, with `None` for absent or empty
    pub fn target(&self) -> Option<&str> {
        self.property.as_deref().filter(|p| !p.is_empty())
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

impl ApiResponse {
    pub fn with_errors(errors: Vec<ApiErrorEntry>) -> Self {
        Self {
            errors: Some(errors),
        }
    }

    /// Lenient parse of a raw payload.
    ///
    /// Anything without an `errors` array has no errors. Inside the array,
    /// entries that are not objects are skipped, and scalar `Code` /
    /// `Property` / `Message` values are taken as text.
    pub fn from_value(value: &Value) -> Self {
        let errors = value
            .get("errors")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(ApiErrorEntry::from_value).collect());
        Self { errors }
    }
}

impl ApiErrorEntry {
    fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        Some(Self {
            code: entry.get("Code").and_then(scalar_text).unwrap_or_default(),
            message: entry.get("Message").and_then(scalar_text),
            property: entry.get("Property").and_then(scalar_text),
        })
    }
}

/// Text form of a scalar; null and containers have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Per-call override of how entries are rendered
pub trait ErrorAdapter {
    /// Returns replacement text for `entry`, or `None` to use the default
    fn adapt(&self, entry: &ApiErrorEntry) -> Option<String>;
}

impl<F> ErrorAdapter for F
where
    F: Fn(&ApiErrorEntry) -> Option<String>,
{
    fn adapt(&self, entry: &ApiErrorEntry) -> Option<String> {
        self(entry)
    }
}

/// Error translation service
pub trait ErrorTranslator {
    /// Renders entries as display strings, one per entry, in order
    fn translate(&self, entries: &[ApiErrorEntry], adapter: Option<&dyn ErrorAdapter>)
        -> Vec<String>;
}

/// Looks each entry up as `prefix + Code` in the localizer
pub struct CodeTranslator {
    localizer: Rc<dyn Localizer>,
    prefix: String,
}

impl CodeTranslator {
    pub fn new(localizer: Rc<dyn Localizer>, prefix: impl Into<String>) -> Self {
        Self {
            localizer,
            prefix: prefix.into(),
        }
    }
}

impl ErrorTranslator for CodeTranslator {
    fn translate(
        &self,
        entries: &[ApiErrorEntry],
        adapter: Option<&dyn ErrorAdapter>,
    ) -> Vec<String> {
        entries
            .iter()
            .map(|entry| {
                adapter.and_then(|a| a.adapt(entry)).unwrap_or_else(|| {
                    let key = format!("{}{}", self.prefix, entry.code);
                    let message = entry.message.clone().unwrap_or_default();
                    self.localizer.get(&key, &[("message", message)])
                })
            })
            .collect()
    }
}
