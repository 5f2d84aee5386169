//! Message lookup

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::schema::{FormError, FormResult};

/// Named message parameters, e.g. `[("count", "3".into())]`
pub type MessageParams<'a> = &'a [(&'a str, String)];

/// Localization service: turns a message key and parameters into display text
pub trait Localizer {
    fn get(&self, key: &str, params: MessageParams<'_>) -> String;
}

/// Renders every key as `[UPPER_CASE_KEY]`, ignoring parameters.
///
/// Used when no catalog is configured; keeps messages stable and
/// recognizable in tests and logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn get(&self, key: &str, _params: MessageParams<'_>) -> String {
        format!("[{}]", key.to_uppercase())
    }
}

/// Message catalog with `{param}` interpolation.
///
/// Keys missing from the catalog fall back to [`KeyLocalizer`].
#[derive(Debug, Clone, Default)]
pub struct CatalogLocalizer {
    messages: HashMap<String, String>,
}

impl CatalogLocalizer {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Load a flat `{ "key": "template" }` JSON file
    pub fn load(path: &Path) -> FormResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| FormError::MalformedMessages {
            path: path.display().to_string(),
            reason: format!("Failed to read file: {}", e),
        })?;

        let messages: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|e| FormError::MalformedMessages {
                path: path.display().to_string(),
                reason: format!("Invalid JSON: {}", e),
            })?;

        Ok(Self::new(messages))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localizer for CatalogLocalizer {
    fn get(&self, key: &str, params: MessageParams<'_>) -> String {
        match self.messages.get(key) {
            Some(template) => interpolate(template, params),
            None => KeyLocalizer.get(key, params),
        }
    }
}

/// Replaces each `{name}` with its parameter value; unknown names are kept.
fn interpolate(template: &str, params: MessageParams<'_>) -> String {
    params.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}
