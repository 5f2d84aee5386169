//! Schema loader for reading form schemas from disk
//!
//! - One JSON file per schema
//! - Schemas are registered by name
//! - Malformed files and unknown property types fail the load

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{FormError, FormResult};
use super::types::Schema;
use crate::observability::{Event, Logger};

/// Reads a single schema file.
pub fn load_schema_file(path: &Path) -> FormResult<Schema> {
    let content = fs::read_to_string(path).map_err(|e| {
        FormError::malformed_schema(
            path.display().to_string(),
            format!("Failed to read file: {}", e),
        )
    })?;

    let schema: Schema = serde_json::from_str(&content).map_err(|e| {
        FormError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
    })?;

    schema.validate_structure()?;

    Ok(schema)
}

/// Schema loader that reads schema files from a directory and keeps them by name.
pub struct SchemaLoader {
    /// Directory containing schema files
    schema_dir: PathBuf,
    /// Loaded schemas indexed by name
    schemas: HashMap<String, Schema>,
}

impl SchemaLoader {
    /// Creates a new schema loader for the given directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file in the schema directory.
    pub fn load_all(&mut self) -> FormResult<usize> {
        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            FormError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                FormError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is not stable across platforms
        paths.sort();

        for path in &paths {
            let mut schema = load_schema_file(path)?;
            if schema.name.is_empty() {
                schema.name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            self.register(schema)?;
        }

        let count = self.schemas.len().to_string();
        Logger::event(
            Event::SchemasLoaded,
            &[("count", &count), ("dir", &self.schema_dir.display().to_string())],
        );

        Ok(paths.len())
    }

    /// Registers a schema directly.
    pub fn register(&mut self, schema: Schema) -> FormResult<()> {
        schema.validate_structure()?;

        if self.schemas.contains_key(&schema.name) {
            return Err(FormError::DuplicateSchema(schema.name));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns all loaded schemas sorted by name.
    pub fn all_schemas(&self) -> Vec<&Schema> {
        let mut schemas: Vec<_> = self.schemas.values().collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, file: &str, value: serde_json::Value) {
        fs::write(dir.join(file), value.to_string()).unwrap();
    }

    #[test]
    fn test_load_all_registers_by_name() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "cat.json",
            json!({ "name": "cat", "properties": { "name": { "type": "string" } } }),
        );
        write(
            temp_dir.path(),
            "dog.json",
            json!({ "properties": { "age": { "type": "integer" } } }),
        );
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        assert_eq!(loader.load_all().unwrap(), 2);
        assert!(loader.get("cat").is_some());
        // nameless schemas take the file stem
        assert!(loader.get("dog").is_some());
        assert_eq!(loader.all_schemas().len(), 2);
    }

    #[test]
    fn test_malformed_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bad.json"), "{ not json").unwrap();

        let mut loader = SchemaLoader::new(temp_dir.path());
        let err = loader.load_all().unwrap_err();
        assert_eq!(err.code(), "FORM_MALFORMED_SCHEMA");
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_unknown_type_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        write(
            temp_dir.path(),
            "odd.json",
            json!({ "name": "odd", "properties": { "id": { "type": "uuid" } } }),
        );

        let err = load_schema_file(&temp_dir.path().join("odd.json")).unwrap_err();
        assert!(err.to_string().contains("uuid"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut loader = SchemaLoader::new(temp_dir.path());
        loader.register(Schema::new("cat", HashMap::new())).unwrap();

        let err = loader.register(Schema::new("cat", HashMap::new())).unwrap_err();
        assert_eq!(err, FormError::DuplicateSchema("cat".into()));
    }
}
