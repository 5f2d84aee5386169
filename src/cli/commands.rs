//! CLI command implementations
//!
//! Commands build their report as JSON and `run_command` writes it.
//! Logging starts at WARN so stdout carries only the report; a config
//! file's `log_level` overrides that.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::config::FormConfig;
use crate::form::{extend_instance, FormContext, FormModel};
use crate::observability::{Logger, Severity};
use crate::schema::{load_schema_file, Schema, SchemaLoader};
use crate::validation::{default_for, rules_for, Rule};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    Logger::set_min_severity(Severity::Warn);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    let report = match cmd {
        Command::Describe { schema } => describe(&schema)?,
        Command::Check {
            schema,
            fields,
            model,
            response,
            config,
        } => check(&CheckRequest {
            schema,
            fields,
            model,
            response,
            config,
        })?,
    };
    write_response(report)
}

/// Describe one schema file, or every schema in a directory
pub fn describe(path: &Path) -> CliResult<Value> {
    let schemas: Vec<Schema> = if path.is_dir() {
        let mut loader = SchemaLoader::new(path);
        loader.load_all()?;
        loader.all_schemas().into_iter().cloned().collect()
    } else {
        vec![load_schema_file(path)?]
    };

    let described: Vec<Value> = schemas.iter().map(describe_schema).collect();
    Ok(json!({ "schemas": described }))
}

fn describe_schema(schema: &Schema) -> Value {
    let mut names: Vec<&String> = schema.properties.keys().collect();
    names.sort();

    let properties: Vec<Value> = names
        .into_iter()
        .filter_map(|name| {
            let spec = schema.property(name)?;
            let mut rules: Vec<&str> = rules_for(spec).iter().map(Rule::name).collect();
            if schema.is_required(name) {
                rules.push(Rule::required().name());
            }
            Some(json!({
                "name": name,
                "type": spec.kind.type_name(),
                "required": schema.is_required(name),
                "rules": rules,
                "default": default_for(spec),
            }))
        })
        .collect();

    json!({
        "name": schema.name,
        "properties": properties,
        "aggregates": schema.aggregate_length,
    })
}

/// Inputs of the `check` command
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    pub schema: PathBuf,
    pub fields: Vec<String>,
    pub model: Option<PathBuf>,
    pub response: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Bind a model, validate it, apply an optional server response, and report
pub fn check(request: &CheckRequest) -> CliResult<Value> {
    let ctx = match &request.config {
        Some(path) => {
            let config = FormConfig::load(path)?;
            config.apply_logging()?;
            FormContext::from_config(&config)?
        }
        None => FormContext::default(),
    };

    let schema = load_schema_file(&request.schema)?;
    let source = request.model.as_deref().map(read_json).transpose()?;
    if let Some(model) = &source {
        if !model.is_object() {
            return Err(CliError::io_error("model must be a JSON object"));
        }
    }

    let names: Vec<&str> = request
        .fields
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();

    let mut model = FormModel::new(ctx);
    extend_instance(&mut model, &schema, &names, source.as_ref(), &HashMap::new())?;

    let valid = model.validate();

    if let Some(path) = &request.response {
        model.errors().add_value(&read_json(path)?);
    }

    Ok(report(&model, valid))
}

fn report(model: &FormModel, valid: bool) -> Value {
    let errors: Map<String, Value> = model
        .fields()
        .iter()
        .filter(|field| !field.errors().is_empty())
        .map(|field| {
            let messages: Vec<String> = field.errors().iter().map(|e| e.message.clone()).collect();
            (field.name().to_string(), json!(messages))
        })
        .collect();

    json!({
        "valid": valid,
        "values": model.to_object(),
        "changed": model.has_change(),
        "errors": errors,
        "model_errors": model.errors().get(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, value: Value) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();
        path
    }

    fn cat_schema() -> Value {
        json!({
            "name": "cat",
            "properties": {
                "name": { "type": "string", "maxLength": 5 },
                "age": { "type": "integer", "minimum": 0, "maximum": 50 }
            },
            "required": ["name"]
        })
    }

    #[test]
    fn test_describe_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "cat.json", cat_schema());

        let report = describe(&path).unwrap();
        let properties = &report["schemas"][0]["properties"];

        assert_eq!(properties[0]["name"], "age");
        assert_eq!(properties[0]["rules"], json!(["number.size", "number.range"]));
        assert_eq!(properties[0]["default"], json!(0));
        assert_eq!(properties[1]["name"], "name");
        assert_eq!(properties[1]["required"], json!(true));
        assert_eq!(properties[1]["rules"], json!(["string.size", "required"]));
    }

    #[test]
    fn test_describe_directory() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir, "cat.json", cat_schema());
        write(&temp_dir, "dog.json", json!({ "name": "dog", "properties": {} }));

        let report = describe(temp_dir.path()).unwrap();
        assert_eq!(report["schemas"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_check_reports_errors_and_changes() {
        let temp_dir = TempDir::new().unwrap();
        let request = CheckRequest {
            schema: write(&temp_dir, "cat.json", cat_schema()),
            fields: vec!["name".into(), "age".into()],
            model: Some(write(&temp_dir, "model.json", json!({ "name": "", "age": 60 }))),
            response: Some(write(&temp_dir, "response.json", json!({}))),
            config: None,
        };

        let report = check(&request).unwrap();
        assert_eq!(report["valid"], json!(false));
        assert_eq!(report["values"], json!({ "name": "", "age": 60 }));
        assert_eq!(report["changed"], json!(false));
        assert_eq!(report["errors"]["name"], json!(["[VALIDATION_NOTEMPTY_REQUIRED_FIELD]"]));
        assert_eq!(report["model_errors"], json!(["[GENERICERRORMESSAGE]"]));
    }

    #[test]
    fn test_check_rejects_unknown_property_type() {
        let temp_dir = TempDir::new().unwrap();
        let request = CheckRequest {
            schema: write(
                &temp_dir,
                "bad.json",
                json!({ "name": "bad", "properties": { "id": { "type": "uuid" } } }),
            ),
            fields: vec!["id".into()],
            ..CheckRequest::default()
        };

        let err = check(&request).unwrap_err();
        assert_eq!(err.code_str(), "FORM_CLI_SCHEMA_ERROR");
    }
}
