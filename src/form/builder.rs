//! Field construction
//!
//! Building is split in two steps:
//! - [`describe_fields`] resolves rules and starting values once per schema
//! - [`build_fields`] instantiates fresh reactive fields from the descriptors

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use super::augment::augment;
use super::context::FormContext;
use super::field::Field;
use crate::observability::{Event, Logger};
use crate::schema::{PropertySpec, Schema};
use crate::validation::{default_for, rules_for, CustomValidators, Rule};

/// Everything needed to instantiate one field
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub spec: PropertySpec,
    pub rules: Vec<Rule>,
    pub initial: Value,
}

/// Resolves descriptors for the requested names the schema declares.
///
/// Names outside the schema are dropped. The source model supplies starting
/// values; properties it lacks start at their type default.
pub fn describe_fields(
    schema: &Schema,
    names: &[&str],
    source: Option<&Value>,
    validators: &CustomValidators,
) -> Vec<FieldDescriptor> {
    schema
        .known_names(names)
        .into_iter()
        .filter_map(|name| {
            let spec = schema.property(name)?.clone();
            let mut rules = rules_for(&spec);

            let initial = source
                .and_then(|model| model.get(name))
                .cloned()
                .unwrap_or_else(|| default_for(&spec));

            if schema.is_required(name) {
                rules.push(Rule::required());
            }

            if let Some(custom) = validators.get(name) {
                rules.push(Rule::custom(custom.clone()));
            }

            Some(FieldDescriptor {
                name: name.to_string(),
                spec,
                rules,
                initial,
            })
        })
        .collect()
}

/// Instantiates and augments one field per descriptor
pub fn build_fields(ctx: &FormContext, descriptors: &[FieldDescriptor]) -> HashMap<String, Field> {
    descriptors
        .iter()
        .map(|descriptor| {
            let field = Field::new(
                descriptor.name.clone(),
                descriptor.spec.clone(),
                descriptor.initial.clone(),
                descriptor.rules.clone(),
                Rc::clone(&ctx.localizer),
            );
            augment(&field, &ctx.localizer);

            let rule_count = descriptor.rules.len().to_string();
            Logger::event(
                Event::FieldBound,
                &[
                    ("field", &descriptor.name),
                    ("rules", &rule_count),
                    ("type", descriptor.spec.kind.type_name()),
                ],
            );

            (descriptor.name.clone(), field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::CustomValidator;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::from_value(json!({
            "name": "cat",
            "properties": {
                "name": { "type": "string", "maxLength": 5 },
                "breed": { "type": "string", "required": true },
                "age": { "type": "integer", "minimum": 0, "maximum": 50 },
                "tags": { "type": "array" }
            },
            "required": ["name"]
        }))
        .unwrap()
    }

    fn rule_names(descriptor: &FieldDescriptor) -> Vec<&'static str> {
        descriptor.rules.iter().map(Rule::name).collect()
    }

    #[test]
    fn test_unknown_names_dropped() {
        let descriptors = describe_fields(&schema(), &["name", "color"], None, &HashMap::new());
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "name");
    }

    #[test]
    fn test_required_rule_appended_last_before_custom() {
        let mut validators = HashMap::new();
        validators.insert(
            "name".to_string(),
            CustomValidator::new(|v| v != &json!("dog"), "no dogs"),
        );
        let descriptors = describe_fields(&schema(), &["name", "breed"], None, &validators);

        assert_eq!(rule_names(&descriptors[0]), vec!["string.size", "required", "custom"]);
        assert_eq!(rule_names(&descriptors[1]), vec!["required"]);
    }

    #[test]
    fn test_source_values_win_over_defaults() {
        let source = json!({ "age": 7, "name": null });
        let descriptors = describe_fields(&schema(), &["age", "name", "breed"], Some(&source), &HashMap::new());

        assert_eq!(descriptors[0].initial, json!(7));
        // explicit null in the source is a value
        assert_eq!(descriptors[1].initial, Value::Null);
        assert_eq!(descriptors[2].initial, json!(""));
    }

    #[test]
    fn test_build_fields() {
        let descriptors = describe_fields(&schema(), &["name", "tags"], None, &HashMap::new());
        let fields = build_fields(&FormContext::default(), &descriptors);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"].max_length(), Some(5));
        assert!(fields["tags"].push("indoor"));
        assert_eq!(fields["tags"].get(), json!(["indoor"]));
    }

    #[test]
    fn test_each_build_gets_fresh_state() {
        let descriptors = describe_fields(&schema(), &["name"], None, &HashMap::new());
        let first = build_fields(&FormContext::default(), &descriptors);
        let second = build_fields(&FormContext::default(), &descriptors);

        first["name"].set("cat");
        assert_eq!(second["name"].get(), json!(""));
    }
}
