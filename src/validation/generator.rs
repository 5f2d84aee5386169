//! Rule and default-value derivation per property type

use serde_json::{Map, Value};

use super::rules::Rule;
use crate::schema::{PropertySpec, PropertyType};

/// Derives the type rules for a property.
///
/// Required and custom rules are added by the field builder, not here.
pub fn rules_for(spec: &PropertySpec) -> Vec<Rule> {
    match spec.kind {
        PropertyType::Integer => number_rules(spec, 0),
        PropertyType::Number => number_rules(spec, 2),
        PropertyType::String => {
            if let Some(values) = &spec.enumeration {
                vec![Rule::enumeration(values.clone(), spec.is_nullable())]
            } else {
                match spec.max_length_limit() {
                    Some(max) if spec.validates_max_length() => {
                        vec![Rule::string_size(max.max(0) as usize)]
                    }
                    _ => Vec::new(),
                }
            }
        }
        PropertyType::Boolean => vec![Rule::enumeration(
            vec![Value::Bool(true), Value::Bool(false)],
            spec.is_nullable(),
        )],
        PropertyType::Object | PropertyType::Array | PropertyType::Datetime => Vec::new(),
    }
}

fn number_rules(spec: &PropertySpec, decimal_digits: u32) -> Vec<Rule> {
    let mut rules = vec![Rule::number_size(None, decimal_digits)];

    if spec.minimum.is_some() || spec.maximum.is_some() {
        rules.push(Rule::number_range(spec.minimum, spec.maximum));
    }

    rules
}

/// Derives the value a field starts with when the source model has none.
///
/// `Value::Null` means "no value".
pub fn default_for(spec: &PropertySpec) -> Value {
    match spec.kind {
        PropertyType::Integer => spec
            .enum_values()
            .and_then(|values| values.first().cloned())
            .unwrap_or_else(|| Value::from(0)),
        PropertyType::Number | PropertyType::Datetime => Value::Null,
        PropertyType::String => spec
            .enum_values()
            .and_then(|values| values.first().cloned())
            .unwrap_or_else(|| Value::String(String::new())),
        PropertyType::Boolean => Value::Bool(false),
        PropertyType::Object => Value::Object(Map::new()),
        PropertyType::Array => Value::Array(Vec::new()),
    }
}
