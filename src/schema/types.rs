//! Schema type definitions
//!
//! Supported property types:
//! - integer: whole number, zero decimal places
//! - number: decimal number, two decimal places
//! - string: text, optionally bounded or enumerated
//! - boolean: true/false, optionally nullable
//! - object: opaque mapping, not validated
//! - array: opaque sequence, not validated
//! - datetime: opaque timestamp, not validated

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::{FormError, FormResult};

/// Property types understood by the rule, default and augment tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PropertyType {
    Integer,
    Number,
    String,
    Boolean,
    Object,
    Array,
    Datetime,
}

impl PropertyType {
    /// Returns the type name as written in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::String => "string",
            PropertyType::Boolean => "boolean",
            PropertyType::Object => "object",
            PropertyType::Array => "array",
            PropertyType::Datetime => "datetime",
        }
    }

    /// Numeric types carry size and range rules
    pub fn is_numeric(&self) -> bool {
        matches!(self, PropertyType::Integer | PropertyType::Number)
    }
}

impl FromStr for PropertyType {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s {
            "integer" => Ok(PropertyType::Integer),
            "number" => Ok(PropertyType::Number),
            "string" => Ok(PropertyType::String),
            "boolean" => Ok(PropertyType::Boolean),
            "object" => Ok(PropertyType::Object),
            "array" => Ok(PropertyType::Array),
            "datetime" => Ok(PropertyType::Datetime),
            other => Err(FormError::UnknownPropertyType(other.to_string())),
        }
    }
}

impl TryFrom<String> for PropertyType {
    type Error = FormError;

    fn try_from(value: String) -> FormResult<Self> {
        value.parse()
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.type_name().to_string()
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// One property declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    /// Property data type
    #[serde(rename = "type")]
    pub kind: PropertyType,
    /// Marks the property required, in addition to `Schema::required`
    #[serde(default, deserialize_with = "lenient_flag")]
    pub required: Option<bool>,
    /// Allowed literals; the first one is the default
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<f64>,
    /// Size rule is installed unless this is explicitly `false`
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    pub max_length_validate: Option<bool>,
    #[serde(default, deserialize_with = "lenient_flag", skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySpec {
    /// Create a bare property of the given type
    pub fn new(kind: PropertyType) -> Self {
        Self {
            kind,
            required: None,
            enumeration: None,
            minimum: None,
            maximum: None,
            max_length: None,
            max_length_validate: None,
            nullable: None,
            description: None,
        }
    }

    /// Create a string property bounded by `max_length`
    pub fn bounded_string(max_length: usize) -> Self {
        Self::new(PropertyType::String).with_max_length(max_length)
    }

    /// Create a numeric property with range bounds
    pub fn ranged(kind: PropertyType, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Self {
            minimum,
            maximum,
            ..Self::new(kind)
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length as f64);
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enumeration = Some(values);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = Some(true);
        self
    }

    pub fn without_length_validation(mut self) -> Self {
        self.max_length_validate = Some(false);
        self
    }

    /// Returns true when the property accepts null
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
    }

    /// Returns the declared enumeration when it has at least one literal
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enumeration.as_deref().filter(|values| !values.is_empty())
    }

    /// Returns `maxLength` as a character count when it is a finite number
    pub fn max_length_limit(&self) -> Option<i64> {
        self.max_length
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64)
    }

    /// Size validation defaults to enabled
    pub fn validates_max_length(&self) -> bool {
        self.max_length_validate != Some(false)
    }
}

/// Shared character budget across a group of string properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateLengthSpec {
    /// Property that displays the combined remaining count
    pub present_property: String,
    /// Participating properties, including `present_property`
    pub properties: Vec<String>,
    /// Combined character limit
    pub max_length: i64,
}

impl AggregateLengthSpec {
    /// Participants other than the present property, in declaration order
    pub fn others(&self) -> impl Iterator<Item = &String> {
        self.properties
            .iter()
            .filter(move |p| **p != self.present_property)
    }
}

/// Complete form schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Schema name, used to look up property display names
    #[serde(default, alias = "title")]
    pub name: String,
    /// Property declarations
    #[serde(default)]
    pub properties: HashMap<String, PropertySpec>,
    /// Names of required properties
    #[serde(default)]
    pub required: Vec<String>,
    /// Shared character budgets
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregate_length: Vec<AggregateLengthSpec>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, properties: HashMap<String, PropertySpec>) -> Self {
        Self {
            name: name.into(),
            properties,
            required: Vec::new(),
            aggregate_length: Vec::new(),
        }
    }

    pub fn with_required(mut self, names: &[&str]) -> Self {
        self.required = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_aggregate(mut self, aggregate: AggregateLengthSpec) -> Self {
        self.aggregate_length.push(aggregate);
        self
    }

    /// Parse a schema from a JSON value
    pub fn from_value(value: Value) -> FormResult<Self> {
        let schema: Schema = serde_json::from_value(value)
            .map_err(|e| FormError::malformed_schema("<in-memory>", e.to_string()))?;
        schema.validate_structure()?;
        Ok(schema)
    }

    /// Looks up a property declaration
    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name)
    }

    /// A property is required if it says so or the schema lists it
    pub fn is_required(&self, name: &str) -> bool {
        let declared = self
            .properties
            .get(name)
            .and_then(|p| p.required)
            .unwrap_or(false);
        declared || self.required.iter().any(|r| r == name)
    }

    /// Requested names that the schema declares, in request order, deduplicated
    pub fn known_names<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        names
            .iter()
            .copied()
            .filter(|name| self.properties.contains_key(*name) && seen.insert(*name))
            .collect()
    }

    /// Validates the schema structure itself (not a form value)
    pub fn validate_structure(&self) -> FormResult<()> {
        for aggregate in &self.aggregate_length {
            let present = &aggregate.present_property;

            if !aggregate.properties.contains(present) {
                return Err(FormError::invalid_aggregate(
                    &self.name,
                    present,
                    "presentProperty must be listed in properties",
                ));
            }

            if let Some(missing) = aggregate
                .properties
                .iter()
                .find(|p| !self.properties.contains_key(*p))
            {
                return Err(FormError::invalid_aggregate(
                    &self.name,
                    present,
                    format!("property '{}' is not declared", missing),
                ));
            }
        }

        Ok(())
    }
}

/// Accepts a boolean; `null` counts as absent and any other value as `true`
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(b),
        Some(_) => Some(true),
    })
}

/// Accepts a finite number or numeric text; anything else counts as absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    })
}
