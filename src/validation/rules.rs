//! Validation rules
//!
//! Each rule does two jobs:
//! - `admit` filters a write before it is stored. Size rules discard
//!   values that do not fit and leave the field empty.
//! - `check` reports a failure message for the stored value.

use std::fmt;
use std::rc::Rc;

use serde_json::{Number, Value};

use crate::i18n::{keys, Localizer};

/// Predicate for caller-supplied validation
pub type Predicate = Rc<dyn Fn(&Value) -> bool>;

/// A caller-supplied rule with a fixed, already-localized message
#[derive(Clone)]
pub struct CustomValidator {
    pub predicate: Predicate,
    pub message: String,
}

impl CustomValidator {
    pub fn new(predicate: impl Fn(&Value) -> bool + 'static, message: impl Into<String>) -> Self {
        Self {
            predicate: Rc::new(predicate),
            message: message.into(),
        }
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A single validation rule
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be null, blank text, or an empty collection
    Required,
    /// Numeric value must fit the digit budget
    NumberSize {
        integer_digits: Option<u32>,
        decimal_digits: u32,
    },
    /// Numeric value must lie within the bounds
    NumberRange {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    /// Text must not exceed `max_length` characters
    StringSize { max_length: usize },
    /// Value must be one of `allowed`, or null when nullable
    Enumeration { allowed: Vec<Value>, nullable: bool },
    /// Caller predicate
    Custom(CustomValidator),
}

impl Rule {
    pub fn required() -> Self {
        Rule::Required
    }

    pub fn number_size(integer_digits: Option<u32>, decimal_digits: u32) -> Self {
        Rule::NumberSize {
            integer_digits,
            decimal_digits,
        }
    }

    pub fn number_range(minimum: Option<f64>, maximum: Option<f64>) -> Self {
        Rule::NumberRange { minimum, maximum }
    }

    pub fn string_size(max_length: usize) -> Self {
        Rule::StringSize { max_length }
    }

    pub fn enumeration(allowed: Vec<Value>, nullable: bool) -> Self {
        Rule::Enumeration { allowed, nullable }
    }

    pub fn custom(validator: CustomValidator) -> Self {
        Rule::Custom(validator)
    }

    /// Short rule name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::NumberSize { .. } => "number.size",
            Rule::NumberRange { .. } => "number.range",
            Rule::StringSize { .. } => "string.size",
            Rule::Enumeration { .. } => "enum",
            Rule::Custom(_) => "custom",
        }
    }

    /// Filters a write. Returns the value to store.
    pub fn admit(&self, value: Value) -> Value {
        match self {
            Rule::NumberSize {
                integer_digits,
                decimal_digits,
            } => match coerce_number(value) {
                Some(n) if fits_digits(&n, *integer_digits, *decimal_digits) => {
                    Value::Number(whole_as_integer(n))
                }
                _ => Value::Null,
            },
            Rule::StringSize { max_length } => match value {
                Value::String(s) if s.chars().count() > *max_length => Value::String(String::new()),
                other => other,
            },
            _ => value,
        }
    }

    /// Checks the stored value. Returns the failure message, if any.
    pub fn check(&self, value: &Value, localizer: &dyn Localizer) -> Option<String> {
        match self {
            Rule::Required => is_blank(value).then(|| localizer.get(keys::REQUIRED_FIELD, &[])),
            Rule::NumberSize {
                integer_digits,
                decimal_digits,
            } => {
                let fits = match value {
                    Value::Null => true,
                    Value::Number(n) => fits_digits(n, *integer_digits, *decimal_digits),
                    _ => false,
                };
                (!fits).then(|| {
                    localizer.get(
                        keys::NUMBER_SIZE_DIGITS,
                        &[("decimals", decimal_digits.to_string())],
                    )
                })
            }
            Rule::NumberRange { minimum, maximum } => {
                let n = value.as_f64()?;
                let below = minimum.map_or(false, |min| n < min);
                let above = maximum.map_or(false, |max| n > max);
                if !below && !above {
                    return None;
                }
                Some(range_message(*minimum, *maximum, localizer))
            }
            Rule::StringSize { max_length } => {
                let len = value.as_str()?.chars().count();
                (len > *max_length).then(|| {
                    localizer.get(keys::STRING_SIZE_MAX, &[("max", max_length.to_string())])
                })
            }
            Rule::Enumeration { allowed, nullable } => {
                let ok = (value.is_null() && *nullable) || allowed.contains(value);
                (!ok).then(|| localizer.get(keys::ENUM_INVALID, &[]))
            }
            Rule::Custom(validator) => {
                (!(validator.predicate)(value)).then(|| validator.message.clone())
            }
        }
    }
}

fn range_message(minimum: Option<f64>, maximum: Option<f64>, localizer: &dyn Localizer) -> String {
    match (minimum, maximum) {
        (Some(min), Some(max)) => localizer.get(
            keys::NUMBER_RANGE_BETWEEN,
            &[("min", min.to_string()), ("max", max.to_string())],
        ),
        (Some(min), None) => localizer.get(keys::NUMBER_RANGE_MIN, &[("min", min.to_string())]),
        (None, Some(max)) => localizer.get(keys::NUMBER_RANGE_MAX, &[("max", max.to_string())]),
        (None, None) => localizer.get(keys::NUMBER_RANGE_BETWEEN, &[]),
    }
}

/// Null, blank text and empty collections count as missing
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Accepts numbers as-is and parses numeric text. Blank text is no value.
fn coerce_number(value: Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Number::from(i));
            }
            s.parse::<f64>().ok().and_then(Number::from_f64)
        }
        _ => None,
    }
}

/// Stores whole-valued floats as integers so `1.0` equals a source `1`
fn whole_as_integer(n: Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Number::from(f as i64)
        }
        _ => n,
    }
}

/// Counts integer and decimal digits of `n` as written in shortest form
fn digit_counts(n: &Number) -> (u32, u32) {
    let text = if n.is_f64() {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    } else {
        n.to_string()
    };
    let text = text.trim_start_matches('-');
    match text.split_once('.') {
        Some((int, frac)) => (int.len() as u32, frac.len() as u32),
        None => (text.len() as u32, 0),
    }
}

fn fits_digits(n: &Number, integer_digits: Option<u32>, decimal_digits: u32) -> bool {
    let (int, frac) = digit_counts(n);
    frac <= decimal_digits && integer_digits.map_or(true, |max| int <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::KeyLocalizer;
    use serde_json::json;

    #[test]
    fn test_required() {
        let rule = Rule::required();
        assert_eq!(
            rule.check(&json!(""), &KeyLocalizer),
            Some("[VALIDATION_NOTEMPTY_REQUIRED_FIELD]".to_string())
        );
        assert!(rule.check(&json!("  "), &KeyLocalizer).is_some());
        assert!(rule.check(&Value::Null, &KeyLocalizer).is_some());
        assert!(rule.check(&json!([]), &KeyLocalizer).is_some());
        assert!(rule.check(&json!(0), &KeyLocalizer).is_none());
        assert!(rule.check(&json!(false), &KeyLocalizer).is_none());
        assert!(rule.check(&json!("cat"), &KeyLocalizer).is_none());
    }

    #[test]
    fn test_integer_size_rejects_decimals() {
        let rule = Rule::number_size(None, 0);
        assert_eq!(rule.admit(json!(15.03)), Value::Null);
        assert_eq!(rule.admit(json!(15)), json!(15));
        assert_eq!(rule.admit(json!("42")), json!(42));
        assert_eq!(rule.admit(json!("")), Value::Null);
        assert_eq!(rule.admit(json!("abc")), Value::Null);
        assert!(rule.check(&json!(1.5), &KeyLocalizer).is_some());
    }

    #[test]
    fn test_decimal_size_keeps_two_places() {
        let rule = Rule::number_size(None, 2);
        assert_eq!(rule.admit(json!(15.03)), json!(15.03));
        assert_eq!(rule.admit(json!(15.031)), Value::Null);
        assert_eq!(rule.admit(json!("2.5")), json!(2.5));
        assert!(rule.check(&json!(15.03), &KeyLocalizer).is_none());
    }

    #[test]
    fn test_whole_floats_stored_as_integers() {
        let rule = Rule::number_size(None, 0);
        assert_eq!(rule.admit(json!(1.0)), json!(1));
        assert!(rule.admit(json!(1.0)).is_i64());
        assert_eq!(rule.admit(json!("1e3")), json!(1000));
        assert_eq!(Rule::number_size(None, 2).admit(json!(15.03)), json!(15.03));
    }

    #[test]
    fn test_integer_digit_budget() {
        let rule = Rule::number_size(Some(3), 0);
        assert_eq!(rule.admit(json!(-999)), json!(-999));
        assert_eq!(rule.admit(json!(1000)), Value::Null);
    }

    #[test]
    fn test_range() {
        let rule = Rule::number_range(Some(0.0), Some(50.0));
        assert_eq!(
            rule.check(&json!(-1), &KeyLocalizer),
            Some("[VALIDATION_NUMBER_RANGE_BETWEEN]".to_string())
        );
        assert!(rule.check(&json!(60), &KeyLocalizer).is_some());
        assert!(rule.check(&json!(50), &KeyLocalizer).is_none());
        assert!(rule.check(&Value::Null, &KeyLocalizer).is_none());

        let only_min = Rule::number_range(Some(1.0), None);
        assert_eq!(
            only_min.check(&json!(0), &KeyLocalizer),
            Some("[VALIDATION_NUMBER_RANGE_MIN]".to_string())
        );
    }

    #[test]
    fn test_string_size() {
        let rule = Rule::string_size(5);
        assert_eq!(rule.admit(json!("12345-cat")), json!(""));
        assert_eq!(rule.admit(json!("12345")), json!("12345"));
        assert_eq!(rule.admit(json!("ñandú")), json!("ñandú"));
        assert!(rule.check(&json!("123456"), &KeyLocalizer).is_some());
        assert!(rule.check(&json!(123456), &KeyLocalizer).is_none());
    }

    #[test]
    fn test_enumeration() {
        let rule = Rule::enumeration(vec![json!(true), json!(false)], false);
        assert!(rule.check(&json!(true), &KeyLocalizer).is_none());
        assert!(rule.check(&Value::Null, &KeyLocalizer).is_some());

        let nullable = Rule::enumeration(vec![json!(true), json!(false)], true);
        assert!(nullable.check(&Value::Null, &KeyLocalizer).is_none());
        assert_eq!(
            nullable.check(&json!("maybe"), &KeyLocalizer),
            Some("[VALIDATION_ENUM_INVALID]".to_string())
        );
    }

    #[test]
    fn test_custom_uses_literal_message() {
        let rule = Rule::custom(CustomValidator::new(
            |v| v.as_f64().map_or(false, |n| n > 18.0),
            "minors are not allowed!",
        ));
        assert_eq!(
            rule.check(&json!(12), &KeyLocalizer),
            Some("minors are not allowed!".to_string())
        );
        assert!(rule.check(&json!(30), &KeyLocalizer).is_none());
        assert_eq!(rule.name(), "custom");
    }
}
