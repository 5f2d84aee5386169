//! Per-type auxiliary state installed on freshly built fields
//!
//! - string: `max_length` mirror and `char_rem` countdown text
//! - boolean: two-way `text` view ("true" / "false" / "null")
//! - everything else: nothing

use std::rc::Rc;

use serde_json::Value;

use super::field::Field;
use crate::i18n::{keys, Localizer};
use crate::reactive::Computed;
use crate::schema::PropertyType;

/// Installs the auxiliary state for `field`'s property type
pub fn augment(field: &Field, localizer: &Rc<dyn Localizer>) {
    match field.kind() {
        PropertyType::String => augment_string(field, localizer),
        PropertyType::Boolean => augment_boolean(field),
        PropertyType::Integer
        | PropertyType::Number
        | PropertyType::Object
        | PropertyType::Array
        | PropertyType::Datetime => {}
    }
}

fn augment_string(field: &Field, localizer: &Rc<dyn Localizer>) {
    let limit = field.spec().max_length_limit();
    field.install_max_length(Computed::constant(limit));

    let cell = field.cell().clone();
    let localizer = Rc::clone(localizer);
    let char_rem = Computed::new(move || match limit {
        Some(max) => remaining_text(localizer.as_ref(), max - cell.size() as i64),
        None => String::new(),
    })
    .track(field.cell());

    field.install_char_rem(char_rem);
}

/// Renders a remaining (or exceeded) character count
pub(crate) fn remaining_text(localizer: &dyn Localizer, remaining: i64) -> String {
    if remaining >= 0 {
        localizer.get(keys::REMAINING_CHARACTERS, &[("count", remaining.to_string())])
    } else {
        localizer.get(keys::EXCEEDED_CHARACTERS, &[("count", (-remaining).to_string())])
    }
}

fn augment_boolean(field: &Field) {
    let cell = field.cell().clone();
    let nullable = field.spec().is_nullable();
    let text = Computed::new(move || bool_text(&cell.get(), nullable)).track(field.cell());
    field.install_text(text);
}

fn bool_text(value: &Value, nullable: bool) -> String {
    match value {
        Value::Null if nullable => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CatalogLocalizer, KeyLocalizer};
    use crate::schema::PropertySpec;
    use serde_json::json;
    use std::collections::HashMap;

    fn catalog() -> Rc<dyn Localizer> {
        let mut messages = HashMap::new();
        messages.insert(keys::REMAINING_CHARACTERS.to_string(), "{count} left".to_string());
        messages.insert(keys::EXCEEDED_CHARACTERS.to_string(), "{count} over".to_string());
        Rc::new(CatalogLocalizer::new(messages))
    }

    fn build(spec: PropertySpec, initial: Value, localizer: &Rc<dyn Localizer>) -> Field {
        let field = Field::new("f", spec, initial, Vec::new(), Rc::clone(localizer));
        augment(&field, localizer);
        field
    }

    #[test]
    fn test_string_countdown() {
        let localizer = catalog();
        let field = build(PropertySpec::bounded_string(5), json!(""), &localizer);

        assert_eq!(field.max_length(), Some(5));
        assert_eq!(field.char_rem().unwrap(), "5 left");

        field.set("abc");
        assert_eq!(field.char_rem().unwrap(), "2 left");

        // no size rule installed here, so over-length text is kept
        field.set("abcdefg");
        assert_eq!(field.char_rem().unwrap(), "2 over");
    }

    #[test]
    fn test_unbounded_string_has_empty_countdown() {
        let localizer: Rc<dyn Localizer> = Rc::new(KeyLocalizer);
        let field = build(PropertySpec::new(PropertyType::String), json!("x"), &localizer);
        assert_eq!(field.max_length(), None);
        assert_eq!(field.char_rem().unwrap(), "");
    }

    #[test]
    fn test_boolean_text_view() {
        let localizer: Rc<dyn Localizer> = Rc::new(KeyLocalizer);
        let field = build(PropertySpec::new(PropertyType::Boolean), json!(false), &localizer);

        assert_eq!(field.text().unwrap(), "false");
        assert!(field.set_text("true"));
        assert_eq!(field.get(), json!(true));
        assert_eq!(field.text().unwrap(), "true");

        // not nullable: "null" is just "not true"
        field.set_text("null");
        assert_eq!(field.get(), json!(false));
    }

    #[test]
    fn test_nullable_boolean_text_view() {
        let localizer: Rc<dyn Localizer> = Rc::new(KeyLocalizer);
        let field = build(
            PropertySpec::new(PropertyType::Boolean).nullable(),
            json!(true),
            &localizer,
        );

        field.set_text("null");
        assert_eq!(field.get(), Value::Null);
        assert_eq!(field.text().unwrap(), "null");
    }

    #[test]
    fn test_other_types_not_augmented() {
        let localizer: Rc<dyn Localizer> = Rc::new(KeyLocalizer);
        let field = build(PropertySpec::new(PropertyType::Integer), json!(0), &localizer);
        assert_eq!(field.char_rem(), None);
        assert_eq!(field.text(), None);
        assert!(!field.set_text("true"));
    }
}
