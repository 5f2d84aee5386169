//! Form models
//!
//! A model is a set of fields plus three derived operations (`to_object`,
//! `validate`, `has_change`) and an [`ErrorChannel`].
//!
//! Extension is split in two:
//!
//! - [`SchemaBinding`] resolves a schema and a name list into field
//!   descriptors once
//! - binding a [`SchemaBinding`] onto a [`FormModel`] instantiates fresh
//!   reactive fields from it
//!
//! [`extend_instance`] does both for one model. [`extend_prototype`] keeps
//! the binding on a [`ModelPrototype`] so every model it instantiates gets
//! its own fields built from the same descriptors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use super::aggregate::apply_aggregates;
use super::builder::{build_fields, describe_fields, FieldDescriptor};
use super::context::FormContext;
use super::error_channel::ErrorChannel;
use super::field::Field;
use crate::observability::{Event, Logger};
use crate::schema::{FormResult, Schema};
use crate::validation::CustomValidators;

/// Fields of a model in binding order
#[derive(Debug, Default)]
pub struct FieldSet {
    order: Vec<String>,
    fields: HashMap<String, Field>,
}

impl FieldSet {
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Field names in binding order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.order.iter().filter_map(|name| self.fields.get(name))
    }

    /// Adds or replaces a field. A replaced field keeps its position.
    fn insert(&mut self, field: Field) {
        let name = field.name().to_string();
        if !self.fields.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.fields.insert(name, field);
    }
}

/// A schema resolved against a name list, ready to bind onto models
#[derive(Debug, Clone)]
pub struct SchemaBinding {
    schema: Schema,
    descriptors: Vec<FieldDescriptor>,
    keys: Vec<String>,
    original: Map<String, Value>,
}

impl SchemaBinding {
    /// Resolves descriptors for `names`.
    ///
    /// Fails when the schema's aggregate groups are malformed. An empty
    /// schema or name list gives a binding with no fields.
    pub fn new(
        schema: &Schema,
        names: &[&str],
        source: Option<&Value>,
        validators: &CustomValidators,
    ) -> FormResult<Self> {
        schema.validate_structure()?;

        if schema.properties.is_empty() || names.is_empty() {
            return Ok(Self {
                schema: schema.clone(),
                descriptors: Vec::new(),
                keys: Vec::new(),
                original: Map::new(),
            });
        }

        let descriptors = describe_fields(schema, names, source, validators);
        let keys: Vec<String> = descriptors.iter().map(|d| d.name.clone()).collect();
        let original = source
            .map(|model| pick_non_null(model, &keys))
            .unwrap_or_default();

        Ok(Self {
            schema: schema.clone(),
            descriptors,
            keys,
            original,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Requested names the schema declares, in request order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// A bound form model
pub struct FormModel {
    ctx: FormContext,
    fields: Rc<RefCell<FieldSet>>,
    keys: Vec<String>,
    original: Map<String, Value>,
    errors: ErrorChannel,
}

impl FormModel {
    /// A model with no fields and an empty error channel
    pub fn new(ctx: FormContext) -> Self {
        let fields = Rc::new(RefCell::new(FieldSet::default()));
        let errors = ErrorChannel::new(ctx.clone(), Rc::clone(&fields));
        Self {
            ctx,
            fields,
            keys: Vec::new(),
            original: Map::new(),
            errors,
        }
    }

    pub fn context(&self) -> &FormContext {
        &self.ctx
    }

    fn bind(&mut self, binding: &SchemaBinding) {
        if binding.is_empty() {
            return;
        }

        let built = build_fields(&self.ctx, &binding.descriptors);
        let aggregates = apply_aggregates(&self.ctx, &binding.schema, &built);

        {
            let mut fields = self.fields.borrow_mut();
            for name in &binding.keys {
                if let Some(field) = built.get(name) {
                    fields.insert(field.clone());
                }
            }
        }

        for key in &binding.keys {
            if !self.keys.contains(key) {
                self.keys.push(key.clone());
            }
        }
        for (key, value) in &binding.original {
            self.original.insert(key.clone(), value.clone());
        }

        Logger::event(
            Event::ModelExtended,
            &[
                ("aggregates", &aggregates.to_string()),
                ("fields", &binding.keys.len().to_string()),
                ("schema", &binding.schema.name),
            ],
        );
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<Field> {
        self.fields.borrow().get(name).cloned()
    }

    /// Every bound field, in binding order
    pub fn fields(&self) -> Vec<Field> {
        self.fields.borrow().iter().cloned().collect()
    }

    /// Field names covered by `to_object` and `has_change`
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The source values the model was bound from, nulls dropped
    pub fn original(&self) -> &Map<String, Value> {
        &self.original
    }

    /// Current values of every bound field. Fields holding no value are omitted.
    pub fn to_object(&self) -> Value {
        Value::Object(self.snapshot())
    }

    fn snapshot(&self) -> Map<String, Value> {
        let fields = self.fields.borrow();
        self.keys
            .iter()
            .filter_map(|key| {
                let value = fields.get(key)?.get();
                (!value.is_null()).then(|| (key.clone(), value))
            })
            .collect()
    }

    /// Validates every field. Every field is visited even after a failure.
    pub fn validate(&self) -> bool {
        let fields = self.fields();
        let failed = fields.iter().filter(|field| !field.validate()).count();

        Logger::event(
            Event::ModelValidated,
            &[
                ("failed", &failed.to_string()),
                ("fields", &fields.len().to_string()),
            ],
        );

        failed == 0
    }

    /// Whether any value differs from the source model
    pub fn has_change(&self) -> bool {
        self.snapshot() != self.original
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }
}

impl std::fmt::Debug for FormModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormModel")
            .field("keys", &self.keys)
            .field("values", &self.snapshot())
            .field("errors", &self.errors.get())
            .finish()
    }
}

/// Bindings shared by every model of one kind
pub struct ModelPrototype {
    ctx: FormContext,
    bindings: Vec<SchemaBinding>,
}

impl ModelPrototype {
    pub fn new(ctx: FormContext) -> Self {
        Self {
            ctx,
            bindings: Vec::new(),
        }
    }

    pub fn bindings(&self) -> &[SchemaBinding] {
        &self.bindings
    }

    /// A fresh model with its own fields for every binding
    pub fn instantiate(&self) -> FormModel {
        let mut model = FormModel::new(self.ctx.clone());
        for binding in &self.bindings {
            model.bind(binding);
        }
        model
    }
}

/// Adds `names` of `schema` to every model `prototype` instantiates from now on
pub fn extend_prototype(
    prototype: &mut ModelPrototype,
    schema: &Schema,
    names: &[&str],
    source: Option<&Value>,
    validators: &CustomValidators,
) -> FormResult<()> {
    let binding = SchemaBinding::new(schema, names, source, validators)?;
    prototype.bindings.push(binding);
    Ok(())
}

/// Binds `names` of `schema` onto one model
pub fn extend_instance(
    model: &mut FormModel,
    schema: &Schema,
    names: &[&str],
    source: Option<&Value>,
    validators: &CustomValidators,
) -> FormResult<()> {
    let binding = SchemaBinding::new(schema, names, source, validators)?;
    model.bind(&binding);
    Ok(())
}

fn pick_non_null(model: &Value, keys: &[String]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| match model.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some((key.clone(), value.clone())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cat_schema() -> Schema {
        Schema::from_value(json!({
            "name": "cat",
            "properties": {
                "name": { "type": "string", "maxLength": 5 },
                "age": { "type": "integer", "minimum": 0, "maximum": 50 },
                "weight": { "type": "number" }
            },
            "required": ["name"]
        }))
        .unwrap()
    }

    fn instance(names: &[&str], source: Option<&Value>) -> FormModel {
        let mut model = FormModel::new(FormContext::default());
        extend_instance(&mut model, &cat_schema(), names, source, &HashMap::new()).unwrap();
        model
    }

    #[test]
    fn test_field_set_keeps_order_on_replace() {
        let model = instance(&["weight", "name"], None);
        let mut set = FieldSet::default();
        for field in model.fields() {
            set.insert(field);
        }
        set.insert(model.field("weight").unwrap());
        assert_eq!(set.names(), &["weight".to_string(), "name".to_string()]);
        assert!(set.contains("name"));
    }

    #[test]
    fn test_empty_names_bind_nothing() {
        let model = instance(&[], None);
        assert!(model.fields().is_empty());
        assert_eq!(model.to_object(), json!({}));
        assert!(model.validate());
        assert!(model.errors().is_empty());
    }

    #[test]
    fn test_keys_follow_request_order() {
        let model = instance(&["weight", "color", "name"], None);
        assert_eq!(model.keys(), &["weight".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_validate_visits_every_field() {
        let model = instance(&["name", "age"], Some(&json!({ "name": "", "age": 60 })));
        assert!(!model.validate());
        assert_eq!(model.field("name").unwrap().errors().len(), 1);
        assert_eq!(model.field("age").unwrap().errors().len(), 1);
    }

    #[test]
    fn test_original_drops_nulls() {
        let model = instance(&["name", "weight"], Some(&json!({ "name": "dog", "weight": null })));
        assert_eq!(model.original().len(), 1);
        assert!(!model.has_change());
    }

    #[test]
    fn test_extending_twice_merges() {
        let mut model = FormModel::new(FormContext::default());
        let schema = cat_schema();
        let source = json!({ "name": "dog", "age": 3 });
        extend_instance(&mut model, &schema, &["name"], Some(&source), &HashMap::new()).unwrap();
        extend_instance(&mut model, &schema, &["age"], Some(&source), &HashMap::new()).unwrap();

        assert_eq!(model.keys().len(), 2);
        assert_eq!(model.to_object(), json!({ "name": "dog", "age": 3 }));
        assert!(!model.has_change());
    }

    #[test]
    fn test_prototype_instances_do_not_share_state() {
        let mut prototype = ModelPrototype::new(FormContext::default());
        extend_prototype(&mut prototype, &cat_schema(), &["name"], None, &HashMap::new()).unwrap();

        let first = prototype.instantiate();
        let second = prototype.instantiate();
        first.field("name").unwrap().set("tom");

        assert_eq!(first.to_object(), json!({ "name": "tom" }));
        assert_eq!(second.to_object(), json!({ "name": "" }));
        assert_eq!(prototype.bindings().len(), 1);
    }

    #[test]
    fn test_malformed_aggregate_fails_fast() {
        let mut schema = cat_schema();
        schema.aggregate_length.push(crate::schema::AggregateLengthSpec {
            present_property: "name".to_string(),
            properties: vec!["age".to_string()],
            max_length: 10,
        });
        let mut model = FormModel::new(FormContext::default());
        let err = extend_instance(&mut model, &schema, &["name"], None, &HashMap::new()).unwrap_err();
        assert_eq!(err.code(), "FORM_INVALID_AGGREGATE");
    }
}
