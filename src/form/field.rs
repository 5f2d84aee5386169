//! Reactive, validated fields

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::i18n::Localizer;
use crate::observability::{Event, Logger};
use crate::reactive::{Callback, Computed, Observable, ObservableVec, Reactive, SubscriptionId};
use crate::schema::{PropertySpec, PropertyType};
use crate::validation::Rule;

/// Where a field error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorOrigin {
    /// Injected from a server response
    Api,
    /// Produced by the field's own rules
    Validation,
}

impl ErrorOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorOrigin::Api => "api",
            ErrorOrigin::Validation => "validation",
        }
    }
}

/// A display message tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub origin: ErrorOrigin,
}

impl FieldError {
    pub fn api(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: ErrorOrigin::Api,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            origin: ErrorOrigin::Validation,
        }
    }

    pub fn is_api(&self) -> bool {
        self.origin == ErrorOrigin::Api
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl PartialEq<str> for FieldError {
    fn eq(&self, other: &str) -> bool {
        self.message == other
    }
}

impl PartialEq<&str> for FieldError {
    fn eq(&self, other: &&str) -> bool {
        self.message == *other
    }
}

/// Size of a value the way character budgets count it
pub fn value_size(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

/// Storage behind a field: a single value, or a sequence for array properties
#[derive(Clone, Debug)]
pub enum FieldCell {
    Single(Observable<Value>),
    Sequence(ObservableVec<Value>),
}

impl FieldCell {
    fn new(kind: PropertyType, initial: Value) -> Self {
        match kind {
            PropertyType::Array => FieldCell::Sequence(ObservableVec::new(into_items(initial))),
            _ => FieldCell::Single(Observable::new(initial)),
        }
    }

    pub fn get(&self) -> Value {
        match self {
            FieldCell::Single(value) => value.get(),
            FieldCell::Sequence(items) => Value::Array(items.get()),
        }
    }

    /// Current size without copying the value
    pub fn size(&self) -> usize {
        match self {
            FieldCell::Single(value) => value.with(value_size),
            FieldCell::Sequence(items) => items.len(),
        }
    }

    fn store(&self, value: Value) {
        match self {
            FieldCell::Single(cell) => cell.set(value),
            FieldCell::Sequence(items) => items.set(into_items(value)),
        }
    }
}

impl Reactive for FieldCell {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        match self {
            FieldCell::Single(value) => value.subscribe(callback),
            FieldCell::Sequence(items) => items.subscribe(callback),
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        match self {
            FieldCell::Single(value) => value.unsubscribe(id),
            FieldCell::Sequence(items) => items.unsubscribe(id),
        }
    }
}

fn into_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

struct FieldInner {
    name: String,
    spec: PropertySpec,
    cell: FieldCell,
    rules: Vec<Rule>,
    errors: ObservableVec<FieldError>,
    localizer: Rc<dyn Localizer>,
    max_length: RefCell<Option<Computed<Option<i64>>>>,
    char_rem: RefCell<Option<Computed<String>>>,
    text: RefCell<Option<Computed<String>>>,
}

impl FieldInner {
    /// Re-runs every rule; api-origin errors are kept, validation errors replaced.
    fn run_validation(&self) -> bool {
        let value = self.cell.get();
        let failures: Vec<FieldError> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(&value, self.localizer.as_ref()))
            .map(FieldError::validation)
            .collect();
        let valid = failures.is_empty();

        let mut next: Vec<FieldError> = self.errors.with(|errors| {
            errors.iter().filter(|e| e.is_api()).cloned().collect()
        });
        let changed = self
            .errors
            .with(|errors| errors.iter().any(|e| !e.is_api()) || !valid);
        if changed {
            next.extend(failures);
            self.errors.set(next);
        }

        valid
    }
}

/// A reactive value bound to one schema property.
///
/// Cheap to clone; clones share state. Every write runs the field's
/// rules before returning.
#[derive(Clone)]
pub struct Field {
    inner: Rc<FieldInner>,
}

impl Field {
    pub(crate) fn new(
        name: impl Into<String>,
        spec: PropertySpec,
        initial: Value,
        rules: Vec<Rule>,
        localizer: Rc<dyn Localizer>,
    ) -> Self {
        let cell = FieldCell::new(spec.kind, initial);
        let inner = Rc::new(FieldInner {
            name: name.into(),
            spec,
            cell,
            rules,
            errors: ObservableVec::default(),
            localizer,
            max_length: RefCell::new(None),
            char_rem: RefCell::new(None),
            text: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        inner.cell.subscribe(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.run_validation();
            }
        }));

        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn spec(&self) -> &PropertySpec {
        &self.inner.spec
    }

    pub fn kind(&self) -> PropertyType {
        self.inner.spec.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.inner.rules
    }

    /// The underlying reactive storage
    pub fn cell(&self) -> &FieldCell {
        &self.inner.cell
    }

    /// Returns the current value
    pub fn get(&self) -> Value {
        self.inner.cell.get()
    }

    /// Writes a value. Size rules may discard it, leaving the field empty.
    pub fn set(&self, value: impl Into<Value>) {
        let written: Value = value.into();
        let admitted = self
            .inner
            .rules
            .iter()
            .fold(written.clone(), |value, rule| rule.admit(value));

        if admitted != written {
            Logger::event(
                Event::WriteRejected,
                &[("field", self.name()), ("written", &written.to_string())],
            );
        }

        self.inner.cell.store(admitted);
    }

    /// Appends to an array field; returns false for other field types
    pub fn push(&self, item: impl Into<Value>) -> bool {
        match &self.inner.cell {
            FieldCell::Sequence(items) => {
                items.push(item.into());
                true
            }
            FieldCell::Single(_) => false,
        }
    }

    /// Size of the current value (characters, items or keys)
    pub fn size(&self) -> usize {
        self.inner.cell.size()
    }

    /// Runs every rule against the current value
    pub fn validate(&self) -> bool {
        self.inner.run_validation()
    }

    /// Current errors, api-origin first
    pub fn errors(&self) -> Vec<FieldError> {
        self.inner.errors.get()
    }

    /// The observable error sequence
    pub fn error_list(&self) -> &ObservableVec<FieldError> {
        &self.inner.errors
    }

    /// Character limit for string fields, live for aggregate groups
    pub fn max_length(&self) -> Option<i64> {
        self.inner
            .max_length
            .borrow()
            .as_ref()
            .and_then(|limit| limit.get())
    }

    pub fn max_length_signal(&self) -> Option<Computed<Option<i64>>> {
        self.inner.max_length.borrow().clone()
    }

    /// Remaining-characters text for string fields
    pub fn char_rem(&self) -> Option<String> {
        self.inner.char_rem.borrow().as_ref().map(Computed::get)
    }

    pub fn char_rem_signal(&self) -> Option<Computed<String>> {
        self.inner.char_rem.borrow().clone()
    }

    /// Text view of a boolean field: "true", "false" or "null"
    pub fn text(&self) -> Option<String> {
        self.inner.text.borrow().as_ref().map(Computed::get)
    }

    /// Writes through the text view of a boolean field.
    /// Returns false when the field has no text view.
    pub fn set_text(&self, text: &str) -> bool {
        if self.inner.text.borrow().is_none() {
            return false;
        }
        if self.inner.spec.is_nullable() && text == "null" {
            self.set(Value::Null);
        } else {
            self.set(text == "true");
        }
        true
    }

    pub(crate) fn install_max_length(&self, limit: Computed<Option<i64>>) {
        *self.inner.max_length.borrow_mut() = Some(limit);
    }

    pub(crate) fn install_char_rem(&self, text: Computed<String>) {
        *self.inner.char_rem.borrow_mut() = Some(text);
    }

    pub(crate) fn install_text(&self, text: Computed<String>) {
        *self.inner.text.borrow_mut() = Some(text);
    }
}

impl Reactive for Field {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        self.inner.cell.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.cell.unsubscribe(id)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.inner.name)
            .field("type", &self.inner.spec.kind)
            .field("value", &self.get())
            .field("errors", &self.errors())
            .finish()
    }
}
