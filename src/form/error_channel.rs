//! Model-level error collection
//!
//! Server errors that name a bound field land on that field, tagged as
//! api-origin. Everything else lands on the model-level list.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;

use super::context::FormContext;
use super::field::FieldError;
use super::model::FieldSet;
use crate::i18n::{ApiErrorEntry, ApiResponse, ErrorAdapter};
use crate::observability::{Event, Logger};
use crate::reactive::{Callback, ObservableVec, Reactive, SubscriptionId};

/// Errors attached to a model
#[derive(Clone)]
pub struct ErrorChannel {
    items: ObservableVec<String>,
    fields: Rc<RefCell<FieldSet>>,
    ctx: FormContext,
}

impl ErrorChannel {
    pub(crate) fn new(ctx: FormContext, fields: Rc<RefCell<FieldSet>>) -> Self {
        Self {
            items: ObservableVec::default(),
            fields,
            ctx,
        }
    }

    /// Applies a server response
    pub fn add(&self, response: &ApiResponse) {
        self.apply(response, None);
    }

    /// Applies a server response, letting `adapter` override entry messages
    pub fn add_with_adapter(&self, response: &ApiResponse, adapter: &dyn ErrorAdapter) {
        self.apply(response, Some(adapter));
    }

    /// Applies a raw JSON payload. Anything without an `errors` list gets the generic error.
    pub fn add_value(&self, payload: &Value) {
        self.add(&ApiResponse::from_value(payload));
    }

    fn apply(&self, response: &ApiResponse, adapter: Option<&dyn ErrorAdapter>) {
        let entries = match &response.errors {
            Some(entries) => entries,
            None => {
                self.items.push(self.ctx.generic_error());
                Logger::event(
                    Event::GenericErrorApplied,
                    &[("key", &self.ctx.generic_error_key)],
                );
                return;
            }
        };

        let mut on_fields = 0usize;
        let mut on_model = 0usize;

        for (target, group) in group_by_target(entries) {
            let messages = self.ctx.translator.translate(&group, adapter);
            let field = target.and_then(|name| self.fields.borrow().get(name).cloned());

            match field {
                Some(field) => {
                    on_fields += messages.len();
                    field
                        .error_list()
                        .extend(messages.into_iter().map(FieldError::api));
                }
                None => {
                    on_model += messages.len();
                    self.items.extend(messages);
                }
            }
        }

        Logger::event(
            Event::ApiErrorsApplied,
            &[
                ("field_errors", &on_fields.to_string()),
                ("model_errors", &on_model.to_string()),
            ],
        );
    }

    /// Empties the model-level list and drops api-origin errors from every field
    pub fn clear(&self) {
        self.items.clear();

        let fields: Vec<_> = self.fields.borrow().iter().cloned().collect();
        let removed: usize = fields
            .iter()
            .filter(|field| !field.error_list().is_empty())
            .map(|field| field.error_list().retain(|error| !error.is_api()))
            .sum();

        Logger::event(
            Event::ErrorsCleared,
            &[("field_errors", &removed.to_string())],
        );
    }

    pub fn get(&self) -> Vec<String> {
        self.items.get()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The observable model-level sequence
    pub fn list(&self) -> &ObservableVec<String> {
        &self.items
    }
}

impl Reactive for ErrorChannel {
    fn subscribe(&self, callback: Callback) -> SubscriptionId {
        self.items.subscribe(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.items.unsubscribe(id)
    }
}

/// Groups entries by target property, in order of first appearance
fn group_by_target(entries: &[ApiErrorEntry]) -> Vec<(Option<&str>, Vec<ApiErrorEntry>)> {
    let mut groups: Vec<(Option<&str>, Vec<ApiErrorEntry>)> = Vec::new();
    for entry in entries {
        let target = entry.target();
        match groups.iter_mut().find(|(t, _)| *t == target) {
            Some((_, group)) => group.push(entry.clone()),
            None => groups.push((target, vec![entry.clone()])),
        }
    }
    groups
}
