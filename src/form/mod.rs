//! Schema-bound form models
//!
//! Turns a [`Schema`](crate::schema::Schema) and a list of property names
//! into reactive, validated [`Field`]s:
//!
//! 1. [`describe_fields`] derives rules and starting values per property
//! 2. [`build_fields`] instantiates the fields and installs per-type views
//! 3. [`apply_aggregates`] wires shared character budgets
//! 4. [`extend_instance`] / [`extend_prototype`] attach the fields to a
//!    [`FormModel`] with its [`ErrorChannel`]
//!
//! Every write to a field re-runs its rules synchronously. Validation and
//! server errors are data on the fields and the model, never `Err`.

mod aggregate;
mod augment;
mod builder;
mod context;
mod error_channel;
mod field;
mod model;

pub use aggregate::apply_aggregates;
pub use augment::augment;
pub use builder::{build_fields, describe_fields, FieldDescriptor};
pub use context::FormContext;
pub use error_channel::ErrorChannel;
pub use field::{value_size, ErrorOrigin, Field, FieldCell, FieldError};
pub use model::{
    extend_instance, extend_prototype, FieldSet, FormModel, ModelPrototype, SchemaBinding,
};
