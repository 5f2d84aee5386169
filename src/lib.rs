//! schemaform - reactive, validated form models bound to declarative schemas
//!
//! A schema declares property types, bounds, lengths, enumerations and
//! required flags. Extending a model with a schema and a list of property
//! names gives one observable field per property, with:
//!
//! - validation on every write
//! - type defaults when the source model has no value
//! - remaining-character text and shared character budgets for strings
//! - server error injection and clearing
//! - dirty-checking against the source model

pub mod cli;
pub mod config;
pub mod form;
pub mod i18n;
pub mod observability;
pub mod reactive;
pub mod schema;
pub mod validation;

pub use config::FormConfig;
pub use form::{
    extend_instance, extend_prototype, ErrorChannel, ErrorOrigin, Field, FieldError,
    FormContext, FormModel, ModelPrototype,
};
pub use schema::{FormError, FormResult, PropertySpec, PropertyType, Schema};
