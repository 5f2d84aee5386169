//! Form schema subsystem
//!
//! A schema declares the properties a form binds to: their types, bounds,
//! enumerations, required flags and shared character budgets. Schemas are
//! immutable input; the form layer derives every rule and default from them.

mod errors;
mod loader;
mod types;

pub use errors::{FormError, FormResult, Severity};
pub use loader::{load_schema_file, SchemaLoader};
pub use types::{AggregateLengthSpec, PropertySpec, PropertyType, Schema};
