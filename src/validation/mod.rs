//! Validation rules and per-type derivation
//!
//! - [`rules_for`] maps a property declaration to its type rules
//! - [`default_for`] maps a property declaration to its starting value
//! - [`Rule`] filters writes and checks stored values

mod generator;
mod rules;

pub use generator::{default_for, rules_for};
pub use rules::{is_blank, CustomValidator, Predicate, Rule};

use std::collections::HashMap;

/// Caller-supplied validators keyed by property name
pub type CustomValidators = HashMap<String, CustomValidator>;
