//! Form error types
//!
//! Error codes:
//! - FORM_UNKNOWN_PROPERTY_TYPE (FATAL)
//! - FORM_INVALID_AGGREGATE (FATAL)
//! - FORM_MALFORMED_SCHEMA (FATAL)
//! - FORM_DUPLICATE_SCHEMA (REJECT)
//! - FORM_CONFIG_ERROR (FATAL)
//! - FORM_MALFORMED_MESSAGES (FATAL)
//!
//! Only configuration problems are errors. Validation failures and server
//! errors are data carried by the form model, never `Err`.

use std::fmt;

use thiserror::Error;

/// Severity levels for form errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected, process continues
    Reject,
    /// Misconfiguration, the form cannot be built
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors raised while loading schemas or building form models
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// Property declares a type the dispatch tables do not know
    #[error("Unknown property type '{0}'")]
    UnknownPropertyType(String),

    /// Aggregate length group is inconsistent with the schema
    #[error("Invalid aggregate length group '{present}' in schema '{schema}': {reason}")]
    InvalidAggregate {
        schema: String,
        present: String,
        reason: String,
    },

    /// Schema file could not be read or parsed
    #[error("Malformed schema '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },

    /// A schema with the same name is already registered
    #[error("Schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// Configuration file invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message catalog could not be read or parsed
    #[error("Malformed message catalog '{path}': {reason}")]
    MalformedMessages { path: String, reason: String },
}

impl FormError {
    /// Create an invalid aggregate error
    pub fn invalid_aggregate(
        schema: impl Into<String>,
        present: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FormError::InvalidAggregate {
            schema: schema.into(),
            present: present.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed schema error
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            FormError::UnknownPropertyType(_) => "FORM_UNKNOWN_PROPERTY_TYPE",
            FormError::InvalidAggregate { .. } => "FORM_INVALID_AGGREGATE",
            FormError::MalformedSchema { .. } => "FORM_MALFORMED_SCHEMA",
            FormError::DuplicateSchema(_) => "FORM_DUPLICATE_SCHEMA",
            FormError::Config(_) => "FORM_CONFIG_ERROR",
            FormError::MalformedMessages { .. } => "FORM_MALFORMED_MESSAGES",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            FormError::DuplicateSchema(_) => Severity::Reject,
            _ => Severity::Fatal,
        }
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for schema and form operations
pub type FormResult<T> = Result<T, FormError>;
