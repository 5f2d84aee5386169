//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in the form layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    ConfigLoaded,
    SchemasLoaded,

    // Model construction
    ModelExtended,
    FieldBound,
    AggregateInstalled,
    AggregateSkipped,

    // Field writes and validation
    WriteRejected,
    ModelValidated,

    // Error channel
    ApiErrorsApplied,
    GenericErrorApplied,
    ErrorsCleared,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::ModelExtended => "MODEL_EXTENDED",
            Event::FieldBound => "FIELD_BOUND",
            Event::AggregateInstalled => "AGGREGATE_INSTALLED",
            Event::AggregateSkipped => "AGGREGATE_SKIPPED",
            Event::WriteRejected => "WRITE_REJECTED",
            Event::ModelValidated => "MODEL_VALIDATED",
            Event::ApiErrorsApplied => "API_ERRORS_APPLIED",
            Event::GenericErrorApplied => "GENERIC_ERROR_APPLIED",
            Event::ErrorsCleared => "ERRORS_CLEARED",
        }
    }

    /// Severity the event is logged at.
    ///
    /// Per-model activity is TRACE so embedding a form stays quiet at the
    /// default INFO level. File loads are INFO, skipped groups WARN.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SchemasLoaded => Severity::Info,
            Event::AggregateSkipped => Severity::Warn,
            Event::ModelExtended
            | Event::FieldBound
            | Event::AggregateInstalled
            | Event::WriteRejected
            | Event::ModelValidated
            | Event::ApiErrorsApplied
            | Event::GenericErrorApplied
            | Event::ErrorsCleared => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
