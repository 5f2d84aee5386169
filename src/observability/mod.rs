//! Observability for the form layer
//!
//! Structured JSON logging with typed events.
//!
//! ```ignore
//! use schemaform::observability::{Event, Logger};
//!
//! Logger::event(Event::ModelExtended, &[("fields", "3")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
