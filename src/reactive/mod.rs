//! Reactive containers for form state
//!
//! Three primitives:
//!
//! - [`Observable<T>`]: a single value with change notification
//! - [`ObservableVec<T>`]: a sequence with change notification
//! - [`Computed<T>`]: a derived value that re-derives whenever a tracked
//!   source changes
//!
//! # Model
//!
//! Everything is single-threaded and synchronous. A write stores the value,
//! then runs every subscriber before returning, so derived values are current
//! by the time the writer regains control. Derived values track their sources
//! explicitly; the dependency graph is whatever the caller wires, and callers
//! must wire it without cycles.
//!
//! Handles are cheap `Rc` clones. Subscriptions held by a [`Computed`] are
//! released when its last handle drops.

mod computed;
mod observable;
mod subscribers;

pub use computed::Computed;
pub use observable::{Observable, ObservableVec};
pub use subscribers::{Callback, Reactive, SubscriptionId};
