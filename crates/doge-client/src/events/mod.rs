//! Client events
//!
//! Event kinds, the event enum fired by the dispatcher, and the waiter registry.

mod event;
mod kinds;
mod waiters;

pub use event::{Event, PermissionKind};
pub use kinds::EventKind;
pub use waiters::{EventCheck, WaitFor, Waiter, WaiterRegistry};
