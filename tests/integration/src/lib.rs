//! Integration test utilities for the doge client
//!
//! Provides an in-memory transport standing in for the chat server, plus
//! frame builders for the server side of a session.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
