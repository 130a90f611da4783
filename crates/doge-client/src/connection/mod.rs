//! Connection management
//!
//! The live connection handle, session state, and fetch correlation.

mod connection;
mod fetch;
mod session;

pub use connection::Connection;
pub use fetch::FetchCorrelator;
pub use session::{SessionState, Tokens};
