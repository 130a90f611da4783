//! Wire protocol definitions
//!
//! Defines op names, frame formats, payloads, and close codes.

mod close_codes;
mod messages;
mod ops;
pub mod payloads;

pub use close_codes::CloseCode;
pub use messages::{Envelope, InboundFrame};
pub use ops::{InboundOp, OutboundOp, HEARTBEAT_FRAME};
pub use payloads::AuthPayload;
