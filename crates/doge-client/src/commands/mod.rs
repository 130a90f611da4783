//! Chat commands
//!
//! A chat message starting with a configured prefix is split on whitespace;
//! the first word selects the command and the rest are bound to its declared
//! parameters before the handler is spawned.

mod args;
mod command;
mod context;
pub(crate) mod router;

pub use args::{ArgValue, Args, BasicType, Convert, Converter, MemberConverter, Param, ParamKind};
pub use command::{Command, CommandFuture, CommandHandler};
pub use context::Context;
pub use router::{CooldownTracker, Invocation};
