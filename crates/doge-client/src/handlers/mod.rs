//! Inbound op handlers
//!
//! Routes each inbound frame to the handler for its op. Handlers update the
//! session state first and fire their events after the state lock is released.

mod chat;
mod fetch;
mod roster;
mod session;

pub use chat::ChatHandler;
pub use fetch::FetchHandler;
pub use roster::RosterHandler;
pub use session::SessionHandler;

use serde_json::Value;

use crate::client::Client;
use crate::error::ClientResult;
use crate::protocol::{Envelope, InboundFrame, InboundOp};

/// Dispatch inbound frames to the appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one inbound text frame. Malformed frames are logged and dropped.
    pub async fn dispatch(client: &Client, text: &str) {
        let frame = match InboundFrame::parse(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable frame");
                return;
            }
        };

        let Some(op) = InboundOp::from_name(frame.op()) else {
            tracing::trace!(op = %frame.op(), "Ignoring unhandled op");
            return;
        };

        let envelope = match frame {
            InboundFrame::Envelope(envelope) => envelope,
            InboundFrame::Bare(name) => Envelope {
                op: name,
                d: Value::Null,
                fetch_id: None,
            },
        };

        if let Err(e) = Self::handle(client, op, &envelope).await {
            tracing::warn!(op = %op.as_str(), code = e.code(), error = %e, "Failed to handle frame");
        }
    }

    async fn handle(client: &Client, op: InboundOp, envelope: &Envelope) -> ClientResult<()> {
        match op {
            InboundOp::AuthGood => SessionHandler::auth_good(client, envelope.payload()?),
            InboundOp::NewTokens => SessionHandler::new_tokens(client, envelope.payload()?),
            InboundOp::JoinRoomDone => SessionHandler::join_room_done(client, envelope.payload()?),
            InboundOp::YouJoinedAsSpeaker => SessionHandler::joined_as_speaker(client),
            InboundOp::FetchDone => FetchHandler::handle(client, envelope),
            InboundOp::NewUserJoinRoom => RosterHandler::user_joined(client, envelope.payload()?),
            InboundOp::UserLeftRoom => RosterHandler::user_left(client, &envelope.payload()?),
            InboundOp::SpeakerAdded => RosterHandler::speaker_added(client, envelope.payload()?),
            InboundOp::SpeakerRemoved => RosterHandler::speaker_removed(client, envelope.payload()?),
            InboundOp::HandRaised => RosterHandler::hand_raised(client, envelope.payload()?),
            InboundOp::ChatUserBanned => RosterHandler::user_banned(client, envelope.payload()?),
            InboundOp::GetCurrentRoomUsersDone => {
                RosterHandler::room_users(client, envelope.payload()?)
            }
            InboundOp::ModChanged => RosterHandler::mod_changed(client, &envelope.payload()?),
            InboundOp::NewRoomCreator => RosterHandler::new_room_creator(client, &envelope.payload()?),
            InboundOp::MessageDeleted => ChatHandler::message_deleted(client, envelope.payload()?),
            InboundOp::NewChatMsg => {
                ChatHandler::new_message(client, envelope.payload()?).await;
                Ok(())
            }
        }
    }
}

impl Client {
    pub(crate) async fn dispatch(&self, text: &str) {
        MessageDispatcher::dispatch(self, text).await;
    }
}
