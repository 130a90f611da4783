//! Chat messages and command routing

use crate::client::Client;
use crate::commands::{router, Context};
use crate::error::ClientResult;
use crate::events::Event;
use crate::protocol::payloads::{ChatMessage, MessageDeleted};

/// Handles chat ops
pub struct ChatHandler;

impl ChatHandler {
    /// `new_chat_msg`: fire `message`, then route it as a command unless it
    /// was sent by the client's own user
    pub async fn new_message(client: &Client, payload: ChatMessage) {
        let message = payload.msg;
        client.fire(Event::Message(message.clone()));

        let own_id = client.inner.state.read().user_id().map(str::to_string);
        if own_id.as_deref() == Some(message.author.id.as_str()) {
            return;
        }

        let Some((prefix, name, args)) = split_command(&message.content, &client.config().prefixes)
        else {
            return;
        };

        let ctx = Context::new(message, prefix, name.clone());
        if let Err(e) = router::execute(client, &name, ctx, &args).await {
            tracing::debug!(command = %name, code = e.code(), "Command rejected");
            client.report_error(e);
        }
    }

    /// `message_deleted`
    pub fn message_deleted(client: &Client, payload: MessageDeleted) -> ClientResult<()> {
        client.fire(Event::MessageDelete {
            deleter_id: payload.deleter_id,
            message_id: payload.message_id,
        });
        Ok(())
    }
}

/// Match the first prefix that leaves at least two characters after it and
/// split the remainder into a command name and raw arguments
fn split_command(content: &str, prefixes: &[String]) -> Option<(String, String, Vec<String>)> {
    prefixes.iter().find_map(|prefix| {
        if content.len() <= prefix.len() + 1 {
            return None;
        }
        let rest = content.strip_prefix(prefix.as_str())?;
        let mut words = rest.split_whitespace();
        let name = words.next()?;
        Some((
            prefix.clone(),
            name.to_string(),
            words.map(str::to_string).collect(),
        ))
    })
}
