//! Example bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p doge-client --bin doge-bot
//! ```
//!
//! Tokens and settings are loaded from `DOGE_*` environment variables (or a `.env` file).

use std::time::Duration;

use doge_client::{Client, ClientError, Command, EventKind, Param};
use doge_common::{try_init_tracing, ClientConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(code = e.code(), error = %e, "Bot stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ClientError> {
    info!("Starting doge-bot...");

    let config = ClientConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        url = %config.api_url,
        prefixes = ?config.prefixes,
        room = ?config.room,
        "Configuration loaded"
    );

    let client = Client::new(config);

    client.on(EventKind::Ready, |client, _| async move {
        if let Some(user) = client.user() {
            info!(user_id = %user.id, username = %user.username, "Logged in");
        }
    });

    client.on(EventKind::RoomsFetch, |client, _| async move {
        if client.room().is_some() {
            return;
        }
        let Some(room) = client.rooms().into_iter().next() else {
            return;
        };
        info!(room_id = %room.id, room_name = %room.name, "Joining the most popular room");
        if let Err(e) = client.join_room(&room.id) {
            error!(error = %e, "Failed to join room");
        }
    });

    client.on(EventKind::Error, |_, event| async move {
        if let doge_client::Event::Error(e) = event {
            error!(code = e.code(), error = %e, "Command error");
        }
    });

    client.add_command(
        Command::new("greet", |client, ctx, args| async move {
            let name = args
                .member("user")
                .map_or_else(|| ctx.author().username.clone(), |m| m.display_name().to_string());
            client.send(&format!("Hello {name}!"))?;
            Ok::<_, anyhow::Error>(())
        })
        .alias("hi")
        .cooldown(Duration::from_secs(5))
        .param(Param::new("user").member().default("")),
    )?;

    client.add_command(
        Command::new("say", |client, _, args| async move {
            let text = args.str("text").unwrap_or_default();
            if !text.is_empty() {
                client.send(text)?;
            }
            Ok::<_, anyhow::Error>(())
        })
        .param(Param::rest("text").default("")),
    )?;

    client.run().await
}
