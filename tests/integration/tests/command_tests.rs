//! Command routing tests
//!
//! Chat messages with a prefix are routed to registered commands; arguments
//! are bound to parameters, cooldowns are enforced per author and failures
//! reach the `error` listener.
//!
//! Run with: cargo test -p integration-tests --test command_tests

use std::time::Duration;

use doge_client::{ArgValue, Client, ClientError, Command, Event, EventKind, Param};
use doge_core::DomainError;
use integration_tests::*;
use tokio::sync::mpsc;

/// Register `command` with a handler that forwards its bound arguments
fn forwarding_command(
    client: &Client,
    name: &str,
    configure: impl FnOnce(Command) -> Command,
) -> mpsc::UnboundedReceiver<doge_client::Args> {
    let (tx, rx) = mpsc::unbounded_channel();
    let command = Command::bound(name, move |_, args| {
        let tx = tx.clone();
        async move {
            let _ = tx.send(args);
            Ok(())
        }
    });
    client.add_command(configure(command)).unwrap();
    rx
}

async fn start_in_room(client: &Client, server: &mut MockServer) {
    authenticate(server, client).await.unwrap();
    enter_room(
        server,
        client,
        SELF_ID,
        vec![
            user(SELF_ID, SELF_NAME, Some(ROOM_ID)),
            user("alice-id", "alice", Some(ROOM_ID)),
            user("bob-id", "bob", Some(ROOM_ID)),
        ],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_mention_argument_resolves_member() {
    let (client, mut server) = test_client(test_config());
    let mut greeted = forwarding_command(&client, "greet", |c| c.param(Param::new("user").member()));
    let mut errors = listen(&client, EventKind::Error);
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "!greet @alice"));
    let args = recv_within(&mut greeted).await.unwrap();
    assert_eq!(args.member("user").unwrap().id(), "alice-id");

    server.push(&chat_msg("bob-id", "bob", "!greet @nobody"));
    let Event::Error(error) = recv_within(&mut errors).await.unwrap() else {
        panic!("expected error");
    };
    assert!(matches!(
        error.as_ref(),
        ClientError::Domain(DomainError::MemberNotFound(name)) if name == "nobody"
    ));
    assert_silent(&mut greeted).await.unwrap();

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cooldown_throttles_second_invocation() {
    let (client, mut server) = test_client(test_config());
    let mut invoked = forwarding_command(&client, "greet", |c| {
        c.alias("hi").cooldown(Duration::from_secs(60))
    });
    let mut cooldowns = listen(&client, EventKind::CooldownTrigger);
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "!greet"));
    recv_within(&mut invoked).await.unwrap();

    // Aliases share the cooldown
    server.push(&chat_msg("bob-id", "bob", "!hi"));
    let Event::CooldownTrigger { context, command, remaining } =
        recv_within(&mut cooldowns).await.unwrap()
    else {
        panic!("expected cooldown_trigger");
    };
    assert_eq!(command, "greet");
    assert_eq!(context.invoked_with, "hi");
    assert_eq!(context.author().id, "bob-id");
    assert!(remaining > Duration::ZERO && remaining <= Duration::from_secs(60));
    assert_silent(&mut invoked).await.unwrap();

    // Another author is not throttled
    server.push(&chat_msg("alice-id", "alice", "!greet"));
    recv_within(&mut invoked).await.unwrap();

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_argument_binding() {
    let (client, mut server) = test_client(test_config());
    let mut invoked = forwarding_command(&client, "roll", |c| {
        c.param(Param::new("sides").int())
            .param(Param::new("loud").boolean().default(false))
            .param(Param::rest("note").default("none"))
    });
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "!roll 20 yes good luck all"));
    let args = recv_within(&mut invoked).await.unwrap();
    assert_eq!(args.int("sides"), Some(20));
    assert_eq!(args.bool("loud"), Some(true));
    assert_eq!(args.str("note"), Some("good luck all"));

    server.push(&chat_msg("bob-id", "bob", "!roll 6"));
    let args = recv_within(&mut invoked).await.unwrap();
    assert_eq!(args.int("sides"), Some(6));
    assert_eq!(args.get("loud"), Some(&ArgValue::Bool(false)));
    assert_eq!(args.str("note"), Some("none"));

    // Values that do not parse stay strings
    server.push(&chat_msg("bob-id", "bob", "!roll many"));
    let args = recv_within(&mut invoked).await.unwrap();
    assert_eq!(args.str("sides"), Some("many"));

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_argument_is_reported() {
    let (client, mut server) = test_client(test_config());
    let mut invoked = forwarding_command(&client, "kick", |c| c.param(Param::new("user")));
    let mut errors = listen(&client, EventKind::Error);
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "!kick"));
    let Event::Error(error) = recv_within(&mut errors).await.unwrap() else {
        panic!("expected error");
    };
    assert!(matches!(error.as_ref(), ClientError::NotEnoughArguments(name) if name == "kick"));
    assert_silent(&mut invoked).await.unwrap();

    server.push(&chat_msg("bob-id", "bob", "!unknown thing"));
    let Event::Error(error) = recv_within(&mut errors).await.unwrap() else {
        panic!("expected error");
    };
    assert!(matches!(error.as_ref(), ClientError::CommandNotFound(name) if name == "unknown"));

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_failure_reaches_error_listener() {
    let (client, mut server) = test_client(test_config());
    client
        .add_command(Command::bound("boom", |_, _| async {
            Err(anyhow::anyhow!("exploded"))
        }))
        .unwrap();
    let mut errors = listen(&client, EventKind::Error);
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "!boom"));
    let Event::Error(error) = recv_within(&mut errors).await.unwrap() else {
        panic!("expected error");
    };
    assert!(matches!(error.as_ref(), ClientError::Handler { command, .. } if command == "boom"));
    assert!(error.to_string().contains("exploded"));

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_own_messages_are_not_routed() {
    let (client, mut server) = test_client(test_config());
    let mut invoked = forwarding_command(&client, "echo", |c| c);
    let mut messages = listen(&client, EventKind::Message);
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg(SELF_ID, SELF_NAME, "!echo"));
    let Event::Message(message) = recv_within(&mut messages).await.unwrap() else {
        panic!("expected message");
    };
    assert_eq!(message.content, "!echo");
    assert_silent(&mut invoked).await.unwrap();

    // Too short to be a command
    server.push(&chat_msg("bob-id", "bob", "!e"));
    recv_within(&mut messages).await.unwrap();
    assert_silent(&mut invoked).await.unwrap();

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unbound_handler_can_reply() {
    let (client, mut server) = test_client(test_config().with_prefixes(["?", "!"]));
    client
        .add_command(
            Command::new("say", |client, _, args| async move {
                client.send(args.str("text").unwrap_or_default())?;
                Ok::<_, anyhow::Error>(())
            })
            .param(Param::rest("text")),
        )
        .unwrap();
    let session = spawn_session(&client);
    start_in_room(&client, &mut server).await;

    server.push(&chat_msg("bob-id", "bob", "?say hello big world"));
    let frame = server.expect_op("send_room_chat_msg").await.unwrap();
    let words: Vec<&str> = frame["d"]["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|token| token["v"].as_str())
        .collect();
    assert_eq!(words, vec!["hello", "big", "world"]);

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_alias_conflict_is_rejected() {
    let (client, _server) = test_client(test_config());
    client
        .add_command(Command::bound("greet", |_, _| async { Ok(()) }).alias("hi"))
        .unwrap();

    let err = client
        .add_command(Command::bound("wave", |_, _| async { Ok(()) }).alias("hi"))
        .unwrap_err();
    assert!(matches!(err, ClientError::CommandAlreadyDefined(name) if name == "hi"));
}
