//! Roster tests
//!
//! Room entry, roster deltas and permission changes as seen through the
//! client's room state and fired events.
//!
//! Run with: cargo test -p integration-tests --test roster_tests

use doge_client::{ClientError, Event, EventKind, PermissionKind};
use doge_core::{RoomMember, RoomPermissions};
use integration_tests::*;

fn permissions(client: &doge_client::Client, id: &str) -> RoomPermissions {
    client
        .room()
        .and_then(|room| room.members.get(id).and_then(RoomMember::permissions))
        .unwrap_or_default()
}

#[tokio::test]
async fn test_join_room_loads_roster_and_marks_creator() {
    let (client, mut server) = test_client(test_config());
    let mut joined = listen(&client, EventKind::RoomJoin);
    let mut fetched = listen(&client, EventKind::RoomUsersFetch);
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();

    enter_room(
        &mut server,
        &client,
        "alice-id",
        vec![
            user("alice-id", "alice", Some(ROOM_ID)),
            user(SELF_ID, SELF_NAME, Some(ROOM_ID)),
            user("bob-id", "bob", Some(ROOM_ID)),
        ],
    )
    .await
    .unwrap();

    assert!(matches!(
        recv_within(&mut joined).await.unwrap(),
        Event::RoomJoin { as_speaker: false }
    ));
    assert!(matches!(recv_within(&mut fetched).await.unwrap(), Event::RoomUsersFetch));

    let room = client.room().unwrap();
    assert_eq!(room.members.ids(), vec!["alice-id", SELF_ID, "bob-id"]);
    assert!(permissions(&client, "alice-id").is_admin());
    assert!(!permissions(&client, "bob-id").is_admin());

    server.push(&serde_json::json!({ "op": "you-joined-as-speaker" }));
    server.push_text("\"you-joined-as-speaker\"");
    assert!(matches!(
        recv_within(&mut joined).await.unwrap(),
        Event::RoomJoin { as_speaker: true }
    ));
    assert!(matches!(
        recv_within(&mut joined).await.unwrap(),
        Event::RoomJoin { as_speaker: true }
    ));

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_join_and_leave_deltas() {
    let (client, mut server) = test_client(test_config());
    let mut joins = listen(&client, EventKind::UserJoin);
    let mut leaves = listen(&client, EventKind::UserLeave);
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();
    enter_room(&mut server, &client, SELF_ID, vec![user(SELF_ID, SELF_NAME, Some(ROOM_ID))])
        .await
        .unwrap();

    // A repeated join replaces the entry instead of duplicating it
    server.push(&user_joined(user("carol-id", "carol", Some(ROOM_ID))));
    server.push(&user_joined(user("carol-id", "carol2", Some(ROOM_ID))));
    recv_within(&mut joins).await.unwrap();
    recv_within(&mut joins).await.unwrap();

    let room = client.room().unwrap();
    assert_eq!(room.members.ids(), vec![SELF_ID, "carol-id"]);
    assert_eq!(
        room.members.get("carol-id").and_then(RoomMember::username),
        Some("carol2")
    );

    server.push(&user_left("carol-id"));
    let Event::UserLeave(member) = recv_within(&mut leaves).await.unwrap() else {
        panic!("expected user_leave");
    };
    assert_eq!(member.id(), "carol-id");
    assert_eq!(client.room().unwrap().members.ids(), vec![SELF_ID]);

    // Unknown members leaving fire nothing
    server.push(&user_left("ghost"));
    assert_silent(&mut leaves).await.unwrap();

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_new_room_creator_demotes_before_promoting() {
    let (client, mut server) = test_client(test_config());
    let mut changes = listen(&client, EventKind::PermissionChange);
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();
    enter_room(
        &mut server,
        &client,
        "alice-id",
        vec![
            user("alice-id", "alice", Some(ROOM_ID)),
            user("bob-id", "bob", Some(ROOM_ID)),
        ],
    )
    .await
    .unwrap();

    server.push(&new_room_creator("bob-id"));

    let Event::PermissionChange { member, permission } = recv_within(&mut changes).await.unwrap()
    else {
        panic!("expected permission_change");
    };
    assert_eq!(member.id(), "alice-id");
    assert_eq!(permission, PermissionKind::Admin);
    assert!(!member.permissions().unwrap().is_admin());

    let Event::PermissionChange { member, permission } = recv_within(&mut changes).await.unwrap()
    else {
        panic!("expected permission_change");
    };
    assert_eq!(member.id(), "bob-id");
    assert_eq!(permission, PermissionKind::Admin);
    assert!(member.permissions().unwrap().is_admin());

    assert_silent(&mut changes).await.unwrap();
    assert!(!permissions(&client, "alice-id").is_admin());
    assert!(permissions(&client, "bob-id").is_admin());
    assert_eq!(client.room().unwrap().creator_id, "bob-id");

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_mod_and_speaker_changes() {
    let (client, mut server) = test_client(test_config());
    let mut changes = listen(&client, EventKind::PermissionChange);
    let mut speakers = listen(&client, EventKind::SpeakerAdd);
    let mut requests = listen(&client, EventKind::SpeakerRequest);
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();
    enter_room(
        &mut server,
        &client,
        SELF_ID,
        vec![
            user(SELF_ID, SELF_NAME, Some(ROOM_ID)),
            user("bob-id", "bob", Some(ROOM_ID)),
            user("eve-id", "eve", Some("elsewhere")),
        ],
    )
    .await
    .unwrap();

    server.push(&mod_changed("bob-id"));
    let Event::PermissionChange { member, permission } = recv_within(&mut changes).await.unwrap()
    else {
        panic!("expected permission_change");
    };
    assert_eq!(member.id(), "bob-id");
    assert_eq!(permission, PermissionKind::Mod);
    assert!(permissions(&client, "bob-id").is_mod());

    server.push(&hand_raised("bob-id"));
    assert!(matches!(
        recv_within(&mut requests).await.unwrap(),
        Event::SpeakerRequest { user_id, .. } if user_id == "bob-id"
    ));
    assert!(permissions(&client, "bob-id").asked_to_speak());

    server.push(&speaker_added("bob-id"));
    let Event::SpeakerAdd { member, mute_map } = recv_within(&mut speakers).await.unwrap() else {
        panic!("expected speaker_add");
    };
    assert_eq!(member.id(), "bob-id");
    assert_eq!(mute_map["bob-id"], false);
    assert!(permissions(&client, "bob-id").is_speaker());

    // Members whose current room differs are left alone
    server.push(&speaker_added("eve-id"));
    assert_silent(&mut speakers).await.unwrap();
    assert!(!permissions(&client, "eve-id").is_speaker());

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_room_actions_require_a_room() {
    let (client, mut server) = test_client(test_config());
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();

    assert!(matches!(client.send("hello"), Err(ClientError::NoConnection(_))));
    assert!(matches!(client.ask_to_speak(), Err(ClientError::NoConnection(_))));
    assert!(matches!(
        client.get_user("alice"),
        Err(ClientError::Domain(doge_core::DomainError::NoRoom))
    ));

    enter_room(&mut server, &client, SELF_ID, vec![user(SELF_ID, SELF_NAME, Some(ROOM_ID))])
        .await
        .unwrap();

    client.whisper("psst @bob", ["bob-id"]).unwrap();
    let frame = server.expect_op("send_room_chat_msg").await.unwrap();
    assert_eq!(frame["d"]["whisperedTo"][0], "bob-id");
    assert_eq!(frame["d"]["tokens"][0]["v"], "psst");
    assert_eq!(frame["d"]["tokens"][1]["t"], "mention");
    assert_eq!(frame["d"]["tokens"][1]["v"], "bob");

    client.make_mod("bob-id").unwrap();
    let frame = server.expect_op("change_mod_status").await.unwrap();
    assert_eq!(frame["d"]["userId"], "bob-id");
    assert_eq!(frame["d"]["value"], true);

    client.set_listener(None).unwrap();
    let frame = server.expect_op("set_listener").await.unwrap();
    assert_eq!(frame["d"]["userId"], SELF_ID);

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_new_room_creator_known_only_as_preview() {
    let (client, mut server) = test_client(test_config());
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();

    // Before the roster refresh the room only carries previews
    server.push(&serde_json::json!({
        "op": "join_room_done",
        "d": { "room": room(ROOM_ID, SELF_ID, &[("bob-id", "Bob")]) }
    }));
    server.expect_op("get_current_room_users").await.unwrap();
    eventually(|| client.room().is_some_and(|room| room.members.contains("bob-id")))
        .await
        .unwrap();

    server.push(&new_room_creator("bob-id"));
    eventually(|| client.room().is_some_and(|room| room.creator_id == "bob-id"))
        .await
        .unwrap();

    server.push(&room_users(vec![
        user(SELF_ID, SELF_NAME, Some(ROOM_ID)),
        user("bob-id", "bob", Some(ROOM_ID)),
    ]));
    eventually(|| permissions(&client, "bob-id").is_admin()).await.unwrap();
    assert!(!permissions(&client, SELF_ID).is_admin());

    client.close().unwrap();
    session.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_new_room_creator_for_another_room_is_ignored() {
    let (client, mut server) = test_client(test_config());
    let mut changes = listen(&client, EventKind::PermissionChange);
    let session = spawn_session(&client);
    authenticate(&mut server, &client).await.unwrap();
    enter_room(
        &mut server,
        &client,
        "alice-id",
        vec![
            user("alice-id", "alice", Some(ROOM_ID)),
            user("bob-id", "bob", Some(ROOM_ID)),
        ],
    )
    .await
    .unwrap();

    server.push(&serde_json::json!({
        "op": "new_room_creator",
        "d": { "userId": "bob-id", "roomId": "elsewhere" }
    }));
    assert_silent(&mut changes).await.unwrap();
    assert!(permissions(&client, "alice-id").is_admin());
    assert_eq!(client.room().unwrap().creator_id, "alice-id");

    client.close().unwrap();
    session.await.unwrap().unwrap();
}
