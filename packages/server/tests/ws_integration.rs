//! End-to-end tests: a real axum server on an ephemeral port, real
//! WebSocket clients talking the JSON frame protocol.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message as WsMessage,
};

use palaver_server::{
    domain::{Chat, ChatId, ChatKind, MessageStore, UserId},
    infrastructure::{ConnectionRegistry, InMemoryMessageStore, PresenceTracker},
    ui::{AppState, app},
    usecase::{ChatBroadcaster, MarkReadUseCase, SendMessageUseCase},
};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start a server with chat 7 (members 1, 2, 3) and return its address.
async fn spawn_server() -> SocketAddr {
    let store = Arc::new(InMemoryMessageStore::new());
    store
        .add_chat(
            Chat {
                id: ChatId(7),
                name: "chat seven".to_string(),
                kind: ChatKind::Group,
            },
            vec![UserId(1), UserId(2), UserId(3)],
        )
        .await;
    let store: Arc<dyn MessageStore> = store;

    let registry = Arc::new(ConnectionRegistry::new());
    let presence = Arc::new(PresenceTracker::new());
    let broadcaster = Arc::new(ChatBroadcaster::new(registry.clone(), store.clone()));
    let state = Arc::new(AppState {
        registry,
        presence,
        send_message_usecase: Arc::new(SendMessageUseCase::new(store.clone())),
        mark_read_usecase: Arc::new(MarkReadUseCase::new(store.clone())),
        broadcaster,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state))
            .await
            .expect("test server failed");
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("failed to connect");
    ws
}

async fn send_json(ws: &mut WsClient, frame: serde_json::Value) {
    ws.send(WsMessage::Text(frame.to_string().into()))
        .await
        .expect("failed to send frame");
}

/// Next JSON frame from the server, failing the test after 2 seconds.
async fn next_frame(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed unexpectedly")
            .expect("transport error");
        if let WsMessage::Text(text) = msg {
            return serde_json::from_str(&text).expect("server sent invalid JSON");
        }
    }
}

async fn assert_no_frame(ws: &mut WsClient) {
    let result = tokio::time::timeout(Duration::from_millis(300), ws.next()).await;
    assert!(result.is_err(), "expected silence, got {:?}", result);
}

/// Frames on one connection are handled in order, so a pong confirms the
/// previously sent auth frame has been processed and the connection is
/// registered.
async fn sync_with_ping(ws: &mut WsClient) {
    send_json(ws, serde_json::json!({"type": "ping"})).await;
    let pong = next_frame(ws).await;
    assert_eq!(pong["type"], "pong");
}

async fn connect_and_auth(addr: SocketAddr, user_id: i64) -> WsClient {
    let mut ws = connect(addr).await;
    send_json(&mut ws, serde_json::json!({"type": "auth", "data": {"userId": user_id}})).await;
    sync_with_ping(&mut ws).await;
    ws
}

#[tokio::test]
async fn message_fanout_reaches_members_except_sender() {
    let addr = spawn_server().await;
    let mut alice = connect_and_auth(addr, 1).await;
    let mut bob = connect_and_auth(addr, 2).await;
    let mut charlie = connect_and_auth(addr, 3).await;

    send_json(
        &mut alice,
        serde_json::json!({"type": "message", "data": {"chatId": 7, "content": "hi"}}),
    )
    .await;

    for ws in [&mut bob, &mut charlie] {
        let frame = next_frame(ws).await;
        assert_eq!(frame["type"], "message");
        assert_eq!(frame["data"]["chatId"], 7);
        assert_eq!(frame["data"]["senderId"], 1);
        assert_eq!(frame["data"]["content"], "hi");
        assert_eq!(frame["data"]["status"], "sent");
    }

    // The sender's own connections get nothing back.
    assert_no_frame(&mut alice).await;
}

#[tokio::test]
async fn typing_events_are_relayed_to_other_members() {
    let addr = spawn_server().await;
    let mut alice = connect_and_auth(addr, 1).await;
    let mut bob = connect_and_auth(addr, 2).await;

    send_json(
        &mut alice,
        serde_json::json!({
            "type": "typing",
            "data": {"chatId": 7, "userId": 1, "username": "alice", "isTyping": true},
        }),
    )
    .await;

    let frame = next_frame(&mut bob).await;
    assert_eq!(frame["type"], "typing");
    assert_eq!(frame["data"]["username"], "alice");
    assert_eq!(frame["data"]["isTyping"], true);

    send_json(
        &mut alice,
        serde_json::json!({
            "type": "typing",
            "data": {"chatId": 7, "userId": 1, "username": "alice", "isTyping": false},
        }),
    )
    .await;

    let frame = next_frame(&mut bob).await;
    assert_eq!(frame["data"]["isTyping"], false);
    assert_no_frame(&mut alice).await;
}

#[tokio::test]
async fn second_auth_frame_is_ignored() {
    let addr = spawn_server().await;
    let mut alice = connect_and_auth(addr, 1).await;

    // Bob authenticates, then tries to rebind his connection to user 1.
    // If that second auth took effect he would be excluded from alice's
    // broadcast below as her own connection.
    let mut bob = connect_and_auth(addr, 2).await;
    send_json(&mut bob, serde_json::json!({"type": "auth", "data": {"userId": 1}})).await;
    sync_with_ping(&mut bob).await;

    send_json(
        &mut alice,
        serde_json::json!({"type": "message", "data": {"chatId": 7, "content": "still there?"}}),
    )
    .await;

    let frame = next_frame(&mut bob).await;
    assert_eq!(frame["data"]["content"], "still there?");
}

#[tokio::test]
async fn bad_frames_are_dropped_without_closing_the_connection() {
    let addr = spawn_server().await;
    let mut bob = connect_and_auth(addr, 2).await;
    let mut stranger = connect(addr).await;

    // Not JSON, unknown type, and an application frame before auth: all
    // dropped, none of them fatal, and none reach chat members.
    send_json(
        &mut stranger,
        serde_json::json!({"type": "message", "data": {"chatId": 7, "content": "sneaky"}}),
    )
    .await;
    stranger
        .send(WsMessage::Text("this is not json".into()))
        .await
        .expect("failed to send garbage");
    send_json(&mut stranger, serde_json::json!({"type": "subscribe", "data": {}})).await;

    // The connection still answers the heartbeat afterwards.
    sync_with_ping(&mut stranger).await;
    assert_no_frame(&mut bob).await;
}

#[tokio::test]
async fn fetching_messages_marks_them_read_for_the_reader() {
    let addr = spawn_server().await;
    let mut alice = connect_and_auth(addr, 1).await;
    send_json(
        &mut alice,
        serde_json::json!({"type": "message", "data": {"chatId": 7, "content": "read me"}}),
    )
    .await;
    sync_with_ping(&mut alice).await;

    let url = |user: i64| format!("http://{}/api/chats/7/messages?userId={}", addr, user);

    // The sender fetching her own chat does not mark her message read.
    let messages: serde_json::Value = reqwest::get(url(1))
        .await
        .expect("GET failed")
        .json()
        .await
        .expect("invalid JSON body");
    assert_eq!(messages[0]["status"], "sent");

    // Bob fetching the chat advances it to read; repeating is a no-op.
    for _ in 0..2 {
        let messages: serde_json::Value = reqwest::get(url(2))
            .await
            .expect("GET failed")
            .json()
            .await
            .expect("invalid JSON body");
        assert_eq!(messages[0]["status"], "read");
        assert_eq!(messages[0]["content"], "read me");
    }
}

#[tokio::test]
async fn post_message_surfaces_validation_errors() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = |chat: i64| format!("http://{}/api/chats/{}/messages", addr, chat);

    let created = client
        .post(url(7))
        .json(&serde_json::json!({"senderId": 1, "content": "via rest"}))
        .send()
        .await
        .expect("POST failed");
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    let body: serde_json::Value = created.json().await.expect("invalid JSON body");
    assert_eq!(body["status"], "sent");

    let empty = client
        .post(url(7))
        .json(&serde_json::json!({"senderId": 1, "content": "   "}))
        .send()
        .await
        .expect("POST failed");
    assert_eq!(empty.status(), reqwest::StatusCode::BAD_REQUEST);

    let missing_chat = client
        .post(url(404))
        .json(&serde_json::json!({"senderId": 1, "content": "hello?"}))
        .send()
        .await
        .expect("POST failed");
    assert_eq!(missing_chat.status(), reqwest::StatusCode::NOT_FOUND);
}
