//! WebSocket connection session.
//!
//! One session per socket, moving through `Unauthenticated -> Authenticated
//! -> Closed`. Inbound frames from a single connection are processed in
//! arrival order by one reader task; outbound frames go through an unbounded
//! channel drained by one writer task, so broadcasts from other handlers
//! never block on this socket. A malformed or unexpected frame is logged and
//! dropped; it never closes the connection.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::UserId;
use crate::infrastructure::dto::websocket::{ClientFrame, ServerFrame};
use crate::infrastructure::registry::{ConnectionId, OutboundSender};

use super::super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns the writer task: frames queued for this connection are drained
/// from the channel and pushed onto the socket until either side closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let connection_id = ConnectionId::generate();

    tracing::info!("connection {} accepted", connection_id);

    let mut send_task = pusher_loop(rx, sender);

    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        // `None` until the first valid auth frame arrives.
        let mut session_user: Option<UserId> = None;

        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    // Transport error: treated like a clean close.
                    tracing::warn!("transport error on connection {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let frame = match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!(
                                "dropping malformed frame on connection {}: {}",
                                connection_id,
                                e
                            );
                            continue;
                        }
                    };
                    handle_frame(
                        frame,
                        &state_for_recv,
                        &tx,
                        connection_id,
                        &mut session_user,
                    )
                    .await;
                }
                Message::Close(_) => {
                    tracing::info!("connection {} closed by peer", connection_id);
                    break;
                }
                // Transport-level ping/pong is answered by axum itself; the
                // application-level heartbeat is a JSON frame.
                Message::Ping(_) | Message::Pong(_) => {}
                _ => {}
            }
        }
    });

    // If either task finishes, tear the other one down.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // No-op when the connection never authenticated.
    state.registry.unregister(connection_id).await;
    tracing::info!("connection {} closed and unregistered", connection_id);
}

async fn handle_frame(
    frame: ClientFrame,
    state: &Arc<AppState>,
    tx: &OutboundSender,
    connection_id: ConnectionId,
    session_user: &mut Option<UserId>,
) {
    match frame {
        ClientFrame::Ping => {
            // Liveness only; allowed in every state.
            match serde_json::to_string(&ServerFrame::Pong) {
                Ok(pong) => {
                    let _ = tx.send(pong);
                }
                Err(e) => tracing::error!("failed to serialize pong: {}", e),
            }
        }

        ClientFrame::Auth(auth) => {
            if let Some(user_id) = session_user {
                tracing::warn!(
                    "ignoring repeated auth frame on connection {} (already bound to user {})",
                    connection_id,
                    user_id
                );
                return;
            }
            // The claimed id was established by the HTTP session before the
            // upgrade; it is trusted as-is here.
            *session_user = Some(auth.user_id);
            state
                .registry
                .register(auth.user_id, connection_id, tx.clone())
                .await;
            tracing::info!(
                "connection {} authenticated as user {}",
                connection_id,
                auth.user_id
            );
        }

        ClientFrame::Message(payload) => {
            let Some(user_id) = *session_user else {
                tracing::warn!(
                    "ignoring message frame from unauthenticated connection {}",
                    connection_id
                );
                return;
            };
            match state
                .send_message_usecase
                .execute(payload.chat_id, user_id, payload.content, payload.file_url)
                .await
            {
                Ok(message) => {
                    let chat_id = message.chat_id;
                    state
                        .broadcaster
                        .broadcast(chat_id, &ServerFrame::Message(message), Some(user_id))
                        .await;
                }
                // Fire-and-forget path: nothing to report back over.
                Err(e) => tracing::warn!("dropping message from user {}: {}", user_id, e),
            }
        }

        ClientFrame::Typing(payload) => {
            let Some(user_id) = *session_user else {
                tracing::warn!(
                    "ignoring typing frame from unauthenticated connection {}",
                    connection_id
                );
                return;
            };
            let chat_id = payload.chat_id;
            state
                .presence
                .set_typing(chat_id, &payload.username, payload.is_typing)
                .await;
            state
                .broadcaster
                .broadcast(chat_id, &ServerFrame::Typing(payload), Some(user_id))
                .await;
        }
    }
}
