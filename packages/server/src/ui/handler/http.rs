//! HTTP API endpoint handlers.
//!
//! The synchronous fallback paths of the realtime core: fetching a chat's
//! messages doubles as the bulk read-receipt trigger, and posting a message
//! is the REST alternative to the `message` frame (persist only, no
//! fan-out). Validation errors surface here as status codes, unlike the
//! fire-and-forget socket path.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::domain::{ChatId, Message, StoreError, UserId};
use crate::usecase::SendMessageError;

use super::super::state::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadQuery {
    /// The reader whose catch-up this fetch triggers.
    pub user_id: UserId,
}

/// Get a chat's messages and mark everything another user sent as read.
pub async fn get_chat_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Query(query): Query<ReadQuery>,
) -> Result<Json<Vec<Message>>, StatusCode> {
    let chat_id = ChatId(chat_id);
    match state.mark_read_usecase.execute(chat_id, query.user_id).await {
        Ok(messages) => Ok(Json(messages)),
        Err(StoreError::ChatNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("failed to load messages for chat {}: {}", chat_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageBody {
    pub sender_id: UserId,
    pub content: String,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Send a message over the synchronous path.
pub async fn post_chat_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Json(body): Json<PostMessageBody>,
) -> Result<(StatusCode, Json<Message>), StatusCode> {
    match state
        .send_message_usecase
        .execute(ChatId(chat_id), body.sender_id, body.content, body.file_url)
        .await
    {
        Ok(message) => Ok((StatusCode::CREATED, Json(message))),
        Err(SendMessageError::EmptyMessage) => Err(StatusCode::BAD_REQUEST),
        Err(SendMessageError::ChatNotFound(_)) => Err(StatusCode::NOT_FOUND),
        Err(SendMessageError::Store(e)) => {
            tracing::error!("failed to persist message in chat {}: {}", chat_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
