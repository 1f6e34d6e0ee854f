//! Chat access, listing, history, and deletion.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use courier_database::{Chat, ChatMessage};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{util::require_bearer, ApiError, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AccessChatRequest {
    /// Public id of the user to open a chat with.
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub id: String,
    pub participants: Vec<String>,
    pub last_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.public_id.clone(),
            participants: chat
                .participant_public_ids()
                .into_iter()
                .map(str::to_string)
                .collect(),
            last_message: chat.last_message,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatsResponse {
    pub chats: Vec<ChatResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub text: String,
    pub created_at: String,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.public_id,
            chat_id: message.chat_public_id,
            sender_id: message.sender_public_id,
            text: message.text,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesResponse {
    pub messages: Vec<MessageResponse>,
}

#[utoipa::path(
    post,
    path = "/api/chats",
    tag = "Chats",
    security(("bearerAuth" = [])),
    request_body = AccessChatRequest,
    responses(
        (status = 200, description = "Existing or newly created chat", body = ChatResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Peer user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn access_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AccessChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let peer = state
        .users()
        .find_by_public_id(&payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    if peer.id == user.id {
        return Err(ApiError::bad_request("cannot open a chat with yourself"));
    }

    let chat = state.chats().find_or_create(user.id, peer.id).await?;

    Ok(Json(chat.into()))
}

#[utoipa::path(
    get,
    path = "/api/chats",
    tag = "Chats",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Caller's chats, most recently updated first", body = ChatsResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ChatsResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let chats = state.chats().find_by_user(user.id).await?;

    Ok(Json(ChatsResponse {
        chats: chats.into_iter().map(ChatResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/chats/{chat_id}/messages",
    tag = "Chats",
    security(("bearerAuth" = [])),
    params(("chat_id" = String, Path, description = "Chat public id")),
    responses(
        (status = 200, description = "Message history, oldest first", body = MessagesResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not a participant", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let chat = state
        .chats()
        .find_by_public_id(&chat_id)
        .await?
        .ok_or_else(|| ApiError::not_found("chat not found"))?;

    if !chat.is_participant(&user.public_id) {
        return Err(ApiError::forbidden("not a participant of this chat"));
    }

    let messages = state.messages().list_by_chat(chat.id).await?;

    Ok(Json(MessagesResponse {
        messages: messages.into_iter().map(MessageResponse::from).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/chats/{chat_id}",
    tag = "Chats",
    security(("bearerAuth" = [])),
    params(("chat_id" = String, Path, description = "Chat public id")),
    responses(
        (status = 200, description = "Chat and all its messages deleted"),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not a participant", body = crate::error::ErrorResponse),
        (status = 404, description = "Chat not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<(), ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.authenticate(&token).await?;

    let chat = state
        .chats()
        .find_by_public_id(&chat_id)
        .await?
        .ok_or_else(|| ApiError::not_found("chat not found"))?;

    if !chat.is_participant(&user.public_id) {
        return Err(ApiError::forbidden("not allowed to delete this chat"));
    }

    state.chats().delete_cascade(chat.id).await?;

    Ok(())
}
