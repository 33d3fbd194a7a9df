use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::debug;

use cadet_shared::{Id, Message, MessageContact, NewMessage, Validate};

use super::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::session::AuthUser;

pub async fn contacts(State(state): State<AppState>, user: AuthUser) -> Json<Vec<MessageContact>> {
    let store = state.store.read().await;
    Json(store.message_contacts(user.user_id))
}

/// Opening a conversation marks the contact's messages to the caller read
/// before returning the thread, oldest first.
pub async fn conversation(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(contact_id): ApiPath<Id>,
) -> Json<Vec<Message>> {
    let mut store = state.store.write().await;
    store.mark_messages_read(contact_id, user.user_id);
    Json(
        store
            .messages_between(user.user_id, contact_id)
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(new): ApiJson<NewMessage>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    new.validate().map_err(|e| ApiError::Validation(e.message))?;

    let message = state
        .store
        .write()
        .await
        .create_message(new, user.user_id, Utc::now())?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    ApiPath(sender_id): ApiPath<Id>,
) -> Json<serde_json::Value> {
    let flipped = state
        .store
        .write()
        .await
        .mark_messages_read(sender_id, user.user_id);
    debug!(from = sender_id, to = user.user_id, flipped, "Conversation marked read");
    Json(serde_json::json!({ "message": "Messages marked as read" }))
}
