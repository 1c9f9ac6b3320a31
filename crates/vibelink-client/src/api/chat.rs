use vibelink_shared::error::ApiError;
use vibelink_shared::models::{Conversation, Message};
use vibelink_shared::protocol::{Paginated, SendMessageRequest};
use vibelink_shared::types::{ConversationId, UserId};

use crate::api::page_request;
use crate::http::ApiRequest;
use crate::session::SessionManager;

pub async fn conversations(
    session: &SessionManager,
    cursor: Option<&str>,
) -> Result<Paginated<Conversation>, ApiError> {
    session
        .call(page_request("/api/chat/conversations/", cursor))
        .await
}

pub async fn conversation(session: &SessionManager, id: ConversationId) -> Result<Conversation, ApiError> {
    session
        .call(ApiRequest::get(format!("/api/chat/conversations/{id}/")))
        .await
}

/// Newest page of messages, newest first. `cursor` is a `previous` URL
/// when walking back through history.
pub async fn messages(
    session: &SessionManager,
    id: ConversationId,
    cursor: Option<&str>,
) -> Result<Paginated<Message>, ApiError> {
    let path = format!("/api/chat/conversations/{id}/messages/");
    session.call(page_request(&path, cursor)).await
}

pub async fn send(session: &SessionManager, id: ConversationId, content: &str) -> Result<Message, ApiError> {
    let request = ApiRequest::post(format!("/api/chat/conversations/{id}/messages/")).json(
        &SendMessageRequest {
            content: content.to_string(),
        },
    )?;
    session.call(request).await
}

/// Existing conversation with `user`, or a new one.
pub async fn start(session: &SessionManager, user: UserId) -> Result<Conversation, ApiError> {
    session
        .call(ApiRequest::post(format!("/api/chat/conversations/start/{user}/")))
        .await
}

pub async fn mark_read(session: &SessionManager, id: ConversationId) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::post(format!("/api/chat/conversations/{id}/read/")))
        .await
}
