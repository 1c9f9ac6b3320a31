//! In-app social notifications (`/api/social/notifications/`).

use vibelink_shared::error::ApiError;
use vibelink_shared::models::Notification;
use vibelink_shared::protocol::Paginated;
use vibelink_shared::types::NotificationId;

use crate::http::ApiRequest;
use crate::session::SessionManager;

pub async fn list(session: &SessionManager) -> Result<Paginated<Notification>, ApiError> {
    session
        .call(ApiRequest::get("/api/social/notifications/"))
        .await
}

pub async fn mark_read(session: &SessionManager, id: NotificationId) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::post(format!("/api/social/notifications/{id}/read/")))
        .await
}

pub async fn mark_all_read(session: &SessionManager) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::post("/api/social/notifications/read-all/"))
        .await
}

pub async fn delete(session: &SessionManager, id: NotificationId) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::delete(format!("/api/social/notifications/{id}/delete/")))
        .await
}

pub async fn delete_all(session: &SessionManager) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::delete("/api/social/notifications/delete-all/"))
        .await
}
