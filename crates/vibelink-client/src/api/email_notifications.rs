//! Email-delivery notifications (`/api/notifications/`).

use vibelink_shared::error::ApiError;
use vibelink_shared::models::EmailNotification;
use vibelink_shared::protocol::{Ack, EmailFilter, NewEmailNotification, Paginated};
use vibelink_shared::types::EmailNotificationId;

use crate::http::ApiRequest;
use crate::session::SessionManager;

/// One page of the filtered list. `next`/`previous` come back as page
/// numbers, not URLs.
pub async fn list(
    session: &SessionManager,
    filter: &EmailFilter,
) -> Result<Paginated<EmailNotification>, ApiError> {
    let request = ApiRequest::get("/api/notifications/list/").query(filter.to_query());
    session.call(request).await
}

pub async fn detail(session: &SessionManager, id: EmailNotificationId) -> Result<EmailNotification, ApiError> {
    session
        .call(ApiRequest::get(format!("/api/notifications/{id}/")))
        .await
}

pub async fn mark_read(session: &SessionManager, id: EmailNotificationId) -> Result<Ack, ApiError> {
    session
        .call(ApiRequest::post(format!("/api/notifications/{id}/read/")))
        .await
}

pub async fn mark_all_read(session: &SessionManager) -> Result<Ack, ApiError> {
    session
        .call(ApiRequest::post("/api/notifications/read-all/"))
        .await
}

pub async fn send_test(session: &SessionManager) -> Result<Ack, ApiError> {
    session
        .call(ApiRequest::post("/api/notifications/send-test/"))
        .await
}

pub async fn create(
    session: &SessionManager,
    notification: &NewEmailNotification,
) -> Result<EmailNotification, ApiError> {
    let request = ApiRequest::post("/api/notifications/create/").json(notification)?;
    session.call(request).await
}
