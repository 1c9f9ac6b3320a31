use vibelink_shared::error::ApiError;
use vibelink_shared::models::Settings;
use vibelink_shared::protocol::SettingsPayload;

use crate::http::ApiRequest;
use crate::session::SessionManager;

pub async fn fetch(session: &SessionManager) -> Result<Settings, ApiError> {
    let payload: SettingsPayload = session.call(ApiRequest::get("/api/settings/")).await?;
    Ok(payload.into())
}

/// PATCH the flat form; the server answers with the full record.
pub async fn update(session: &SessionManager, settings: &Settings) -> Result<Settings, ApiError> {
    let request = ApiRequest::patch("/api/settings/").json(&SettingsPayload::from(settings))?;
    let payload: SettingsPayload = session.call(request).await?;
    Ok(payload.into())
}
