use vibelink_shared::error::ApiError;
use vibelink_shared::models::DiscoverUser;
use vibelink_shared::protocol::{
    Ack, AiRecommendationsPage, DiscoverQuery, FollowToggle, Paginated,
};
use vibelink_shared::types::UserId;

use crate::http::ApiRequest;
use crate::session::SessionManager;

pub async fn discover(
    session: &SessionManager,
    query: &DiscoverQuery,
) -> Result<Paginated<DiscoverUser>, ApiError> {
    let request = ApiRequest::get("/api/social/discover/").query(query.to_query());
    session.call(request).await
}

pub async fn top_matches(session: &SessionManager) -> Result<Vec<DiscoverUser>, ApiError> {
    session
        .call(ApiRequest::get("/api/social/top-matches/"))
        .await
}

pub async fn ai_recommendations(
    session: &SessionManager,
    page: u32,
    per_page: u32,
) -> Result<AiRecommendationsPage, ApiError> {
    let request = ApiRequest::get("/api/social/ai-recommendations/").query(vec![
        ("page".to_string(), page.to_string()),
        ("per_page".to_string(), per_page.to_string()),
    ]);
    session.call(request).await
}

/// Drop the server's cached recommendations so the next fetch recomputes.
pub async fn invalidate_ai_cache(session: &SessionManager) -> Result<Ack, ApiError> {
    session
        .call(ApiRequest::post("/api/social/ai-recommendations/invalidate/"))
        .await
}

pub async fn followers(session: &SessionManager, user: UserId) -> Result<Vec<DiscoverUser>, ApiError> {
    session
        .call(ApiRequest::get(format!("/api/social/followers/{user}/")))
        .await
}

pub async fn following(session: &SessionManager, user: UserId) -> Result<Vec<DiscoverUser>, ApiError> {
    session
        .call(ApiRequest::get(format!("/api/social/following/{user}/")))
        .await
}

pub async fn profile(session: &SessionManager, user: UserId) -> Result<DiscoverUser, ApiError> {
    session
        .call(ApiRequest::get(format!("/api/social/user/{user}/")))
        .await
}

pub async fn toggle_follow(session: &SessionManager, user: UserId) -> Result<FollowToggle, ApiError> {
    session
        .call(ApiRequest::post(format!("/api/social/follow/{user}/")))
        .await
}
