use vibelink_shared::error::ApiError;
use vibelink_shared::models::SearchResult;
use vibelink_shared::protocol::SearchResponse;

use crate::http::ApiRequest;
use crate::session::SessionManager;

/// Users, posts and hashtags matching `query`.
pub async fn search(session: &SessionManager, query: &str) -> Result<Vec<SearchResult>, ApiError> {
    let request = ApiRequest::get("/api/social/search/")
        .query(vec![("q".to_string(), query.to_string())]);
    let response: SearchResponse = session.call(request).await?;
    Ok(response.results)
}
