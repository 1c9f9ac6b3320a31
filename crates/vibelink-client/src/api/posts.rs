use vibelink_shared::error::ApiError;
use vibelink_shared::models::Post;
use vibelink_shared::protocol::{LikeToggle, Paginated, ShareToggle};
use vibelink_shared::types::{PostId, UserId};

use crate::api::page_request;
use crate::http::{ApiRequest, Attachment, MultipartForm};
use crate::session::SessionManager;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub content: String,
    pub hashtags: Vec<String>,
    pub image: Option<Attachment>,
}

impl NewPost {
    /// Hashtags travel as one JSON array string, not repeated parts.
    pub fn into_form(self) -> Result<MultipartForm, ApiError> {
        let mut form = MultipartForm::new()
            .text("content", self.content)
            .text("hashtags", serde_json::to_string(&self.hashtags)?);
        if let Some(image) = self.image {
            form = form.file("image", image);
        }
        Ok(form)
    }
}

pub async fn feed(session: &SessionManager, cursor: Option<&str>) -> Result<Paginated<Post>, ApiError> {
    session.call(page_request("/api/posts/", cursor)).await
}

/// Posts by followed users plus the viewer's own. Not paginated.
pub async fn follower_posts(session: &SessionManager) -> Result<Vec<Post>, ApiError> {
    session.call(ApiRequest::get("/api/posts/followers/")).await
}

pub async fn user_posts(
    session: &SessionManager,
    user: UserId,
    cursor: Option<&str>,
) -> Result<Paginated<Post>, ApiError> {
    let path = format!("/api/posts/user/{user}/");
    session.call(page_request(&path, cursor)).await
}

pub async fn create(session: &SessionManager, post: NewPost) -> Result<Post, ApiError> {
    let request = ApiRequest::post("/api/posts/").multipart(post.into_form()?);
    session.call(request).await
}

pub async fn delete(session: &SessionManager, post: PostId) -> Result<(), ApiError> {
    session
        .call_unit(ApiRequest::delete(format!("/api/posts/{post}/")))
        .await
}

pub async fn toggle_like(session: &SessionManager, post: PostId) -> Result<LikeToggle, ApiError> {
    session
        .call(ApiRequest::post(format!("/api/posts/{post}/like/")))
        .await
}

pub async fn toggle_share(session: &SessionManager, post: PostId) -> Result<ShareToggle, ApiError> {
    session
        .call(ApiRequest::post(format!("/api/posts/{post}/share/")))
        .await
}
