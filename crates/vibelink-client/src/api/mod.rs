//! Typed REST endpoint wrappers.
//!
//! Each sub-module groups the calls of one backend app. Functions take the
//! [`crate::session::SessionManager`] so every authenticated call shares the
//! refresh-and-replay handling; they never touch application state.

pub mod auth;
pub mod chat;
pub mod email_notifications;
pub mod notifications;
pub mod posts;
pub mod search;
pub mod settings;
pub mod social;

use crate::http::ApiRequest;

/// First page at `path`, or the absolute `next` cursor when one is given.
pub(crate) fn page_request(path: &str, cursor: Option<&str>) -> ApiRequest {
    ApiRequest::get(cursor.unwrap_or(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_overrides_first_page_path() {
        assert_eq!(page_request("/api/posts/", None).target, "/api/posts/");
        assert_eq!(
            page_request("/api/posts/", Some("http://h/api/posts/?page=2")).target,
            "http://h/api/posts/?page=2"
        );
    }
}
