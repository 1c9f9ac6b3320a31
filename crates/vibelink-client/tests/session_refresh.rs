mod support;

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;

use vibelink_client::events::SessionEvent;
use vibelink_client::http::ApiRequest;
use vibelink_client::local::MemoryState;
use vibelink_client::session::SessionManager;
use vibelink_shared::constants::TOKEN_REFRESH_PATH;
use vibelink_shared::error::ApiError;

use support::*;

const USER: &str = "/api/auth/user/";

fn session_over(fake: &Arc<FakeTransport>, access: &str) -> (SessionManager, Arc<MemoryState>) {
    let local = Arc::new(MemoryState::with_tokens(tokens(access, "refresh")));
    let session = SessionManager::new(fake.clone(), local.clone());
    session.rehydrate();
    (session, local)
}

#[tokio::test]
async fn stale_token_is_refreshed_and_request_replayed_once() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, USER, 401, json!({"detail": "Token expired"}))
        .reply(Method::GET, USER, 200, user_json(1, "ana"));
    fake.reply(Method::POST, TOKEN_REFRESH_PATH, 200, json!({"access": "fresh"}));
    let (session, local) = session_over(&fake, "stale");
    let mut events = session.subscribe();

    let response = session.execute(ApiRequest::get(USER)).await.unwrap();
    assert_eq!(response.status, 200);

    let calls = fake.requests_to(Method::GET, USER);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].bearer.as_deref(), Some("stale"));
    assert!(!calls[0].retried);
    assert_eq!(calls[1].bearer.as_deref(), Some("fresh"));
    assert!(calls[1].retried);
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 1);

    // The refresh token is kept when the server only rotates the access token.
    assert_eq!(stored_tokens(&local), Some(tokens("fresh", "refresh")));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
}

#[tokio::test]
async fn rejected_refresh_expires_the_session() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, USER, 401, json!({}));
    fake.reply(Method::POST, TOKEN_REFRESH_PATH, 401, json!({"detail": "Token is blacklisted"}));
    let (session, local) = session_over(&fake, "stale");
    let mut events = session.subscribe();

    let err = session.execute(ApiRequest::get(USER)).await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    assert!(!session.is_authenticated());
    assert_eq!(stored_tokens(&local), None);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
    assert_eq!(fake.count(Method::GET, USER), 1);
}

#[tokio::test]
async fn rejected_direct_refresh_call_is_fatal() {
    let fake = FakeTransport::new();
    fake.reply(Method::POST, TOKEN_REFRESH_PATH, 401, json!({}));
    let (session, local) = session_over(&fake, "access");
    let mut events = session.subscribe();

    let err = session.execute(ApiRequest::post(TOKEN_REFRESH_PATH)).await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    // No refresh of the refresh call.
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 1);
    assert_eq!(stored_tokens(&local), None);
    assert!(!session.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn second_401_after_replay_is_not_refreshed_again() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, USER, 401, json!({}));
    fake.reply(Method::POST, TOKEN_REFRESH_PATH, 200, json!({"access": "fresh", "refresh": "rotated"}));
    let (session, local) = session_over(&fake, "stale");

    let err = session.execute(ApiRequest::get(USER)).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 1);
    assert_eq!(fake.count(Method::GET, USER), 2);
    assert_eq!(stored_tokens(&local), Some(tokens("fresh", "rotated")));
}

#[tokio::test]
async fn unauthenticated_401_skips_refresh() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, USER, 401, json!({}));
    let session = SessionManager::new(fake.clone(), Arc::new(MemoryState::new()));
    session.rehydrate();

    let err = session.execute(ApiRequest::get(USER)).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 0);
    assert!(fake.requests_to(Method::GET, USER)[0].bearer.is_none());
}

#[tokio::test]
async fn network_failure_while_refreshing_expires_the_session() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, USER, 401, json!({}));
    fake.fail(
        Method::POST,
        TOKEN_REFRESH_PATH,
        ApiError::Transport("connection reset".into()),
    );
    let (session, local) = session_over(&fake, "stale");

    let err = session.execute(ApiRequest::get(USER)).await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    assert_eq!(stored_tokens(&local), None);
}

#[tokio::test]
async fn non_auth_failures_pass_through_untouched() {
    let fake = FakeTransport::new();
    fake.reply(Method::GET, "/api/posts/", 500, json!({"detail": "boom"}));
    let (session, _) = session_over(&fake, "access");

    let err = session.execute(ApiRequest::get("/api/posts/")).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            message: "boom".into()
        }
    );
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 0);
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn expired_session_resets_client_state() {
    let fake = FakeTransport::new();
    let (client, local) = signed_in(&fake).await;
    fake.reply(Method::GET, "/api/posts/", 401, json!({}));
    fake.reply(Method::POST, TOKEN_REFRESH_PATH, 401, json!({}));

    let err = client.load_feed().await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    let state = client.state();
    assert!(state.auth.user.is_none());
    assert!(state.auth.tokens.is_none());
    assert!(state.auth.is_initialized);
    assert!(state.auth.error.is_some());
    assert!(!state.posts.is_loading);
    assert_eq!(stored_tokens(&local), None);
}
