mod support;

use std::time::Duration;

use reqwest::Method;
use serde_json::json;

use vibelink_client::local::LocalState;
use vibelink_client::state::settings::{SettingsEdit, SettingsSource};
use vibelink_shared::constants::TOKEN_REFRESH_PATH;
use vibelink_shared::error::ApiError;
use vibelink_shared::models::Settings;
use vibelink_shared::protocol::{DiscoverQuery, EmailFilter, SettingsPayload};
use vibelink_shared::types::{ConversationId, MessageId, PostId, UserId};

use support::*;

const CONVO: ConversationId = ConversationId(7);
const MESSAGES: &str = "/api/chat/conversations/7/messages/";

async fn open_conversation(client: &vibelink_client::Client, fake: &FakeTransport) {
    fake.reply(
        Method::GET,
        MESSAGES,
        200,
        page(vec![message_json(2, 9, 2), message_json(1, 1, 1)], None, None),
    );
    client.open_conversation(CONVO).await.unwrap();
}

fn message_ids(client: &vibelink_client::Client) -> Vec<i64> {
    client.store().read(|s| s.chat.messages.items.iter().map(|m| m.id.0).collect())
}

#[tokio::test]
async fn sent_message_shows_immediately_and_is_replaced_on_success() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    open_conversation(&client, &fake).await;

    let gate = fake.hold(Method::POST, MESSAGES);
    fake.reply(Method::POST, MESSAGES, 201, message_json(3, 1, 3));
    let sender = client.clone();
    let task = tokio::spawn(async move { sender.send_message(CONVO, "  hello  ").await });

    wait_for(&client, |s| s.chat.provisional.len() == 1).await;
    let shown: Vec<(i64, String)> = client.store().read(|s| {
        s.chat
            .visible_messages()
            .iter()
            .map(|m| (m.id.0, m.content.clone()))
            .collect()
    });
    assert_eq!(shown.len(), 3);
    assert!(shown[2].0 < 0);
    assert_eq!(shown[2].1, "hello");

    gate.notify_one();
    let sent = task.await.unwrap().unwrap();

    assert_eq!(sent.id, MessageId(3));
    assert!(client.store().read(|s| s.chat.provisional.is_empty()));
    assert_eq!(message_ids(&client), vec![1, 2, 3]);
    assert_eq!(
        fake.requests_to(Method::POST, MESSAGES)[0].body,
        vibelink_client::http::RequestBody::Json(json!({"content": "hello"}))
    );
}

#[tokio::test]
async fn failed_send_drops_only_the_placeholder() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    open_conversation(&client, &fake).await;
    fake.reply(Method::POST, MESSAGES, 500, json!({"detail": "queue full"}));

    let err = client.send_message(CONVO, "hello").await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 500, .. }));
    let state = client.state();
    assert!(state.chat.provisional.is_empty());
    assert_eq!(state.chat.visible_messages().len(), 2);
    assert!(state.chat.error.is_some());
    assert!(state.auth.tokens.is_some());
}

#[tokio::test]
async fn blank_message_is_rejected_locally() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;

    let err = client.send_message(CONVO, "   ").await.unwrap_err();

    match err {
        ApiError::Validation(fields) => assert!(fields.0.contains_key("content")),
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert_eq!(fake.count(Method::POST, MESSAGES), 0);
    assert!(client.store().read(|s| s.chat.provisional.is_empty()));
}

#[tokio::test]
async fn older_messages_are_prepended_in_order() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    let older = "http://127.0.0.1:8000/api/chat/conversations/7/messages/?page=2";
    fake.reply(
        Method::GET,
        MESSAGES,
        200,
        page(vec![message_json(4, 9, 4), message_json(3, 1, 3)], None, Some(older)),
    );
    fake.reply(
        Method::GET,
        "/api/chat/conversations/7/messages/?page=2",
        200,
        page(vec![message_json(2, 9, 2), message_json(1, 1, 1)], None, None),
    );
    client.open_conversation(CONVO).await.unwrap();
    assert_eq!(message_ids(&client), vec![3, 4]);

    assert!(client.load_older_messages().await.unwrap());
    assert_eq!(message_ids(&client), vec![1, 2, 3, 4]);
    assert!(!client.store().read(|s| s.chat.messages.has_previous()));

    assert!(!client.load_older_messages().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn message_polling_merges_until_scope_closes() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(
        Method::GET,
        MESSAGES,
        200,
        page(vec![message_json(2, 9, 2), message_json(1, 1, 1)], None, None),
    )
    .reply(
        Method::GET,
        MESSAGES,
        200,
        page(
            vec![message_json(5, 9, 5), message_json(2, 9, 2), message_json(1, 1, 1)],
            None,
            None,
        ),
    );
    client.open_conversation(CONVO).await.unwrap();
    assert_eq!(message_ids(&client), vec![1, 2]);

    let scope = client.watch_messages(CONVO);
    tokio::time::sleep(Duration::from_secs(31)).await;
    wait_for(&client, |s| s.chat.messages.items.len() == 3).await;
    assert_eq!(message_ids(&client), vec![1, 2, 5]);

    let polled = fake.count(Method::GET, MESSAGES);
    drop(scope);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(fake.count(Method::GET, MESSAGES), polled);
}

#[tokio::test]
async fn like_flips_immediately_then_takes_server_counts() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(Method::GET, "/api/posts/", 200, page(vec![post_json(5, 2, 3, false)], None, None));
    client.load_feed().await.unwrap();

    let gate = fake.hold(Method::POST, "/api/posts/5/like/");
    fake.reply(Method::POST, "/api/posts/5/like/", 200, json!({"is_liked": true, "likes_count": 10}));
    let liker = client.clone();
    let task = tokio::spawn(async move { liker.toggle_like(PostId(5)).await });

    wait_for(&client, |s| s.posts.feed.items[0].is_liked).await;
    assert_eq!(client.store().read(|s| s.posts.feed.items[0].likes_count), 4);

    gate.notify_one();
    task.await.unwrap().unwrap();
    let post = client.store().read(|s| s.posts.feed.items[0].clone());
    assert!(post.is_liked);
    assert_eq!(post.likes_count, 10);
}

#[tokio::test]
async fn failed_like_rolls_back() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(Method::GET, "/api/posts/", 200, page(vec![post_json(5, 2, 3, true)], None, None));
    client.load_feed().await.unwrap();
    fake.reply(Method::POST, "/api/posts/5/like/", 503, json!({}));

    assert!(client.toggle_like(PostId(5)).await.is_err());

    let state = client.state();
    assert!(state.posts.feed.items[0].is_liked);
    assert_eq!(state.posts.feed.items[0].likes_count, 3);
    assert!(state.posts.error.is_some());
}

#[tokio::test]
async fn feed_load_more_runs_once_at_a_time() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    let next = "http://127.0.0.1:8000/api/posts/?page=2";
    fake.reply(Method::GET, "/api/posts/", 200, page(vec![post_json(1, 2, 0, false)], Some(next), None));
    fake.reply(Method::GET, "/api/posts/?page=2", 200, page(vec![post_json(2, 2, 0, false)], None, None));
    client.load_feed().await.unwrap();

    let gate = fake.hold(Method::GET, "/api/posts/?page=2");
    let loader = client.clone();
    let first = tokio::spawn(async move { loader.load_more_feed().await });
    wait_for_requests(&fake, Method::GET, "/api/posts/?page=2", 1).await;

    assert_eq!(client.load_more_feed().await, Ok(false));

    gate.notify_one();
    assert_eq!(first.await.unwrap(), Ok(true));
    assert_eq!(fake.count(Method::GET, "/api/posts/?page=2"), 1);
    let ids: Vec<i64> = client.store().read(|s| s.posts.feed.items.iter().map(|p| p.id.0).collect());
    assert_eq!(ids, vec![1, 2]);

    // No further page.
    assert_eq!(client.load_more_feed().await, Ok(false));
}

#[tokio::test]
async fn follow_updates_every_view_of_the_user() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(
        Method::GET,
        "/api/social/discover/",
        200,
        page(vec![candidate_json(3, false, 5), candidate_json(4, false, 1)], None, None),
    );
    fake.reply(Method::GET, "/api/posts/", 200, page(vec![post_json(8, 3, 0, false)], None, None));
    fake.reply(Method::POST, "/api/social/follow/3/", 200, json!({"is_following": true, "followers_count": 6}));
    client.load_discover(DiscoverQuery::default()).await.unwrap();
    client.load_feed().await.unwrap();

    let result = client.toggle_follow(UserId(3)).await.unwrap();

    assert!(result.is_following);
    let state = client.state();
    let remaining: Vec<i64> = state.social.discover.iter().map(|u| u.id.0).collect();
    assert_eq!(remaining, vec![4]);
    assert!(state.social.follow_loading_ids.is_empty());
    assert!(state.posts.feed.items[0].user.is_following);
}

#[tokio::test]
async fn failed_follow_restores_the_card() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(
        Method::GET,
        "/api/social/discover/",
        200,
        page(vec![candidate_json(4, false, 1)], None, None),
    );
    fake.reply(Method::POST, "/api/social/follow/4/", 500, json!({}));
    client.load_discover(DiscoverQuery::default()).await.unwrap();

    assert!(client.toggle_follow(UserId(4)).await.is_err());

    let state = client.state();
    let user = &state.social.discover[0];
    assert!(!user.is_following);
    assert_eq!(user.followers_count, 1);
    assert!(state.social.follow_loading_ids.is_empty());
    assert!(state.social.error.is_some());
}

#[tokio::test]
async fn settings_fall_back_to_local_snapshot() {
    let fake = FakeTransport::new();
    let (client, local) = signed_in(&fake).await;
    fake.reply(Method::GET, "/api/settings/", 502, json!({}));

    assert!(client.load_settings().await.is_err());
    assert!(client.store().read(|s| s.settings.error.is_some()));

    let mut snapshot = Settings::default();
    snapshot.matchmaking.location_radius = 120;
    local.save_settings(&snapshot).unwrap();

    assert_eq!(client.load_settings().await, Ok(SettingsSource::LocalSnapshot));
    let held = client.store().read(|s| s.settings.clone());
    assert_eq!(held.settings.matchmaking.location_radius, 120);
    assert!(held.error.is_none());
}

#[tokio::test]
async fn saved_settings_are_snapshotted() {
    let fake = FakeTransport::new();
    let (client, local) = signed_in(&fake).await;
    let mut saved = Settings::default();
    saved.matchmaking.location_radius = 10;
    saved.matchmaking.age_range.min = 25;
    fake.reply(
        Method::PATCH,
        "/api/settings/",
        200,
        serde_json::to_value(SettingsPayload::from(&saved)).unwrap(),
    );

    client.edit_settings(SettingsEdit::LocationRadius(10));
    client.edit_settings(SettingsEdit::AgeRange { min: 25, max: 65 });
    assert!(client.store().read(|s| s.settings.dirty));

    let result = client.save_settings().await.unwrap();

    assert_eq!(result, saved);
    assert_eq!(local.load_settings().unwrap(), Some(saved));
    let held = client.store().read(|s| s.settings.clone());
    assert!(!held.dirty);
    assert_eq!(held.source, SettingsSource::Server);
}

#[tokio::test(start_paused = true)]
async fn search_only_requests_the_settled_query() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(
        Method::GET,
        "/api/social/search/",
        200,
        json!({"results": [{"id": 3, "type": "user", "title": "vibe_rider"}]}),
    );

    let early = client.clone();
    let first = tokio::spawn(async move { early.search("vi").await });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let late = client.clone();
    let second = tokio::spawn(async move { late.search("vibe").await });

    assert_eq!(first.await.unwrap(), Ok(false));
    assert_eq!(second.await.unwrap(), Ok(true));

    let calls = fake.requests_to(Method::GET, "/api/social/search/");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].query, vec![("q".to_string(), "vibe".to_string())]);
    let search = client.store().read(|s| s.search.clone());
    assert_eq!(search.results.len(), 1);
    assert!(search.is_open);
}

#[tokio::test(start_paused = true)]
async fn blank_search_clears_without_a_request() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;

    assert_eq!(client.search("   ").await, Ok(false));

    assert_eq!(fake.count(Method::GET, "/api/social/search/"), 0);
    let search = client.store().read(|s| s.search.clone());
    assert!(!search.is_open);
    assert!(search.results.is_empty());
}

#[tokio::test]
async fn login_accepts_flattened_user_response() {
    let fake = FakeTransport::new();
    let (client, local) = client(&fake);
    let mut body = user_json(1, "ana");
    body["tokens"] = json!({"access": "a1", "refresh": "r1"});
    fake.reply(Method::POST, "/api/auth/login/", 200, body);

    client.login("ana@example.com", "secret").await.unwrap();

    let auth = client.store().read(|s| s.auth.clone());
    assert_eq!(auth.user.map(|u| u.username), Some("ana".to_string()));
    assert!(auth.is_initialized);
    assert_eq!(stored_tokens(&local), Some(tokens("a1", "r1")));
    // The profile came with the response.
    assert_eq!(fake.count(Method::GET, "/api/auth/user/"), 0);
}

#[tokio::test]
async fn wrong_password_keeps_server_message() {
    let fake = FakeTransport::new();
    let (client, local) = client(&fake);
    fake.reply(
        Method::POST,
        "/api/auth/login/",
        401,
        json!({"detail": "No active account found with the given credentials"}),
    );

    let err = client.login("ana@example.com", "nope").await.unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 401,
            message: "No active account found with the given credentials".into()
        }
    );
    assert!(client.store().read(|s| s.auth.error.is_some()));
    assert_eq!(fake.count(Method::POST, TOKEN_REFRESH_PATH), 0);
    assert_eq!(stored_tokens(&local), None);
}

#[tokio::test]
async fn login_that_expires_while_loading_profile_fails() {
    let fake = FakeTransport::new();
    let (client, local) = client(&fake);
    fake.reply(
        Method::POST,
        "/api/auth/login/",
        200,
        json!({"access": "a1", "refresh": "r1"}),
    )
    .reply(Method::GET, "/api/auth/user/", 401, json!({}))
    .reply(Method::POST, TOKEN_REFRESH_PATH, 401, json!({}));

    let err = client.login("ana@example.com", "secret").await.unwrap_err();

    assert_eq!(err, ApiError::SessionExpired);
    let auth = client.store().read(|s| s.auth.clone());
    assert_eq!(auth.tokens, None);
    assert!(auth.user.is_none());
    assert!(auth.is_initialized);
    assert!(auth.error.is_some());
    assert_eq!(stored_tokens(&local), None);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn unusable_stored_session_logs_out() {
    let fake = FakeTransport::new();
    let local = std::sync::Arc::new(vibelink_client::local::MemoryState::with_tokens(tokens(
        "access", "refresh",
    )));
    let client = vibelink_client::Client::new(
        vibelink_client::ClientConfig::default(),
        fake.clone(),
        local.clone(),
    );
    fake.reply(Method::GET, "/api/auth/user/", 500, json!({}));

    assert!(!client.initialize().await);

    let auth = client.store().read(|s| s.auth.clone());
    assert!(auth.is_initialized);
    assert!(auth.tokens.is_none());
    assert!(auth.user.is_none());
    assert_eq!(stored_tokens(&local), None);
}

#[tokio::test]
async fn email_list_pages_by_number() {
    let fake = FakeTransport::new();
    let (client, _) = signed_in(&fake).await;
    fake.reply(
        Method::GET,
        "/api/notifications/list/",
        200,
        page(vec![email_json(2, "sent")], Some("2"), None),
    )
    .reply(
        Method::GET,
        "/api/notifications/list/",
        200,
        page(vec![email_json(1, "delivered")], None, Some("1")),
    );

    client
        .load_email_notifications(EmailFilter {
            status: Some("sent".into()),
            ..EmailFilter::default()
        })
        .await
        .unwrap();
    assert!(client.load_more_email_notifications().await.unwrap());

    let calls = fake.requests_to(Method::GET, "/api/notifications/list/");
    assert_eq!(calls[0].query, vec![("status".to_string(), "sent".to_string())]);
    assert_eq!(
        calls[1].query,
        vec![
            ("status".to_string(), "sent".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
    let emails = client.store().read(|s| s.email_notifications.clone());
    assert_eq!(emails.list.items.len(), 2);
    assert_eq!(emails.unread_count, 1);

    assert!(!client.load_more_email_notifications().await.unwrap());
}
