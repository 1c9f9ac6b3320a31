//! Scripted transport and JSON fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::Notify;

use vibelink_client::http::{ApiRequest, ApiResponse, Transport};
use vibelink_client::local::{LocalState, MemoryState};
use vibelink_client::{Client, ClientConfig};
use vibelink_shared::error::ApiError;
use vibelink_shared::models::AuthTokens;

type Route = (Method, String);

/// Answers requests from per-route queues. The last queued answer of a
/// route repeats; unknown routes get a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<Route, VecDeque<Result<ApiResponse, ApiError>>>>,
    gates: Mutex<HashMap<Route, Arc<Notify>>>,
    log: Mutex<Vec<ApiRequest>>,
}

/// Path (and query, if inlined) of a relative or absolute target.
pub fn path_of(target: &str) -> String {
    match target.find("://") {
        Some(i) => {
            let rest = &target[i + 3..];
            rest.find('/').map_or("/", |j| &rest[j..]).to_string()
        }
        None => target.to_string(),
    }
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Ok(ApiResponse::json_body(status, &body)))
    }

    pub fn fail(&self, method: Method, path: &str, error: ApiError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(&self, method: Method, path: &str, answer: Result<ApiResponse, ApiError>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(answer);
        self
    }

    /// Requests to this route wait until the returned `Notify` fires.
    pub fn hold(&self, method: Method, path: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert((method, path.to_string()), gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && path_of(&r.target) == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let route = (request.method.clone(), path_of(&request.target));
        self.log.lock().unwrap().push(request.clone());

        let gate = self.gates.lock().unwrap().get(&route).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(ApiResponse::json_body(404, &json!({"detail": "Not found."}))),
        }
    }
}

pub fn tokens(access: &str, refresh: &str) -> AuthTokens {
    AuthTokens {
        access: access.to_string(),
        refresh: refresh.to_string(),
    }
}

/// Client over `fake` with nothing stored.
pub fn client(fake: &Arc<FakeTransport>) -> (Client, Arc<MemoryState>) {
    let local = Arc::new(MemoryState::new());
    let client = Client::new(ClientConfig::default(), fake.clone(), local.clone());
    (client, local)
}

/// Client over `fake` holding the pair `access`/`refresh`.
pub async fn signed_in(fake: &Arc<FakeTransport>) -> (Client, Arc<MemoryState>) {
    let local = Arc::new(MemoryState::with_tokens(tokens("access", "refresh")));
    let client = Client::new(ClientConfig::default(), fake.clone(), local.clone());
    fake.reply(Method::GET, "/api/auth/user/", 200, user_json(1, "ana"));
    assert!(client.initialize().await);
    (client, local)
}

pub fn stored_tokens(local: &MemoryState) -> Option<AuthTokens> {
    local.load_tokens().unwrap()
}

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{username}@example.com"),
        "username": username,
        "full_name": username.to_uppercase(),
        "hashtags": ["travel", "music"],
        "latitude": "40.7128",
        "longitude": "-74.0060",
        "followers_count": 10,
        "following_count": 4
    })
}

pub fn post_user_json(id: i64) -> Value {
    json!({"id": id, "username": format!("u{id}"), "full_name": format!("User {id}")})
}

pub fn post_json(id: i64, author: i64, likes: u32, liked: bool) -> Value {
    json!({
        "id": id,
        "user": post_user_json(author),
        "content": format!("post {id}"),
        "hashtags": ["travel"],
        "likes_count": likes,
        "shares_count": 0,
        "is_liked": liked,
        "is_shared": false,
        "created_at": "2025-05-01T10:00:00Z"
    })
}

pub fn message_json(id: i64, sender: i64, minute: u32) -> Value {
    json!({
        "id": id,
        "sender": post_user_json(sender),
        "content": format!("message {id}"),
        "is_read": false,
        "created_at": format!("2025-05-01T10:{minute:02}:00Z")
    })
}

pub fn conversation_json(id: i64, other: i64, unread: u32) -> Value {
    json!({
        "id": id,
        "participants": [post_user_json(1), post_user_json(other)],
        "other_participant": post_user_json(other),
        "last_message": null,
        "unread_count": unread,
        "created_at": "2025-05-01T09:00:00Z",
        "updated_at": "2025-05-01T09:00:00Z"
    })
}

pub fn candidate_json(id: i64, following: bool, followers: u32) -> Value {
    json!({
        "id": id,
        "username": format!("u{id}"),
        "full_name": format!("User {id}"),
        "hashtags": ["travel", "hiking"],
        "is_following": following,
        "followers_count": followers,
        "match_percentage": "72.5",
        "conversation_starters": [format!("Hey u{id}, where was your last trip?")]
    })
}

pub fn page(results: Vec<Value>, next: Option<&str>, previous: Option<&str>) -> Value {
    json!({
        "count": results.len(),
        "next": next,
        "previous": previous,
        "results": results
    })
}

pub fn email_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "notification_type": "follow",
        "subject": "New follower",
        "message": "Someone followed you",
        "status": status,
        "created_at": "2025-05-01T10:00:00Z"
    })
}

/// Wait until `check` holds, re-reading after every store change.
pub async fn wait_for(client: &Client, check: impl Fn(&vibelink_client::AppState) -> bool) {
    let mut version = client.store().subscribe();
    while !client.store().read(&check) {
        version.changed().await.unwrap();
    }
}

/// Wait until the fake has seen `n` requests to a route.
pub async fn wait_for_requests(fake: &FakeTransport, method: Method, path: &str, n: usize) {
    while fake.count(method.clone(), path) < n {
        tokio::task::yield_now().await;
    }
}
