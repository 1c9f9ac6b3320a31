//! REST wire schemas and boundary validation.
//!
//! Payloads are deserialised into the typed entities of [`crate::models`]
//! (or into the wire-only shapes defined here) and then run through
//! [`Validate`] before any store sees them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::models::{
    AgeRange, AppearancePrefs, AuthTokens, Conversation, DiscoverUser, EmailNotification,
    EmailNotificationKind, FontSize, MatchmakingPrefs, Message, MessagePolicy, Notification,
    NotificationPrefs, Post, PostUser, PrivacyPrefs, ProfileVisibility, SearchResult, Settings,
    Theme, UserProfile,
};
use crate::types::{Coordinates, UserId};

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Invariant checks applied to every payload at the API boundary.
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), SchemaError> {
        self.iter().try_for_each(Validate::validate)
    }
}

fn positive_id(entity: &'static str, id: i64) -> Result<(), SchemaError> {
    if id > 0 {
        Ok(())
    } else {
        Err(SchemaError::InvalidId { entity, id })
    }
}

fn valid_location(
    entity: &'static str,
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<(), SchemaError> {
    if let (Some(lat), Some(lng)) = (lat, lng) {
        let c = Coordinates::new(lat, lng);
        if !c.is_valid() {
            let (field, value) = if (-90.0..=90.0).contains(&lat) {
                ("longitude", lng)
            } else {
                ("latitude", lat)
            };
            return Err(SchemaError::OutOfRange {
                entity,
                field,
                value,
            });
        }
    }
    Ok(())
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("user", self.id.0)?;
        valid_location("user", self.latitude, self.longitude)
    }
}

impl Validate for PostUser {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("user", self.id.0)
    }
}

impl Validate for DiscoverUser {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("candidate", self.id.0)?;
        if !(0.0..=100.0).contains(&self.match_percentage) {
            return Err(SchemaError::OutOfRange {
                entity: "candidate",
                field: "match_percentage",
                value: self.match_percentage,
            });
        }
        if let Some(d) = self.distance {
            if d < 0.0 || !d.is_finite() {
                return Err(SchemaError::OutOfRange {
                    entity: "candidate",
                    field: "distance",
                    value: d,
                });
            }
        }
        valid_location("candidate", self.latitude, self.longitude)
    }
}

impl Validate for Post {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("post", self.id.0)?;
        self.user.validate()
    }
}

impl Validate for Conversation {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("conversation", self.id.0)?;
        self.participants.validate()?;
        if let Some(other) = &self.other_participant {
            other.validate()?;
        }
        Ok(())
    }
}

impl Validate for Message {
    fn validate(&self) -> Result<(), SchemaError> {
        // The server never hands out provisional (negative) ids.
        positive_id("message", self.id.0)?;
        self.sender.validate()
    }
}

impl Validate for Notification {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("notification", self.id.0)
    }
}

impl Validate for EmailNotification {
    fn validate(&self) -> Result<(), SchemaError> {
        positive_id("email_notification", self.id.0)
    }
}

impl Validate for SearchResult {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lenient numeric fields
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// DRF serialises `DecimalField` as a string; accept both forms.
pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_decimal(deserializer)?.unwrap_or(0.0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CursorRepr {
    Page(u64),
    Url(String),
}

/// Page cursors are absolute URLs on most endpoints and bare page numbers
/// on the email notification list.
pub fn cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CursorRepr>::deserialize(deserializer)? {
        None => None,
        Some(CursorRepr::Page(n)) => Some(n.to_string()),
        Some(CursorRepr::Url(u)) if u.is_empty() => None,
        Some(CursorRepr::Url(u)) => Some(u),
    })
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Standard paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "cursor")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "cursor")]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn single(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            next: None,
            previous: None,
            results,
        }
    }
}

impl<T: Validate> Validate for Paginated<T> {
    fn validate(&self) -> Result<(), SchemaError> {
        self.results.validate()
    }
}

/// Plain status acknowledgement (`{"status": ..., "message": ...}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub notification_id: Option<i64>,
}

impl Validate for Ack {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response. With rotation enabled the server returns a new
/// refresh token as well; without it only `access` comes back.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshResponse {
    pub fn into_tokens(self, previous_refresh: &str) -> AuthTokens {
        AuthTokens {
            access: self.access,
            refresh: self
                .refresh
                .unwrap_or_else(|| previous_refresh.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

/// Normalised login result.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: Option<UserProfile>,
    pub tokens: AuthTokens,
}

impl LoginOutcome {
    /// The login endpoint has answered in three shapes over time:
    /// `{user, tokens}`, a bare `{access, refresh}`, and the user's fields
    /// flattened next to a `tokens` object.
    pub fn from_json(v: Value) -> Result<Self, SchemaError> {
        let tokens_of = |t: &Value| -> Option<AuthTokens> {
            Some(AuthTokens {
                access: t.get("access")?.as_str()?.to_string(),
                refresh: t.get("refresh")?.as_str()?.to_string(),
            })
        };

        if let (Some(user), Some(tokens)) = (v.get("user"), v.get("tokens")) {
            let tokens = tokens_of(tokens)
                .ok_or_else(|| SchemaError::UnknownShape("tokens missing access/refresh".into()))?;
            let user: UserProfile = serde_json::from_value(user.clone())
                .map_err(|e| SchemaError::UnknownShape(format!("user: {e}")))?;
            user.validate()?;
            return Ok(Self {
                user: Some(user),
                tokens,
            });
        }

        if let Some(tokens) = tokens_of(&v) {
            return Ok(Self { user: None, tokens });
        }

        if let Some(tokens) = v.get("tokens").and_then(tokens_of) {
            if v.get("id").is_some() || v.get("email").is_some() {
                let user: UserProfile = serde_json::from_value(v.clone())
                    .map_err(|e| SchemaError::UnknownShape(format!("user: {e}")))?;
                user.validate()?;
                return Ok(Self {
                    user: Some(user),
                    tokens,
                });
            }
        }

        Err(SchemaError::UnknownShape("login response".into()))
    }
}

/// Registration acknowledgement; the account still needs OTP verification.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RegisterAck {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Validate for RegisterAck {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Toggles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct LikeToggle {
    pub is_liked: bool,
    pub likes_count: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ShareToggle {
    pub is_shared: bool,
    pub shares_count: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct FollowToggle {
    pub is_following: bool,
    pub followers_count: u32,
}

impl Validate for LikeToggle {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

impl Validate for ShareToggle {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

impl Validate for FollowToggle {
    fn validate(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverQuery {
    pub search: Option<String>,
    pub radius: Option<u32>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl DiscoverQuery {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(s) = &self.search {
            q.push(("search".to_string(), s.clone()));
        }
        if let Some(r) = self.radius {
            q.push(("radius".to_string(), r.to_string()));
        }
        if let Some(a) = self.min_age {
            q.push(("min_age".to_string(), a.to_string()));
        }
        if let Some(a) = self.max_age {
            q.push(("max_age".to_string(), a.to_string()));
        }
        q
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiPagination {
    pub page: u32,
    pub per_page: u32,
    pub total_matches: u32,
    pub next_page_available: bool,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AiRecommendationsPage {
    #[serde(default)]
    pub recommendations: Vec<DiscoverUser>,
    pub pagination: AiPagination,
}

impl Validate for SearchResponse {
    fn validate(&self) -> Result<(), SchemaError> {
        self.results.validate()
    }
}

impl Validate for AiRecommendationsPage {
    fn validate(&self) -> Result<(), SchemaError> {
        self.recommendations.validate()
    }
}

// ---------------------------------------------------------------------------
// Email notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailFilter {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub page: Option<u32>,
}

impl EmailFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut q = Vec::new();
        if let Some(s) = &self.status {
            q.push(("status".to_string(), s.clone()));
        }
        if let Some(k) = &self.kind {
            q.push(("type".to_string(), k.clone()));
        }
        if let Some(p) = self.page {
            q.push(("page".to_string(), p.to_string()));
        }
        q
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewEmailNotification {
    pub notification_type: EmailNotificationKind,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_user: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_object_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_object_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Flat settings representation used by `/api/settings/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsPayload {
    pub likes_notifications: bool,
    pub shares_notifications: bool,
    #[serde(default = "default_true")]
    pub matches_notifications: bool,
    pub messages_notifications: bool,
    pub profile_visibility: ProfileVisibility,
    pub show_location: bool,
    pub allow_messages: MessagePolicy,
    #[serde(default)]
    pub show_online_status: bool,
    pub location_radius: u32,
    pub min_age: u32,
    pub max_age: u32,
    pub show_distance: bool,
    pub theme: Theme,
    pub font_size: FontSize,
}

fn default_true() -> bool {
    true
}

impl Validate for SettingsPayload {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.min_age > self.max_age {
            return Err(SchemaError::Inconsistent {
                entity: "settings",
                reason: format!("min_age {} exceeds max_age {}", self.min_age, self.max_age),
            });
        }
        Ok(())
    }
}

impl From<SettingsPayload> for Settings {
    fn from(p: SettingsPayload) -> Self {
        Settings {
            notifications: NotificationPrefs {
                likes: p.likes_notifications,
                shares: p.shares_notifications,
                messages: p.messages_notifications,
            },
            privacy: PrivacyPrefs {
                profile_visibility: p.profile_visibility,
                show_location: p.show_location,
                allow_messages: p.allow_messages,
            },
            matchmaking: MatchmakingPrefs {
                location_radius: p.location_radius,
                age_range: AgeRange {
                    min: p.min_age,
                    max: p.max_age,
                },
                show_distance: p.show_distance,
            },
            appearance: AppearancePrefs {
                theme: p.theme,
                font_size: p.font_size,
            },
        }
    }
}

impl From<&Settings> for SettingsPayload {
    fn from(s: &Settings) -> Self {
        SettingsPayload {
            likes_notifications: s.notifications.likes,
            shares_notifications: s.notifications.shares,
            matches_notifications: true,
            messages_notifications: s.notifications.messages,
            profile_visibility: s.privacy.profile_visibility,
            show_location: s.privacy.show_location,
            allow_messages: s.privacy.allow_messages,
            show_online_status: false,
            location_radius: s.matchmaking.location_radius,
            min_age: s.matchmaking.age_range.min,
            max_age: s.matchmaking.age_range.max,
            show_distance: s.matchmaking.show_distance,
            theme: s.appearance.theme,
            font_size: s.appearance.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json(id: i64) -> Value {
        json!({
            "id": id,
            "email": "ana@example.com",
            "username": "ana",
            "full_name": "Ana Lima",
            "latitude": "37.774900",
            "longitude": -122.4194,
            "hashtags": ["travel"],
            "followers_count": 3,
            "following_count": 1
        })
    }

    #[test]
    fn login_user_and_tokens_shape() {
        let v = json!({"user": user_json(1), "tokens": {"access": "a", "refresh": "r"}});
        let out = LoginOutcome::from_json(v).unwrap();
        assert_eq!(out.tokens.access, "a");
        let user = out.user.unwrap();
        assert_eq!(user.latitude, Some(37.7749));
    }

    #[test]
    fn login_bare_token_shape() {
        let out = LoginOutcome::from_json(json!({"access": "a", "refresh": "r"})).unwrap();
        assert!(out.user.is_none());
        assert_eq!(out.tokens.refresh, "r");
    }

    #[test]
    fn login_flattened_shape() {
        let mut v = user_json(5);
        v["tokens"] = json!({"access": "a2", "refresh": "r2"});
        let out = LoginOutcome::from_json(v).unwrap();
        assert_eq!(out.user.unwrap().id, UserId(5));
        assert_eq!(out.tokens.access, "a2");
    }

    #[test]
    fn login_rejects_unknown_shape() {
        assert!(LoginOutcome::from_json(json!({"detail": "nope"})).is_err());
    }

    #[test]
    fn refresh_without_rotation_keeps_old_refresh() {
        let r: RefreshResponse = serde_json::from_value(json!({"access": "new"})).unwrap();
        let pair = r.into_tokens("old-refresh");
        assert_eq!(pair.refresh, "old-refresh");
        assert_eq!(pair.access, "new");
    }

    #[test]
    fn candidate_out_of_range_percentage_rejected() {
        let c: DiscoverUser = serde_json::from_value(json!({
            "id": 2, "username": "bo", "match_percentage": 140
        }))
        .unwrap();
        assert!(matches!(
            c.validate(),
            Err(SchemaError::OutOfRange { field: "match_percentage", .. })
        ));
    }

    #[test]
    fn invalid_latitude_rejected() {
        let mut v = user_json(1);
        v["latitude"] = json!("123.0");
        let u: UserProfile = serde_json::from_value(v).unwrap();
        assert!(u.validate().is_err());
    }

    #[test]
    fn settings_payload_round_trips_through_nested_form() {
        let payload = SettingsPayload::from(&Settings::default());
        assert_eq!(payload.location_radius, 50);
        assert_eq!(Settings::from(payload), Settings::default());
    }

    #[test]
    fn inverted_age_range_rejected() {
        let mut payload = SettingsPayload::from(&Settings::default());
        payload.min_age = 70;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn numeric_page_cursors_become_strings() {
        let page: Paginated<Notification> = serde_json::from_value(json!({
            "count": 45, "next": 3, "previous": null, "results": []
        }))
        .unwrap();
        assert_eq!(page.next.as_deref(), Some("3"));
        assert!(page.previous.is_none());
    }

    #[test]
    fn discover_query_only_sets_present_params() {
        let q = DiscoverQuery {
            radius: Some(25),
            ..Default::default()
        };
        assert_eq!(q.to_query(), vec![("radius".to_string(), "25".to_string())]);
    }
}
