//! Domain entities cached client-side.
//!
//! Every struct derives `Serialize` and `Deserialize`; the REST payloads are
//! parsed straight into these types and then checked with
//! [`crate::protocol::Validate`] before they enter any store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOCATION_RADIUS_KM;
use crate::types::{
    ConversationId, Coordinates, EmailNotificationId, MessageId, NotificationId, PostId, UserId,
};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Access/refresh JWT pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// The signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::protocol::opt_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::protocol::opt_decimal")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_otp_verified: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
}

impl UserProfile {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

/// Compact author/participant card embedded in posts, messages and
/// conversations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub is_following: bool,
}

/// A discovery candidate: a public profile plus derived, non-persisted
/// matching fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoverUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "crate::protocol::opt_decimal")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "crate::protocol::opt_decimal")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default, deserialize_with = "crate::protocol::decimal")]
    pub match_percentage: f64,
    #[serde(default, deserialize_with = "crate::protocol::opt_decimal")]
    pub distance: Option<f64>,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub follows_you: bool,
    #[serde(default)]
    pub is_mutual_follow: bool,
    #[serde(default)]
    pub compatibility_reasons: Vec<String>,
    #[serde(default)]
    pub conversation_starters: Vec<String>,
    #[serde(default)]
    pub shared_interests: Vec<String>,
}

impl DiscoverUser {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub user: PostUser,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub shares_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastMessage {
    pub content: String,
    pub sender: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub participants: Vec<PostUser>,
    #[serde(default)]
    pub other_participant: Option<PostUser>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A chat message. See [`MessageId::is_provisional`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub sender: PostUser,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SocialNotificationKind {
    Like,
    Share,
    Follow,
    Message,
    Match,
    #[serde(other)]
    Other,
}

/// In-app social notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub from_user: String,
    pub notification_type: SocialNotificationKind,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailNotificationKind {
    Like,
    Share,
    Follow,
    Message,
    Comment,
    Match,
    Welcome,
    System,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Failed,
    Delivered,
}

/// Email-delivery notification. Independent of [`Notification`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailNotification {
    pub id: EmailNotificationId,
    pub notification_type: EmailNotificationKind,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub from_user_name: Option<String>,
    #[serde(default)]
    pub related_object_id: Option<i64>,
    #[serde(default)]
    pub related_object_type: Option<String>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl EmailNotification {
    /// Pending and sent mail counts as unread.
    pub fn is_unread(&self) -> bool {
        matches!(self.status, DeliveryStatus::Pending | DeliveryStatus::Sent)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    Friends,
    Private,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessagePolicy {
    Everyone,
    Friends,
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub likes: bool,
    pub shares: bool,
    pub messages: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivacyPrefs {
    pub profile_visibility: ProfileVisibility,
    pub show_location: bool,
    pub allow_messages: MessagePolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchmakingPrefs {
    pub location_radius: u32,
    pub age_range: AgeRange,
    pub show_distance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppearancePrefs {
    pub theme: Theme,
    pub font_size: FontSize,
}

/// User preferences in the client's nested form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub notifications: NotificationPrefs,
    pub privacy: PrivacyPrefs,
    pub matchmaking: MatchmakingPrefs,
    pub appearance: AppearancePrefs,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications: NotificationPrefs {
                likes: true,
                shares: true,
                messages: true,
            },
            privacy: PrivacyPrefs {
                profile_visibility: ProfileVisibility::Public,
                show_location: true,
                allow_messages: MessagePolicy::Friends,
            },
            matchmaking: MatchmakingPrefs {
                location_radius: DEFAULT_LOCATION_RADIUS_KM,
                age_range: AgeRange { min: 18, max: 65 },
                show_distance: true,
            },
            appearance: AppearancePrefs {
                theme: Theme::System,
                font_size: FontSize::Medium,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    User,
    Post,
    Hashtag,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}
