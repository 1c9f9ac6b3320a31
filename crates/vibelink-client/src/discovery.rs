//! Candidate filtering, the swipe deck, and conversation helpers.

use vibelink_shared::matching::{compute_match, MatchProfile, MatchScore};
use vibelink_shared::models::{Conversation, DiscoverUser};

/// Candidates the viewer does not follow yet. Safe to apply repeatedly.
pub fn strip_followed(users: Vec<DiscoverUser>) -> Vec<DiscoverUser> {
    users.into_iter().filter(|u| !u.is_following).collect()
}

/// Case-insensitive substring match against each hashtag.
pub fn matches_hashtag(user: &DiscoverUser, term: &str) -> bool {
    let term = term.trim().trim_start_matches('#').to_lowercase();
    if term.is_empty() {
        return true;
    }
    user.hashtags
        .iter()
        .any(|tag| tag.to_lowercase().contains(&term))
}

/// What the view shows: never a followed user, optionally narrowed by tag.
pub fn visible_users<'a>(users: &'a [DiscoverUser], hashtag: Option<&str>) -> Vec<&'a DiscoverUser> {
    users
        .iter()
        .filter(|u| !u.is_following)
        .filter(|u| hashtag.map_or(true, |t| matches_hashtag(u, t)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Leftward past the threshold.
    Pass,
    /// Rightward past the threshold.
    Follow,
    Cancelled,
}

/// Classify a drag from `start` to `end` (screen coordinates).
pub fn classify_swipe(start: (f64, f64), end: (f64, f64), threshold: f64) -> SwipeOutcome {
    let dx = start.0 - end.0;
    let dy = start.1 - end.1;
    if dx.abs() > dy.abs() && dx.abs() > threshold {
        if dx > 0.0 {
            SwipeOutcome::Pass
        } else {
            SwipeOutcome::Follow
        }
    } else {
        SwipeOutcome::Cancelled
    }
}

/// Position within the visible candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwipeDeck {
    index: usize,
}

impl SwipeDeck {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Keep the index inside `[0, len - 1]`.
    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn advance(&mut self, len: usize) {
        if self.index + 1 < len {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn current<'a, T>(&self, items: &[&'a T]) -> Option<&'a T> {
        items.get(self.index).copied()
    }
}

/// First line of a new conversation with `candidate`.
pub fn conversation_opener(candidate: &DiscoverUser) -> String {
    if let Some(starter) = candidate.conversation_starters.first() {
        return starter.clone();
    }
    if !candidate.shared_interests.is_empty() {
        let interests: Vec<&str> = candidate
            .shared_interests
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        return format!(
            "Hi! I noticed we both like {}. Would love to chat!",
            interests.join(" and ")
        );
    }
    if let Some(reason) = candidate.compatibility_reasons.first() {
        return reason.clone();
    }
    "Hi! Would love to chat!".to_string()
}

/// Conversations whose other participant or last message matches `term`.
pub fn filter_conversations<'a>(conversations: &'a [Conversation], term: &str) -> Vec<&'a Conversation> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return conversations.iter().collect();
    }
    conversations
        .iter()
        .filter(|c| {
            let other = c.other_participant.as_ref();
            let name_hit = other.is_some_and(|p| {
                p.full_name.to_lowercase().contains(&term) || p.username.to_lowercase().contains(&term)
            });
            let message_hit = c
                .last_message
                .as_ref()
                .is_some_and(|m| m.content.to_lowercase().contains(&term));
            name_hit || message_hit
        })
        .collect()
}

/// Order candidates by the locally computed score, best first. Ties keep
/// server order.
pub fn rank_by_local_match<'a>(
    viewer: &MatchProfile,
    candidates: &'a [DiscoverUser],
) -> Vec<(MatchScore, &'a DiscoverUser)> {
    let mut ranked: Vec<(MatchScore, &DiscoverUser)> = candidates
        .iter()
        .map(|c| {
            let profile = MatchProfile::from_candidate(c, viewer.radius_km);
            (compute_match(viewer, &profile), c)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.score.cmp(&a.0.score));
    ranked
}
