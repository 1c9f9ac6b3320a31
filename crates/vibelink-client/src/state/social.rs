use std::collections::BTreeSet;

use vibelink_shared::models::DiscoverUser;
use vibelink_shared::protocol::{AiPagination, AiRecommendationsPage, FollowToggle};
use vibelink_shared::types::UserId;

use crate::discovery::{self, SwipeDeck};
use crate::optimistic::FollowSnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialState {
    pub discover: Vec<DiscoverUser>,
    pub top_matches: Vec<DiscoverUser>,
    pub ai_recommendations: Vec<DiscoverUser>,
    pub ai_pagination: Option<AiPagination>,
    pub followers: Vec<DiscoverUser>,
    pub following: Vec<DiscoverUser>,
    pub viewed_profile: Option<DiscoverUser>,
    pub follow_loading_ids: BTreeSet<UserId>,
    pub hashtag_filter: Option<String>,
    pub deck: SwipeDeck,
    pub is_loading: bool,
    pub is_loading_ai: bool,
    pub error: Option<String>,
}

impl SocialState {
    /// Discover candidates as shown: unfollowed, then narrowed by hashtag.
    pub fn visible_users(&self) -> Vec<&DiscoverUser> {
        discovery::visible_users(&self.discover, self.hashtag_filter.as_deref())
    }

    pub fn current_candidate(&self) -> Option<&DiscoverUser> {
        self.deck.current(&self.visible_users())
    }

    pub fn is_follow_loading(&self, user: UserId) -> bool {
        self.follow_loading_ids.contains(&user)
    }

    pub fn follow_snapshot(&self, user: UserId) -> Option<FollowSnapshot> {
        self.candidates()
            .find(|u| u.id == user)
            .map(|u| FollowSnapshot {
                is_following: u.is_following,
                followers_count: u.followers_count,
            })
    }

    fn candidates(&self) -> impl Iterator<Item = &DiscoverUser> {
        self.discover
            .iter()
            .chain(&self.top_matches)
            .chain(&self.ai_recommendations)
            .chain(&self.followers)
            .chain(&self.following)
            .chain(self.viewed_profile.iter())
    }

    fn candidates_mut(&mut self) -> impl Iterator<Item = &mut DiscoverUser> {
        self.discover
            .iter_mut()
            .chain(&mut self.top_matches)
            .chain(&mut self.ai_recommendations)
            .chain(&mut self.followers)
            .chain(&mut self.following)
            .chain(self.viewed_profile.iter_mut())
    }

    fn set_follow(&mut self, user: UserId, snap: FollowSnapshot) {
        for u in self.candidates_mut().filter(|u| u.id == user) {
            u.is_following = snap.is_following;
            u.followers_count = snap.followers_count;
        }
    }

    fn reclamp(&mut self) {
        let len = self.visible_users().len();
        self.deck.clamp(len);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckMove {
    Next,
    Previous,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocialAction {
    Pending,
    DiscoverLoaded(Vec<DiscoverUser>),
    TopMatchesLoaded(Vec<DiscoverUser>),
    AiPending,
    AiRecommendationsLoaded(AiRecommendationsPage),
    FollowersLoaded(Vec<DiscoverUser>),
    FollowingLoaded(Vec<DiscoverUser>),
    ProfileLoaded(DiscoverUser),
    SetHashtagFilter(Option<String>),
    Deck(DeckMove),
    /// Optimistic flip of a candidate's follow state. `None` when the
    /// user is not in any held list.
    FollowPending {
        user: UserId,
        optimistic: Option<FollowSnapshot>,
    },
    FollowConfirmed {
        user: UserId,
        result: FollowToggle,
    },
    FollowReverted {
        user: UserId,
        snapshot: Option<FollowSnapshot>,
        error: String,
    },
    Failed(String),
}

pub fn reduce(state: &mut SocialState, action: SocialAction) {
    match action {
        SocialAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        SocialAction::DiscoverLoaded(users) => {
            state.is_loading = false;
            state.discover = discovery::strip_followed(users);
            state.reclamp();
        }
        SocialAction::TopMatchesLoaded(users) => {
            state.is_loading = false;
            state.top_matches = discovery::strip_followed(users);
        }
        SocialAction::AiPending => {
            state.is_loading_ai = true;
            state.error = None;
        }
        SocialAction::AiRecommendationsLoaded(page) => {
            state.is_loading_ai = false;
            let fresh = discovery::strip_followed(page.recommendations);
            if page.pagination.page <= 1 {
                state.ai_recommendations = fresh;
            } else {
                for user in fresh {
                    if !state.ai_recommendations.iter().any(|u| u.id == user.id) {
                        state.ai_recommendations.push(user);
                    }
                }
            }
            state.ai_pagination = Some(page.pagination);
        }
        SocialAction::FollowersLoaded(users) => {
            state.is_loading = false;
            state.followers = users;
        }
        SocialAction::FollowingLoaded(users) => {
            state.is_loading = false;
            state.following = users;
        }
        SocialAction::ProfileLoaded(user) => {
            state.is_loading = false;
            state.viewed_profile = Some(user);
        }
        SocialAction::SetHashtagFilter(term) => {
            state.hashtag_filter = term.filter(|t| !t.trim().is_empty());
            state.deck.reset();
        }
        SocialAction::Deck(DeckMove::Next) => {
            let len = state.visible_users().len();
            state.deck.advance(len);
        }
        SocialAction::Deck(DeckMove::Previous) => state.deck.previous(),
        SocialAction::Deck(DeckMove::Reset) => state.deck.reset(),
        SocialAction::FollowPending { user, optimistic } => {
            state.follow_loading_ids.insert(user);
            if let Some(optimistic) = optimistic {
                state.set_follow(user, optimistic);
            }
            state.reclamp();
        }
        SocialAction::FollowConfirmed { user, result } => {
            state.follow_loading_ids.remove(&user);
            state.set_follow(
                user,
                FollowSnapshot {
                    is_following: result.is_following,
                    followers_count: result.followers_count,
                },
            );
            if result.is_following {
                state.discover.retain(|u| u.id != user);
                state.top_matches.retain(|u| u.id != user);
                state.ai_recommendations.retain(|u| u.id != user);
            }
            state.reclamp();
        }
        SocialAction::FollowReverted {
            user,
            snapshot,
            error,
        } => {
            state.follow_loading_ids.remove(&user);
            if let Some(snapshot) = snapshot {
                state.set_follow(user, snapshot);
            }
            state.reclamp();
            state.error = Some(error);
        }
        SocialAction::Failed(message) => {
            state.is_loading = false;
            state.is_loading_ai = false;
            state.error = Some(message);
        }
    }
}
