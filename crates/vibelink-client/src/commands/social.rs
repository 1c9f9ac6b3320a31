use vibelink_shared::error::ApiError;
use vibelink_shared::matching::{MatchProfile, MatchScore};
use vibelink_shared::models::DiscoverUser;
use vibelink_shared::protocol::{DiscoverQuery, FollowToggle};
use vibelink_shared::types::UserId;

use crate::api;
use crate::discovery::{classify_swipe, rank_by_local_match, SwipeOutcome};
use crate::state::social::DeckMove;
use crate::state::{Action, SocialAction};
use crate::Client;

fn social_failed(message: String) -> Action {
    Action::Social(SocialAction::Failed(message))
}

impl Client {
    pub async fn load_discover(&self, query: DiscoverQuery) -> Result<(), ApiError> {
        self.store.dispatch(Action::Social(SocialAction::Pending));
        let page = api::social::discover(&self.session, &query)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.store
            .dispatch(Action::Social(SocialAction::DiscoverLoaded(page.results)));
        Ok(())
    }

    pub async fn load_top_matches(&self) -> Result<(), ApiError> {
        self.store.dispatch(Action::Social(SocialAction::Pending));
        let users = api::social::top_matches(&self.session)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.store
            .dispatch(Action::Social(SocialAction::TopMatchesLoaded(users)));
        Ok(())
    }

    /// Fetch one page of AI recommendations. Page 1 replaces the list,
    /// later pages extend it.
    pub async fn load_ai_recommendations(&self, page: u32) -> Result<(), ApiError> {
        self.store.dispatch(Action::Social(SocialAction::AiPending));
        let result = api::social::ai_recommendations(&self.session, page.max(1), self.config.ai_page_size)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        tracing::debug!(
            page = result.pagination.page,
            total = result.pagination.total_matches,
            "AI recommendations loaded"
        );
        self.store.dispatch(Action::Social(
            SocialAction::AiRecommendationsLoaded(result),
        ));
        Ok(())
    }

    pub async fn load_more_ai_recommendations(&self) -> Result<bool, ApiError> {
        let Some(_guard) = self.gates.ai.try_begin() else {
            return Ok(false);
        };
        let next = self.store.read(|s| {
            s.social
                .ai_pagination
                .filter(|p| p.next_page_available)
                .map(|p| p.page + 1)
        });
        let Some(next) = next else {
            return Ok(false);
        };
        self.load_ai_recommendations(next).await?;
        Ok(true)
    }

    /// Discard the server's cached recommendations and load page 1 again.
    pub async fn refresh_ai_recommendations(&self) -> Result<(), ApiError> {
        api::social::invalidate_ai_cache(&self.session)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.load_ai_recommendations(1).await
    }

    pub async fn load_followers(&self, user: UserId) -> Result<(), ApiError> {
        self.store.dispatch(Action::Social(SocialAction::Pending));
        let users = api::social::followers(&self.session, user)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.store
            .dispatch(Action::Social(SocialAction::FollowersLoaded(users)));
        Ok(())
    }

    pub async fn load_following(&self, user: UserId) -> Result<(), ApiError> {
        self.store.dispatch(Action::Social(SocialAction::Pending));
        let users = api::social::following(&self.session, user)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.store
            .dispatch(Action::Social(SocialAction::FollowingLoaded(users)));
        Ok(())
    }

    pub async fn load_user_profile(&self, user: UserId) -> Result<DiscoverUser, ApiError> {
        self.store.dispatch(Action::Social(SocialAction::Pending));
        let profile = api::social::profile(&self.session, user)
            .await
            .map_err(|e| self.fail(e, social_failed))?;
        self.store
            .dispatch(Action::Social(SocialAction::ProfileLoaded(profile.clone())));
        Ok(profile)
    }

    /// Follow or unfollow with an optimistic flip of the candidate's card.
    pub async fn toggle_follow(&self, user: UserId) -> Result<FollowToggle, ApiError> {
        let snapshot = self.store.read(|s| s.social.follow_snapshot(user));
        self.store.dispatch(Action::Social(SocialAction::FollowPending {
            user,
            optimistic: snapshot.map(|s| s.flipped()),
        }));

        match api::social::toggle_follow(&self.session, user).await {
            Ok(result) => {
                tracing::info!(%user, following = result.is_following, "follow toggled");
                self.store
                    .dispatch(Action::Social(SocialAction::FollowConfirmed { user, result }));
                Ok(result)
            }
            Err(e) if e.is_session_fatal() => Err(self.fail(e, social_failed)),
            Err(e) => {
                tracing::warn!(%user, error = %e, "follow failed, rolling back");
                self.store.dispatch(Action::Social(SocialAction::FollowReverted {
                    user,
                    snapshot,
                    error: e.user_message(),
                }));
                Err(e)
            }
        }
    }

    pub fn set_hashtag_filter(&self, term: Option<String>) {
        self.store
            .dispatch(Action::Social(SocialAction::SetHashtagFilter(term)));
    }

    pub fn move_deck(&self, step: DeckMove) {
        self.store.dispatch(Action::Social(SocialAction::Deck(step)));
    }

    /// Resolve a drag on the current card. A follow removes the candidate,
    /// which brings the next one under the deck index.
    pub async fn swipe(&self, start: (f64, f64), end: (f64, f64)) -> Result<SwipeOutcome, ApiError> {
        let outcome = classify_swipe(start, end, self.config.min_swipe_distance);
        match outcome {
            SwipeOutcome::Pass => self.move_deck(DeckMove::Next),
            SwipeOutcome::Follow => {
                let current = self.store.read(|s| s.social.current_candidate().map(|u| u.id));
                if let Some(user) = current {
                    self.toggle_follow(user).await?;
                }
            }
            SwipeOutcome::Cancelled => {}
        }
        Ok(outcome)
    }

    /// Visible discover candidates ordered by the locally computed score
    /// against the signed-in user.
    pub fn ranked_candidates(&self) -> Vec<(MatchScore, DiscoverUser)> {
        self.store.read(|s| {
            let Some(me) = s.auth.user.as_ref() else {
                return Vec::new();
            };
            let radius = f64::from(s.settings.settings.matchmaking.location_radius);
            let viewer = MatchProfile::from_user(me, radius);
            let visible: Vec<DiscoverUser> = s.social.visible_users().into_iter().cloned().collect();
            rank_by_local_match(&viewer, &visible)
                .into_iter()
                .map(|(score, user)| (score, user.clone()))
                .collect()
        })
    }
}
