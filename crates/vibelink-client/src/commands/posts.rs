use vibelink_shared::error::ApiError;
use vibelink_shared::models::Post;
use vibelink_shared::types::{PostId, ToggleKind, UserId};

use crate::api;
use crate::api::posts::NewPost;
use crate::optimistic::ToggleSnapshot;
use crate::state::{Action, PostsAction};
use crate::Client;

fn posts_failed(message: String) -> Action {
    Action::Posts(PostsAction::Failed(message))
}

impl Client {
    pub async fn load_feed(&self) -> Result<(), ApiError> {
        self.store.dispatch(Action::Posts(PostsAction::Pending));
        let page = api::posts::feed(&self.session, None)
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::FeedLoaded(page)));
        Ok(())
    }

    /// Append the next feed page. `Ok(false)` when there is nothing to load
    /// or a load is already running.
    pub async fn load_more_feed(&self) -> Result<bool, ApiError> {
        let Some(_guard) = self.gates.feed.try_begin() else {
            return Ok(false);
        };
        let Some(next) = self.store.read(|s| s.posts.feed.cursor.next.clone()) else {
            return Ok(false);
        };

        self.store
            .dispatch(Action::Posts(PostsAction::LoadMorePending));
        let page = api::posts::feed(&self.session, Some(&next))
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::FeedPageAppended(page)));
        Ok(true)
    }

    pub async fn load_follower_posts(&self) -> Result<(), ApiError> {
        self.store.dispatch(Action::Posts(PostsAction::Pending));
        let posts = api::posts::follower_posts(&self.session)
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::FollowerPostsLoaded(posts)));
        Ok(())
    }

    pub async fn load_user_posts(&self, user: UserId) -> Result<(), ApiError> {
        self.store.dispatch(Action::Posts(PostsAction::Pending));
        let page = api::posts::user_posts(&self.session, user, None)
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::UserPostsLoaded { user, page }));
        Ok(())
    }

    pub async fn load_more_user_posts(&self) -> Result<bool, ApiError> {
        let Some(_guard) = self.gates.user_posts.try_begin() else {
            return Ok(false);
        };
        let (owner, next) = self.store.read(|s| {
            (
                s.posts.user_posts_owner,
                s.posts.user_posts.cursor.next.clone(),
            )
        });
        let (Some(owner), Some(next)) = (owner, next) else {
            return Ok(false);
        };

        self.store
            .dispatch(Action::Posts(PostsAction::LoadMorePending));
        let page = api::posts::user_posts(&self.session, owner, Some(&next))
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::UserPostsAppended(page)));
        Ok(true)
    }

    pub async fn create_post(&self, post: NewPost) -> Result<Post, ApiError> {
        self.store
            .dispatch(Action::Posts(PostsAction::CreatePending));
        let created = api::posts::create(&self.session, post)
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        tracing::info!(post = %created.id, "post created");
        self.store
            .dispatch(Action::Posts(PostsAction::Created(created.clone())));
        Ok(created)
    }

    pub async fn delete_post(&self, post: PostId) -> Result<(), ApiError> {
        api::posts::delete(&self.session, post)
            .await
            .map_err(|e| self.fail(e, posts_failed))?;
        self.store
            .dispatch(Action::Posts(PostsAction::Deleted(post)));
        Ok(())
    }

    pub async fn toggle_like(&self, post: PostId) -> Result<ToggleSnapshot, ApiError> {
        self.toggle(post, ToggleKind::Like).await
    }

    pub async fn toggle_share(&self, post: PostId) -> Result<ToggleSnapshot, ApiError> {
        self.toggle(post, ToggleKind::Share).await
    }

    /// Flip locally, then confirm with the server's values or roll back.
    async fn toggle(&self, post: PostId, kind: ToggleKind) -> Result<ToggleSnapshot, ApiError> {
        let before = self.store.read(|s| s.posts.toggle_snapshot(post, kind));
        if let Some(before) = before {
            self.store.dispatch(Action::Posts(PostsAction::ToggleSet {
                post,
                kind,
                state: before.flipped(),
            }));
        }

        let result = match kind {
            ToggleKind::Like => api::posts::toggle_like(&self.session, post)
                .await
                .map(|r| ToggleSnapshot {
                    active: r.is_liked,
                    count: r.likes_count,
                }),
            ToggleKind::Share => api::posts::toggle_share(&self.session, post)
                .await
                .map(|r| ToggleSnapshot {
                    active: r.is_shared,
                    count: r.shares_count,
                }),
        };

        match result {
            Ok(confirmed) => {
                self.store.dispatch(Action::Posts(PostsAction::ToggleSet {
                    post,
                    kind,
                    state: confirmed,
                }));
                Ok(confirmed)
            }
            Err(e) => {
                tracing::warn!(%post, ?kind, error = %e, "toggle failed, rolling back");
                if let Some(before) = before {
                    self.store.dispatch(Action::Posts(PostsAction::ToggleSet {
                        post,
                        kind,
                        state: before,
                    }));
                }
                Err(self.fail(e, posts_failed))
            }
        }
    }
}
