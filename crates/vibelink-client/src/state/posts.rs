use vibelink_shared::models::Post;
use vibelink_shared::protocol::Paginated;
use vibelink_shared::types::{PostId, ToggleKind, UserId};

use crate::optimistic::ToggleSnapshot;
use crate::pagination::Paged;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    pub feed: Paged<Post>,
    pub follower_posts: Vec<Post>,
    pub user_posts: Paged<Post>,
    pub user_posts_owner: Option<UserId>,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub is_creating: bool,
    pub error: Option<String>,
}

impl PostsState {
    /// Current like/share state of a post, from whichever list holds it.
    pub fn toggle_snapshot(&self, id: PostId, kind: ToggleKind) -> Option<ToggleSnapshot> {
        self.all_posts().find(|p| p.id == id).map(|p| match kind {
            ToggleKind::Like => ToggleSnapshot {
                active: p.is_liked,
                count: p.likes_count,
            },
            ToggleKind::Share => ToggleSnapshot {
                active: p.is_shared,
                count: p.shares_count,
            },
        })
    }

    pub fn all_posts(&self) -> impl Iterator<Item = &Post> {
        self.feed
            .items
            .iter()
            .chain(self.follower_posts.iter())
            .chain(self.user_posts.items.iter())
    }

    fn all_posts_mut(&mut self) -> impl Iterator<Item = &mut Post> {
        self.feed
            .items
            .iter_mut()
            .chain(self.follower_posts.iter_mut())
            .chain(self.user_posts.items.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostsAction {
    Pending,
    LoadMorePending,
    FeedLoaded(Paginated<Post>),
    FeedPageAppended(Paginated<Post>),
    FollowerPostsLoaded(Vec<Post>),
    UserPostsLoaded { user: UserId, page: Paginated<Post> },
    UserPostsAppended(Paginated<Post>),
    CreatePending,
    Created(Post),
    Deleted(PostId),
    /// Set a toggle to the given state in every list.
    ToggleSet {
        post: PostId,
        kind: ToggleKind,
        state: ToggleSnapshot,
    },
    AuthorFollowChanged { user: UserId, is_following: bool },
    Failed(String),
}

pub fn reduce(state: &mut PostsState, action: PostsAction) {
    match action {
        PostsAction::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        PostsAction::LoadMorePending => {
            state.is_loading_more = true;
        }
        PostsAction::FeedLoaded(page) => {
            state.is_loading = false;
            state.feed.replace(page);
        }
        PostsAction::FeedPageAppended(page) => {
            state.is_loading_more = false;
            state.feed.append(page);
        }
        PostsAction::FollowerPostsLoaded(posts) => {
            state.is_loading = false;
            state.follower_posts = posts;
        }
        PostsAction::UserPostsLoaded { user, page } => {
            state.is_loading = false;
            state.user_posts_owner = Some(user);
            state.user_posts.replace(page);
        }
        PostsAction::UserPostsAppended(page) => {
            state.is_loading_more = false;
            state.user_posts.append(page);
        }
        PostsAction::CreatePending => {
            state.is_creating = true;
            state.error = None;
        }
        PostsAction::Created(post) => {
            state.is_creating = false;
            if state.user_posts_owner == Some(post.user.id) {
                state.user_posts.items.insert(0, post.clone());
                state.user_posts.cursor.count += 1;
            }
            state.feed.items.insert(0, post);
            state.feed.cursor.count += 1;
        }
        PostsAction::Deleted(id) => {
            state.feed.remove(id);
            state.user_posts.remove(id);
            state.follower_posts.retain(|p| p.id != id);
        }
        PostsAction::ToggleSet { post, kind, state: toggle } => {
            for p in state.all_posts_mut().filter(|p| p.id == post) {
                match kind {
                    ToggleKind::Like => {
                        p.is_liked = toggle.active;
                        p.likes_count = toggle.count;
                    }
                    ToggleKind::Share => {
                        p.is_shared = toggle.active;
                        p.shares_count = toggle.count;
                    }
                }
            }
        }
        PostsAction::AuthorFollowChanged { user, is_following } => {
            for p in state.all_posts_mut().filter(|p| p.user.id == user) {
                p.user.is_following = is_following;
            }
        }
        PostsAction::Failed(message) => {
            state.is_loading = false;
            state.is_loading_more = false;
            state.is_creating = false;
            state.error = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(id: i64, author: i64) -> Post {
        serde_json::from_value(json!({
            "id": id,
            "user": {"id": author, "username": format!("u{author}")},
            "content": "hello",
            "likes_count": 2,
            "created_at": "2025-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    fn page(posts: Vec<Post>) -> Paginated<Post> {
        Paginated::single(posts)
    }

    #[test]
    fn toggle_applies_to_every_list() {
        let mut s = PostsState::default();
        reduce(&mut s, PostsAction::FeedLoaded(page(vec![post(1, 9)])));
        reduce(&mut s, PostsAction::FollowerPostsLoaded(vec![post(1, 9)]));
        let snap = s.toggle_snapshot(PostId(1), ToggleKind::Like).unwrap();
        reduce(
            &mut s,
            PostsAction::ToggleSet {
                post: PostId(1),
                kind: ToggleKind::Like,
                state: snap.flipped(),
            },
        );
        assert!(s.all_posts().all(|p| p.is_liked && p.likes_count == 3));
    }

    #[test]
    fn delete_removes_from_all_lists() {
        let mut s = PostsState::default();
        reduce(&mut s, PostsAction::FeedLoaded(page(vec![post(1, 9), post(2, 9)])));
        reduce(
            &mut s,
            PostsAction::UserPostsLoaded {
                user: UserId(9),
                page: page(vec![post(1, 9)]),
            },
        );
        reduce(&mut s, PostsAction::Deleted(PostId(1)));
        assert!(s.all_posts().all(|p| p.id != PostId(1)));
        assert_eq!(s.feed.items.len(), 1);
    }

    #[test]
    fn created_post_lands_on_top() {
        let mut s = PostsState::default();
        reduce(&mut s, PostsAction::FeedLoaded(page(vec![post(1, 9)])));
        reduce(&mut s, PostsAction::Created(post(5, 9)));
        assert_eq!(s.feed.items[0].id, PostId(5));
    }

    #[test]
    fn author_follow_fans_out() {
        let mut s = PostsState::default();
        reduce(&mut s, PostsAction::FeedLoaded(page(vec![post(1, 9), post(2, 4)])));
        reduce(
            &mut s,
            PostsAction::AuthorFollowChanged {
                user: UserId(9),
                is_following: true,
            },
        );
        assert!(s.feed.items[0].user.is_following);
        assert!(!s.feed.items[1].user.is_following);
    }
}
