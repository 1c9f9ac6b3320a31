//! Application state container.
//!
//! [`AppState`] holds one slice per domain. Slices change only through
//! [`Action`]s applied by [`reduce`], and only the [`Store`] calls `reduce`.
//! Views subscribe to the store's version counter and re-read on change.

pub mod auth;
pub mod chat;
pub mod email_notifications;
pub mod notifications;
pub mod posts;
pub mod search;
pub mod settings;
pub mod social;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

pub use auth::{AuthAction, AuthState};
pub use chat::{ChatAction, ChatState};
pub use email_notifications::{EmailAction, EmailNotificationsState};
pub use notifications::{NotificationsAction, NotificationsState};
pub use posts::{PostsAction, PostsState};
pub use search::{SearchAction, SearchState};
pub use settings::{SettingsAction, SettingsState};
pub use social::{SocialAction, SocialState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub posts: PostsState,
    pub chat: ChatState,
    pub social: SocialState,
    pub notifications: NotificationsState,
    pub email_notifications: EmailNotificationsState,
    pub settings: SettingsState,
    pub search: SearchState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Posts(PostsAction),
    Chat(ChatAction),
    Social(SocialAction),
    Notifications(NotificationsAction),
    EmailNotifications(EmailAction),
    Settings(SettingsAction),
    Search(SearchAction),
    /// Logout or expiry: every slice back to its default.
    SessionEnded,
}

/// Apply one action. Pure apart from mutating `state`.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::Auth(a) => auth::reduce(&mut state.auth, a),
        Action::Posts(a) => posts::reduce(&mut state.posts, a),
        Action::Chat(a) => chat::reduce(&mut state.chat, a),
        Action::Social(a) => {
            // Follow changes also show on post author cards.
            if let SocialAction::FollowConfirmed { user, result } = &a {
                posts::reduce(
                    &mut state.posts,
                    PostsAction::AuthorFollowChanged {
                        user: *user,
                        is_following: result.is_following,
                    },
                );
            }
            social::reduce(&mut state.social, a);
        }
        Action::Notifications(a) => notifications::reduce(&mut state.notifications, a),
        Action::EmailNotifications(a) => email_notifications::reduce(&mut state.email_notifications, a),
        Action::Settings(a) => settings::reduce(&mut state.settings, a),
        Action::Search(a) => search::reduce(&mut state.search, a),
        Action::SessionEnded => {
            *state = AppState::default();
            // Storage has been checked; the app should show the login screen.
            state.auth.is_initialized = true;
        }
    }
}

/// Shared handle to the application state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Mutex<AppState>>,
    version: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(AppState::default())),
            version: Arc::new(version),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn dispatch(&self, action: Action) {
        {
            let mut state = self.lock();
            reduce(&mut state, action);
        }
        self.version.send_modify(|v| *v += 1);
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock())
    }

    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }

    /// Bumped after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_end_resets_every_slice() {
        let store = Store::new();
        store.dispatch(Action::Search(SearchAction::QueryChanged("ana".into())));
        store.dispatch(Action::Notifications(NotificationsAction::Failed("x".into())));
        store.dispatch(Action::SessionEnded);

        let state = store.snapshot();
        assert_eq!(state.search, SearchState::default());
        assert_eq!(state.notifications, NotificationsState::default());
        assert!(state.auth.is_initialized);
        assert!(state.auth.user.is_none());
    }

    #[test]
    fn dispatch_bumps_version() {
        let store = Store::new();
        let rx = store.subscribe();
        store.dispatch(Action::Search(SearchAction::Closed));
        store.dispatch(Action::Search(SearchAction::Closed));
        assert_eq!(*rx.borrow(), 2);
    }
}
