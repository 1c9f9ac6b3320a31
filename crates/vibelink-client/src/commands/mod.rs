//! Client operations.
//!
//! Each sub-module adds the operations of one domain to [`crate::Client`].
//! An operation marks its slice as loading, calls the API, and dispatches
//! the outcome. Failures are written to the slice's `error` field and also
//! returned. A [`ApiError::SessionExpired`] resets the whole store instead.

pub mod auth;
pub mod chat;
pub mod email_notifications;
pub mod notifications;
pub mod posts;
pub mod search;
pub mod settings;
pub mod social;

use vibelink_shared::error::ApiError;

use crate::state::{Action, AuthAction};
use crate::Client;

impl Client {
    /// Record `error` and hand it back for the caller to return.
    pub(crate) fn fail(&self, error: ApiError, to_slice: impl FnOnce(String) -> Action) -> ApiError {
        if error.is_session_fatal() {
            self.store.dispatch(Action::SessionEnded);
            self.store
                .dispatch(Action::Auth(AuthAction::Failed(error.clone())));
        } else {
            self.store.dispatch(to_slice(error.user_message()));
        }
        error
    }
}
