use vibelink_shared::error::ApiError;
use vibelink_shared::models::UserProfile;

use crate::api;
use crate::api::auth::{ProfileUpdate, Registration};
use crate::state::{Action, AuthAction};
use crate::Client;

impl Client {
    fn auth_failed(&self, error: ApiError) -> ApiError {
        if error.is_session_fatal() {
            self.store.dispatch(Action::SessionEnded);
        }
        self.store
            .dispatch(Action::Auth(AuthAction::Failed(error.clone())));
        error
    }

    /// Create an account. The server then mails an OTP to verify it.
    pub async fn register(&self, registration: Registration) -> Result<(), ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        let submitted = registration.email.clone();
        let ack = api::auth::register(&self.session, registration)
            .await
            .map_err(|e| self.auth_failed(e))?;

        let email = ack.email.unwrap_or(submitted);
        tracing::info!(%email, "account registered, awaiting OTP");
        self.store
            .dispatch(Action::Auth(AuthAction::Registered { email }));
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        let outcome = api::auth::login(&self.session, email, password)
            .await
            .map_err(|e| self.auth_failed(e))?;

        self.session.install_tokens(outcome.tokens.clone());

        // Older servers answer with the bare token pair.
        let user = match outcome.user {
            Some(user) => Some(user),
            None => match api::auth::fetch_user(&self.session).await {
                Ok(user) => Some(user),
                Err(e) if e.is_session_fatal() => return Err(self.auth_failed(e)),
                Err(e) => {
                    tracing::warn!(error = %e, "signed in but could not load profile");
                    None
                }
            },
        };

        // The profile fetch may have refreshed or expired the pair.
        let Some(tokens) = self.session.tokens() else {
            return Err(self.auth_failed(ApiError::SessionExpired));
        };

        tracing::info!(%email, "signed in");
        self.store.dispatch(Action::Auth(AuthAction::LoggedIn {
            user,
            tokens,
        }));
        Ok(())
    }

    pub async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        api::auth::send_otp(&self.session, email)
            .await
            .map_err(|e| self.auth_failed(e))?;
        self.store.dispatch(Action::Auth(AuthAction::OtpSent {
            email: email.to_string(),
        }));
        Ok(())
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        api::auth::verify_otp(&self.session, email, otp.trim())
            .await
            .map_err(|e| self.auth_failed(e))?;
        tracing::info!(%email, "email verified");
        self.store.dispatch(Action::Auth(AuthAction::OtpVerified));
        Ok(())
    }

    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        let user = api::auth::fetch_user(&self.session)
            .await
            .map_err(|e| self.auth_failed(e))?;
        self.store
            .dispatch(Action::Auth(AuthAction::ProfileLoaded(user.clone())));
        Ok(user)
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.store.dispatch(Action::Auth(AuthAction::Pending));
        let user = api::auth::update_profile(&self.session, update)
            .await
            .map_err(|e| self.auth_failed(e))?;
        self.store
            .dispatch(Action::Auth(AuthAction::ProfileLoaded(user.clone())));
        Ok(user)
    }

    /// Restore a stored session and load its profile. Any failure logs the
    /// user out. Returns whether a session is active afterwards.
    pub async fn initialize(&self) -> bool {
        let Some(tokens) = self.session.rehydrate() else {
            self.store.dispatch(Action::Auth(AuthAction::Initialized {
                user: None,
                tokens: None,
            }));
            return false;
        };

        self.store.dispatch(Action::Auth(AuthAction::Initialized {
            user: None,
            tokens: Some(tokens),
        }));

        match api::auth::fetch_user(&self.session).await {
            Ok(user) => {
                tracing::info!(user = %user.username, "session restored");
                self.store
                    .dispatch(Action::Auth(AuthAction::ProfileLoaded(user)));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored session unusable, logging out");
                self.logout();
                false
            }
        }
    }

    pub fn logout(&self) {
        self.session.clear();
        self.store.dispatch(Action::SessionEnded);
        tracing::info!("signed out");
    }

    pub fn clear_auth_error(&self) {
        self.store.dispatch(Action::Auth(AuthAction::ClearError));
    }

    pub fn clear_otp(&self) {
        self.store.dispatch(Action::Auth(AuthAction::ClearOtp));
    }
}
