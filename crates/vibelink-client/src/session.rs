//! Bearer-token session handling.
//!
//! Every authenticated call goes through [`SessionManager::execute`]. A 401
//! on an ordinary request triggers one refresh and one replay; a 401 from
//! the refresh endpoint, a failed refresh, or a network error while
//! refreshing ends the session.

use std::sync::{Arc, PoisonError, RwLock};

use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use vibelink_shared::constants::TOKEN_REFRESH_PATH;
use vibelink_shared::error::ApiError;
use vibelink_shared::models::AuthTokens;
use vibelink_shared::protocol::{RefreshRequest, RefreshResponse, Validate};

use crate::events::SessionEvent;
use crate::http::{ApiRequest, ApiResponse, Transport};
use crate::local::LocalState;

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    local: Arc<dyn LocalState>,
    tokens: RwLock<Option<AuthTokens>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, local: Arc<dyn LocalState>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            local,
            tokens: RwLock::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn tokens(&self) -> Option<AuthTokens> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_some()
    }

    /// Load a persisted pair into memory. Storage errors count as "no session".
    pub fn rehydrate(&self) -> Option<AuthTokens> {
        let stored = match self.local.load_tokens() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored tokens");
                None
            }
        };
        self.set_tokens(stored.clone());
        if stored.is_some() {
            self.emit(SessionEvent::Established);
        }
        stored
    }

    /// Install a fresh pair (login) and persist it.
    pub fn install_tokens(&self, tokens: AuthTokens) {
        self.persist(&tokens);
        self.set_tokens(Some(tokens));
        self.emit(SessionEvent::Established);
    }

    /// Drop the session on explicit logout.
    pub fn clear(&self) {
        self.wipe();
        self.emit(SessionEvent::LoggedOut);
    }

    pub fn attach_credentials(&self, request: &mut ApiRequest) {
        if let Some(tokens) = self.tokens() {
            request.bearer = Some(tokens.access);
        }
    }

    /// Send with credentials, refreshing and replaying once on 401.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.attach_credentials(&mut request);
        let response = self.transport.send(&request).await?;

        if response.status != 401 {
            return response.into_result();
        }

        if request.is_refresh() {
            self.expire("refresh endpoint rejected credentials");
            return Err(ApiError::SessionExpired);
        }

        if request.retried {
            return Err(ApiError::Unauthorized);
        }

        let Some(refresh) = self.tokens().map(|t| t.refresh) else {
            return Err(ApiError::Unauthorized);
        };

        match self.refresh(&refresh).await {
            Ok(tokens) => {
                request.retried = true;
                request.bearer = Some(tokens.access);
                tracing::debug!(path = %request.target, "replaying request after refresh");
                self.transport.send(&request).await?.into_result()
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                self.expire("refresh failed");
                Err(ApiError::SessionExpired)
            }
        }
    }

    /// Send without credentials or refresh handling (sign-in, registration,
    /// OTP).
    pub async fn execute_public(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.send(&request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_credentials_status(
                response.status,
                &response.body,
            ))
        }
    }

    pub async fn call_public<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute_public(request).await?.decode()
    }

    /// Execute and decode a validated payload.
    pub async fn call<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Validate,
    {
        let value: T = self.execute(request).await?.decode()?;
        value.validate()?;
        Ok(value)
    }

    /// Execute and decode without boundary validation.
    pub async fn call_raw<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.decode()
    }

    /// Execute, discarding the body.
    pub async fn call_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }

    async fn refresh(&self, refresh: &str) -> Result<AuthTokens, ApiError> {
        let request = ApiRequest::post(TOKEN_REFRESH_PATH).json(&RefreshRequest {
            refresh: refresh.to_string(),
        })?;

        let response = self.transport.send(&request).await?.into_result()?;
        let tokens = response.decode::<RefreshResponse>()?.into_tokens(refresh);

        self.persist(&tokens);
        self.set_tokens(Some(tokens.clone()));
        tracing::info!("access token refreshed");
        self.emit(SessionEvent::Refreshed);
        Ok(tokens)
    }

    fn expire(&self, reason: &str) {
        tracing::info!(reason, "session expired");
        self.wipe();
        self.emit(SessionEvent::Expired);
    }

    fn wipe(&self) {
        if let Err(e) = self.local.clear_tokens() {
            tracing::warn!(error = %e, "could not clear stored tokens");
        }
        self.set_tokens(None);
    }

    fn persist(&self, tokens: &AuthTokens) {
        if let Err(e) = self.local.save_tokens(tokens) {
            tracing::warn!(error = %e, "could not persist tokens");
        }
    }

    fn set_tokens(&self, tokens: Option<AuthTokens>) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = tokens;
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
