use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::state::{Action, Store};

/// Session lifecycle notifications broadcast by [`crate::session::SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens installed after login or rehydration.
    Established,
    /// Access token replaced by a refresh.
    Refreshed,
    /// Refresh failed; the user must sign in again.
    Expired,
    /// Explicit logout.
    LoggedOut,
}

/// Reset the store whenever the session ends, whichever call noticed it.
pub fn spawn_session_watcher(
    mut events: broadcast::Receiver<SessionEvent>,
    store: Store,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                event = events.recv() => match event {
                    // The failing command may already have reset the store.
                    Ok(SessionEvent::Expired) if store.read(|s| s.auth.tokens.is_some()) => {
                        tracing::info!("session expired, resetting state");
                        store.dispatch(Action::SessionEnded);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "session watcher lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AuthAction;
    use vibelink_shared::models::AuthTokens;

    #[tokio::test]
    async fn expiry_resets_store() {
        let (tx, rx) = broadcast::channel(4);
        let store = Store::new();
        store.dispatch(Action::Auth(AuthAction::Initialized {
            user: None,
            tokens: Some(AuthTokens {
                access: "a".into(),
                refresh: "r".into(),
            }),
        }));
        let mut version = store.subscribe();
        let shutdown = CancellationToken::new();
        let handle = spawn_session_watcher(rx, store.clone(), shutdown.clone());

        tx.send(SessionEvent::Expired).unwrap();
        version.changed().await.unwrap();
        assert!(store.read(|s| s.auth.tokens.is_none() && s.auth.is_initialized));

        shutdown.cancel();
        handle.await.unwrap();
    }
}
