use std::sync::{Mutex, MutexGuard, PoisonError};

use vibelink_shared::models::{AuthTokens, Settings};
use vibelink_store::{Database, StoreError};

/// Durable client-side state: the token pair and the settings snapshot.
pub trait LocalState: Send + Sync {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), StoreError>;
    fn load_tokens(&self) -> Result<Option<AuthTokens>, StoreError>;
    fn clear_tokens(&self) -> Result<(), StoreError>;
    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;
    fn load_settings(&self) -> Result<Option<Settings>, StoreError>;
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// SQLite-backed storage.
pub struct SqliteState {
    db: Mutex<Database>,
}

impl SqliteState {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }
}

impl LocalState for SqliteState {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), StoreError> {
        lock(&self.db).save_tokens(tokens)
    }

    fn load_tokens(&self) -> Result<Option<AuthTokens>, StoreError> {
        lock(&self.db).load_tokens()
    }

    fn clear_tokens(&self) -> Result<(), StoreError> {
        lock(&self.db).clear_tokens()
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        lock(&self.db).save_settings_snapshot(settings)
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(lock(&self.db).load_settings_snapshot()?.map(|s| s.settings))
    }
}

/// Process-local storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryState {
    tokens: Mutex<Option<AuthTokens>>,
    settings: Mutex<Option<Settings>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
            settings: Mutex::new(None),
        }
    }
}

impl LocalState for MemoryState {
    fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), StoreError> {
        *lock(&self.tokens) = Some(tokens.clone());
        Ok(())
    }

    fn load_tokens(&self) -> Result<Option<AuthTokens>, StoreError> {
        Ok(lock(&self.tokens).clone())
    }

    fn clear_tokens(&self) -> Result<(), StoreError> {
        *lock(&self.tokens) = None;
        Ok(())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        *lock(&self.settings) = Some(settings.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
        Ok(lock(&self.settings).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_state_round_trips_tokens() {
        let state = SqliteState::new(Database::open_in_memory().unwrap());
        let pair = AuthTokens {
            access: "a".into(),
            refresh: "r".into(),
        };
        state.save_tokens(&pair).unwrap();
        assert_eq!(state.load_tokens().unwrap(), Some(pair));
        state.clear_tokens().unwrap();
        assert_eq!(state.load_tokens().unwrap(), None);
    }
}
