use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use vibelink_shared::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use vibelink_shared::models::AuthTokens;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Persist both tokens atomically, replacing any previous pair.
    pub fn save_tokens(&mut self, tokens: &AuthTokens) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn_mut().transaction()?;
        for (key, value) in [
            (ACCESS_TOKEN_KEY, &tokens.access),
            (REFRESH_TOKEN_KEY, &tokens.refresh),
        ] {
            tx.execute(
                "INSERT INTO credentials (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// The stored pair, or `None` unless both halves are present.
    pub fn load_tokens(&self) -> Result<Option<AuthTokens>> {
        let access = self.credential(ACCESS_TOKEN_KEY)?;
        let refresh = self.credential(REFRESH_TOKEN_KEY)?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(AuthTokens { access, refresh }),
            _ => None,
        })
    }

    pub fn clear_tokens(&self) -> Result<()> {
        self.conn().execute(
            "DELETE FROM credentials WHERE key IN (?1, ?2)",
            params![ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY],
        )?;
        Ok(())
    }

    fn credential(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM credentials WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}
