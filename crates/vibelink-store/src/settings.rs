use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use vibelink_shared::models::Settings;

use crate::database::Database;
use crate::error::Result;

/// Settings as last written locally.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    pub settings: Settings,
    pub saved_at: DateTime<Utc>,
}

impl Database {
    pub fn save_settings_snapshot(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.conn().execute(
            "INSERT INTO settings_snapshot (id, json, saved_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET json = excluded.json, saved_at = excluded.saved_at",
            params![json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn load_settings_snapshot(&self) -> Result<Option<SettingsSnapshot>> {
        let row = self
            .conn()
            .query_row(
                "SELECT json, saved_at FROM settings_snapshot WHERE id = 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        let Some((json, saved_at)) = row else {
            return Ok(None);
        };

        let settings: Settings = serde_json::from_str(&json)?;
        let saved_at = DateTime::parse_from_rfc3339(&saved_at)?.with_timezone(&Utc);

        Ok(Some(SettingsSnapshot { settings, saved_at }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibelink_shared::models::Theme;

    #[test]
    fn snapshot_overwrites_single_row() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_settings_snapshot().unwrap().is_none());

        let mut s = Settings::default();
        db.save_settings_snapshot(&s).unwrap();
        s.appearance.theme = Theme::Dark;
        db.save_settings_snapshot(&s).unwrap();

        let snap = db.load_settings_snapshot().unwrap().unwrap();
        assert_eq!(snap.settings.appearance.theme, Theme::Dark);

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM settings_snapshot", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO settings_snapshot (id, json, saved_at) VALUES (1, '{oops', ?1)",
                params![Utc::now().to_rfc3339()],
            )
            .unwrap();
        assert!(db.load_settings_snapshot().is_err());
    }
}
