//! v001 -- Initial schema creation.
//!
//! Creates `credentials` (key/value session storage) and `settings_snapshot`
//! (a single-row JSON document).

use rusqlite::Connection;

const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Credentials
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS credentials (
    key        TEXT PRIMARY KEY NOT NULL,   -- 'accessToken' | 'refreshToken'
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL                -- RFC-3339
);

-- ----------------------------------------------------------------
-- Settings snapshot
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS settings_snapshot (
    id       INTEGER PRIMARY KEY CHECK (id = 1),
    json     TEXT NOT NULL,
    saved_at TEXT NOT NULL
);
"#;

pub fn up(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(UP_SQL)
}
