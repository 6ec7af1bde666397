//! SQL schema for the parties/cases store.

use crate::db::DbPool;
use crate::error::Result;
use tracing::info;

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS parties (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE
);

-- Cases are append-only; repeated lookups add fresh rows.
CREATE TABLE IF NOT EXISTS cases (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    case_number  TEXT NOT NULL,
    plaintiff    TEXT,
    defendant    TEXT,
    subject      TEXT,
    last_event   TEXT,
    detail_link  TEXT,
    created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    party_id     INTEGER NOT NULL REFERENCES parties(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS parties_name_idx      ON parties(name);
CREATE INDEX IF NOT EXISTS cases_case_number_idx ON cases(case_number);
CREATE INDEX IF NOT EXISTS cases_party_idx       ON cases(party_id);

CREATE TRIGGER IF NOT EXISTS cases_touch_updated_at
AFTER UPDATE ON cases
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE cases
    SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE id = NEW.id;
END;
";

/// Apply the schema to the pool's database
pub async fn init_schema(pool: &DbPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("Database schema ready (tables: parties, cases)");
    Ok(())
}
