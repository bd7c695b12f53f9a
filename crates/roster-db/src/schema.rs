//! SQL schema for the roster database.
//!
//! Applied on every pool creation; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

use sqlx::SqlitePool;

/// Full schema DDL
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS members (
    id            TEXT PRIMARY KEY,
    display_name  TEXT,
    is_admin      INTEGER NOT NULL DEFAULT 0,  -- snapshot only
    updated_at    TEXT NOT NULL
);

-- Full replacement on every member update; no FK to roles because a role
-- can be deleted while members still reference it.
CREATE TABLE IF NOT EXISTS member_roles (
    member_id  TEXT NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    role_id    TEXT NOT NULL,
    PRIMARY KEY (member_id, role_id)
);

CREATE TABLE IF NOT EXISTS roles (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    permissions  INTEGER NOT NULL DEFAULT 0,   -- platform bitmask, opaque
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS birthdays (
    user_id        TEXT PRIMARY KEY,
    date           TEXT NOT NULL,               -- YYYY-MM-DD
    registered_by  TEXT,
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS member_roles_role_idx ON member_roles(role_id);
CREATE INDEX IF NOT EXISTS birthdays_date_idx    ON birthdays(date);
";

/// Run the schema against a pool
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
