//! SQL schema for the ScriptGo SQLite store.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS accounts (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    full_name     TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    created_at    TEXT NOT NULL     -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS scripts (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES accounts(user_id) ON DELETE CASCADE,
    title           TEXT NOT NULL DEFAULT '',
    content         TEXT,            -- JSON rows / days, or legacy text
    platform        TEXT NOT NULL DEFAULT 'YouTube',
    topic           TEXT NOT NULL DEFAULT '',
    tone            TEXT NOT NULL DEFAULT 'Professional',
    length          TEXT NOT NULL DEFAULT '60s',
    language        TEXT NOT NULL DEFAULT 'English',
    framework       TEXT NOT NULL DEFAULT 'None',
    target_audience TEXT,
    calendar_days   INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS scripts_owner_idx ON scripts(user_id, created_at);

PRAGMA user_version = 1;
";

/// Columns the read path expects on `scripts`. Any of these missing from a
/// result set is reported by
/// [`ScriptStore::list_scripts`](scriptgo_core::store::ScriptStore::list_scripts).
pub const EXPECTED_SCRIPT_COLUMNS: &[&str] = &[
  "id",
  "user_id",
  "title",
  "content",
  "platform",
  "topic",
  "tone",
  "length",
  "language",
  "framework",
  "target_audience",
  "calendar_days",
  "created_at",
  "updated_at",
];
