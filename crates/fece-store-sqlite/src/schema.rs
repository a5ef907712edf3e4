//! SQL schema for the FECE SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` pragma.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS years (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    year        INTEGER NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; store-assigned
);

CREATE TABLE IF NOT EXISTS songs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    fartist     TEXT NOT NULL,
    bio         TEXT NOT NULL DEFAULT '',
    lyrics      TEXT NOT NULL DEFAULT '',
    audio_url   TEXT NOT NULL,
    year_id     INTEGER NOT NULL REFERENCES years(id),
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS submissions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    fartist         TEXT NOT NULL,
    email           TEXT,
    bio             TEXT,
    lyrics          TEXT,
    audio_url       TEXT NOT NULL,
    audio_file_name TEXT NOT NULL DEFAULT 'audio.mp3',
    status          TEXT NOT NULL DEFAULT 'PENDING',  -- PENDING | APPROVED | REJECTED
    target_year     INTEGER,         -- denormalised year number, set on approval
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS songs_year_idx          ON songs(year_id);
CREATE INDEX IF NOT EXISTS songs_created_idx       ON songs(created_at);
CREATE INDEX IF NOT EXISTS submissions_status_idx  ON submissions(status);

PRAGMA user_version = 1;
";
