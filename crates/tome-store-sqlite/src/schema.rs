//! SQL schema for the Tome SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS readers (
    reader_id   TEXT PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books (
    book_id      TEXT PRIMARY KEY,
    reader_id    TEXT NOT NULL REFERENCES readers(reader_id),
    title        TEXT NOT NULL,
    author       TEXT NOT NULL,
    page_count   INTEGER NOT NULL,
    current_page INTEGER NOT NULL DEFAULT 0,
    start_date   TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    target_date  TEXT NOT NULL,   -- local midnight canonicalised to UTC
    rate_goal    INTEGER,         -- reserved for a rate-based mode
    archived_at  TEXT             -- NULL while actively being read
);

-- Daily targets are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table; the current
-- target for a book is the newest row by calculated_at.
CREATE TABLE IF NOT EXISTS daily_targets (
    target_id             TEXT PRIMARY KEY,
    book_id               TEXT NOT NULL REFERENCES books(book_id),
    target_page           INTEGER NOT NULL,
    calculated_at         TEXT NOT NULL,
    snapshot_current_page INTEGER NOT NULL,
    snapshot_page_count   INTEGER NOT NULL,
    snapshot_target_date  TEXT NOT NULL,
    snapshot_rate_goal    INTEGER
);

CREATE INDEX IF NOT EXISTS books_reader_idx   ON books(reader_id);
CREATE INDEX IF NOT EXISTS targets_book_idx   ON daily_targets(book_id, calculated_at);

PRAGMA user_version = 1;
";
