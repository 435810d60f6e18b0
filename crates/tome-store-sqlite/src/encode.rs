//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Page numbers are plain INTEGER columns.

use chrono::{DateTime, Utc};
use tome_core::{
  book::{Book, Reader},
  target::{DailyTarget, TargetSnapshot},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `readers` row.
pub struct RawReader {
  pub reader_id:  String,
  pub username:   String,
  pub created_at: String,
}

impl RawReader {
  pub fn into_reader(self) -> Result<Reader> {
    Ok(Reader {
      reader_id:  decode_uuid(&self.reader_id)?,
      username:   self.username,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `books` row.
pub struct RawBook {
  pub book_id:      String,
  pub reader_id:    String,
  pub title:        String,
  pub author:       String,
  pub page_count:   u32,
  pub current_page: u32,
  pub start_date:   String,
  pub target_date:  String,
  pub rate_goal:    Option<u32>,
  pub archived_at:  Option<String>,
}

impl RawBook {
  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      book_id:      decode_uuid(&self.book_id)?,
      reader_id:    decode_uuid(&self.reader_id)?,
      title:        self.title,
      author:       self.author,
      page_count:   self.page_count,
      current_page: self.current_page,
      start_date:   decode_dt(&self.start_date)?,
      target_date:  decode_dt(&self.target_date)?,
      rate_goal:    self.rate_goal,
      archived_at:  self.archived_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw values read directly from a `daily_targets` row.
pub struct RawTarget {
  pub target_id:             String,
  pub book_id:               String,
  pub target_page:           u32,
  pub calculated_at:         String,
  pub snapshot_current_page: u32,
  pub snapshot_page_count:   u32,
  pub snapshot_target_date:  String,
  pub snapshot_rate_goal:    Option<u32>,
}

impl RawTarget {
  pub fn into_target(self) -> Result<DailyTarget> {
    Ok(DailyTarget {
      target_id:     decode_uuid(&self.target_id)?,
      book_id:       decode_uuid(&self.book_id)?,
      target_page:   self.target_page,
      calculated_at: decode_dt(&self.calculated_at)?,
      snapshot:      TargetSnapshot {
        current_page: self.snapshot_current_page,
        page_count:   self.snapshot_page_count,
        target_date:  decode_dt(&self.snapshot_target_date)?,
        rate_goal:    self.snapshot_rate_goal,
      },
    })
  }
}
