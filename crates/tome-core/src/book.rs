//! Reader and book entities, plus the boundary validation that keeps bad
//! input away from the pacing calculator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, clock::calendar_days_between};

// ─── Reader ──────────────────────────────────────────────────────────────────

/// The owner of zero or more books. Credentials live with the transport
/// layer; the core only ever sees a resolved reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reader {
  pub reader_id:  Uuid,
  pub username:   String,
  pub created_at: DateTime<Utc>,
}

// ─── Book ────────────────────────────────────────────────────────────────────

/// A reading effort: one physical book, one committed finish date.
///
/// Books are never hard-deleted; `archived_at` soft-deletes them and can be
/// cleared to restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
  pub book_id:      Uuid,
  pub reader_id:    Uuid,
  pub title:        String,
  pub author:       String,
  /// Total pages; at least 1.
  pub page_count:   u32,
  /// Invariant: `current_page <= page_count`.
  pub current_page: u32,
  /// Server-assigned at creation; display only.
  pub start_date:   DateTime<Utc>,
  /// The committed finish date — local midnight in the reader's timezone,
  /// canonicalised to a UTC instant.
  pub target_date:  DateTime<Utc>,
  /// Carried through snapshots for a future rate-based mode; never read by
  /// the pacing computation.
  pub rate_goal:    Option<u32>,
  pub archived_at:  Option<DateTime<Utc>>,
}

impl Book {
  pub fn is_archived(&self) -> bool { self.archived_at.is_some() }

  pub fn is_finished(&self) -> bool { self.current_page == self.page_count }
}

// ─── NewBook ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::BookStore::add_book`].
/// `book_id` and `start_date` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewBook {
  pub reader_id:    Uuid,
  pub title:        String,
  pub author:       String,
  pub page_count:   u32,
  pub current_page: u32,
  pub target_date:  DateTime<Utc>,
  pub rate_goal:    Option<u32>,
}

impl NewBook {
  /// Field-level validation, applied before anything is persisted.
  ///
  /// A book must have something left to read (`current_page < page_count`)
  /// and a target date no earlier than today, so the calculator never sees a
  /// finished book or a dead deadline at creation time.
  pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::invalid("title", "title can't be empty"));
    }
    if self.author.trim().is_empty() {
      return Err(Error::invalid("author", "author can't be empty"));
    }
    if self.page_count == 0 {
      return Err(Error::invalid("page_count", "page count must be at least 1"));
    }
    if self.current_page >= self.page_count {
      return Err(Error::invalid(
        "current_page",
        "starting page must be less than the total page count",
      ));
    }
    if calendar_days_between(self.target_date, now) < 0 {
      return Err(Error::invalid(
        "target_date",
        "target date can't be in the past",
      ));
    }
    Ok(())
  }
}

// ─── Progress updates ────────────────────────────────────────────────────────

/// Validate a page-progress update against the book it applies to.
pub fn validate_progress(book: &Book, new_page: u32) -> Result<()> {
  if new_page > book.page_count {
    return Err(Error::invalid(
      "current_page",
      format!(
        "page {new_page} is beyond the end of the book ({} pages)",
        book.page_count
      ),
    ));
  }
  Ok(())
}
