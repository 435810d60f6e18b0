//! Daily-target records — the persisted output of the pacing calculator.
//!
//! Targets are append-only: recomputation supersedes the previous row by
//! writing a newer one, and "current" is simply the most recent row for the
//! book. A target is never patched in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::book::Book;

/// The book fields captured at calculation time. Used only to decide whether
/// the target is still valid; never recomputed retroactively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshot {
  pub current_page: u32,
  pub page_count:   u32,
  pub target_date:  DateTime<Utc>,
  pub rate_goal:    Option<u32>,
}

impl TargetSnapshot {
  /// Capture the live fields of `book`.
  pub fn of(book: &Book) -> Self {
    Self {
      current_page: book.current_page,
      page_count:   book.page_count,
      target_date:  book.target_date,
      rate_goal:    book.rate_goal,
    }
  }
}

/// A computed pacing checkpoint: the page the reader should reach by the end
/// of the calendar day of `calculated_at` to finish on time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTarget {
  pub target_id:     Uuid,
  pub book_id:       Uuid,
  pub target_page:   u32,
  /// The instant this target was computed. Supplied by the caller's
  /// [`crate::clock::Clock`], not by the store, so freshness rules stay
  /// testable against a pinned clock.
  pub calculated_at: DateTime<Utc>,
  pub snapshot:      TargetSnapshot,
}

/// Input to [`crate::store::BookStore::record_target`].
/// `target_id` is always set by the store.
#[derive(Debug, Clone)]
pub struct NewTarget {
  pub book_id:       Uuid,
  pub target_page:   u32,
  pub calculated_at: DateTime<Utc>,
  pub snapshot:      TargetSnapshot,
}
