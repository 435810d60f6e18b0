//! The staleness policy: when must a stored daily target be recomputed?

use chrono::{DateTime, Utc};

use crate::{book::Book, clock::same_calendar_day, target::DailyTarget};

/// Whether `latest` is still a valid target for `book` right now.
///
/// A target is stale when:
/// - no target has been computed yet, or
/// - it was computed on a different calendar day (date truncation, not a
///   24-hour window), or
/// - the book's target date no longer matches the snapshot (the reader moved
///   their goal since the calculation).
///
/// This check gates every read: status must never be derived from a target
/// that any of these conditions invalidates.
pub fn is_stale(
  book: &Book,
  latest: Option<&DailyTarget>,
  now: DateTime<Utc>,
) -> bool {
  let Some(target) = latest else {
    return true;
  };

  !same_calendar_day(target.calculated_at, now)
    || target.snapshot.target_date != book.target_date
}
