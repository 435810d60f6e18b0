//! The pacing calculator: how far should the reader be by the end of today?

use chrono::{DateTime, Utc};

use crate::clock::calendar_days_between;

/// Compute the page the reader should reach by the end of today to finish by
/// `target_date`.
///
/// The day count is inclusive of both today and the target date: a book due
/// today has one day left. `days_left` is clamped to a minimum of 1, since a
/// deadline already in the past must not divide by zero or a negative count.
/// Reporting a missed deadline is the status classifier's job, not this
/// function's.
///
/// For any valid book state the result is within
/// `[current_page, page_count]`; a finished book keeps its current page
/// rather than producing a target past the end.
pub fn target_page(
  current_page: u32,
  page_count: u32,
  target_date: DateTime<Utc>,
  now: DateTime<Utc>,
) -> u32 {
  let pages_left = page_count.saturating_sub(current_page);
  if pages_left == 0 {
    return current_page;
  }

  let days_left = (calendar_days_between(target_date, now) + 1).max(1) as u32;
  let pages_per_day = pages_left.div_ceil(days_left);

  current_page + pages_per_day
}
