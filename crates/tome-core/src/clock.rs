//! Clock capability and calendar-day arithmetic.
//!
//! "Today" is pervasive in the pacing rules, so the current instant is always
//! obtained through the [`Clock`] trait rather than `Utc::now()` directly.
//! Tests pin time with [`FixedClock`]; production code uses [`SystemClock`].
//!
//! All calendar comparisons truncate to the UTC date. Target dates are
//! canonicalised to the reader's local midnight as a UTC instant at the
//! boundary (see [`zoned_date_to_utc`]), which keeps UTC truncation
//! consistent for both day counting and freshness checks.

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

// ─── Capability ──────────────────────────────────────────────────────────────

/// Source of the current instant. Object-safe so it can be shared as
/// `Arc<dyn Clock>` across handlers.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock that returns a preset instant, settable mid-test to simulate the
/// passage of calendar days.
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self {
    Self {
      now: Mutex::new(now),
    }
  }

  pub fn set(&self, now: DateTime<Utc>) {
    *self.now.lock().expect("clock poisoned") = now;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().expect("clock poisoned")
  }
}

// ─── Calendar arithmetic ─────────────────────────────────────────────────────

/// Difference in calendar days between two instants, `later - earlier`.
///
/// Date truncation, not a 24-hour window: 23:59 and 00:01 on consecutive
/// days are one calendar day apart. Negative when `later` is on an earlier
/// date.
pub fn calendar_days_between(
  later: DateTime<Utc>,
  earlier: DateTime<Utc>,
) -> i64 {
  later
    .date_naive()
    .signed_duration_since(earlier.date_naive())
    .num_days()
}

/// Whether two instants fall on the same calendar day.
pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
  a.date_naive() == b.date_naive()
}

/// Convert a calendar date chosen in the reader's browser to the UTC instant
/// of local midnight on that date.
///
/// `tz_offset_min` follows the JavaScript `Date.getTimezoneOffset()`
/// convention: minutes to add to local time to reach UTC (positive west of
/// Greenwich). UTC-5 submits `300`; local midnight there is 05:00 UTC.
pub fn zoned_date_to_utc(date: NaiveDate, tz_offset_min: i32) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
    + Duration::minutes(i64::from(tz_offset_min))
}
