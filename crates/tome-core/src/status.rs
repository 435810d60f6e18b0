//! The status classifier — maps a book and its current daily target to a
//! display status.
//!
//! The status is a plain tagged enum carrying only the data a presentation
//! layer needs; colors and icons are fixed per tier and informational only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{book::Book, target::DailyTarget};

// ─── Status ──────────────────────────────────────────────────────────────────

/// One of four mutually exclusive tiers, in classification precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum ReadingStatus {
  /// The book is finished. Terminal regardless of dates.
  Complete,
  /// Today's checkpoint has not been reached yet.
  Behind {
    target_page:     u32,
    /// Pages between the reader and the checkpoint; always positive here.
    pages_to_target: u32,
  },
  /// Unfinished, caught up for today, but the deadline has passed; the only
  /// way forward is a new target date.
  Overdue,
  /// At or past today's checkpoint with the deadline still ahead.
  OnTrack,
}

/// Classify `book` against its current `target`, in strict precedence order:
/// Complete, then Behind, then Overdue, then OnTrack.
///
/// The caller is responsible for handing in a fresh target (see
/// [`crate::staleness::is_stale`]); classification itself never recomputes.
/// Passed deadlines surface here as [`ReadingStatus::Overdue`] rather than in
/// the calculator.
pub fn classify(
  book: &Book,
  target: &DailyTarget,
  now: DateTime<Utc>,
) -> ReadingStatus {
  if book.current_page == book.page_count {
    return ReadingStatus::Complete;
  }
  if book.current_page < target.target_page {
    return ReadingStatus::Behind {
      target_page:     target.target_page,
      pages_to_target: target.target_page - book.current_page,
    };
  }
  if book.current_page < book.page_count && book.target_date < now {
    return ReadingStatus::Overdue;
  }
  ReadingStatus::OnTrack
}

impl ReadingStatus {
  /// The user-facing message for this tier.
  pub fn message(&self) -> String {
    match self {
      Self::Complete => "You've completed the book — congrats!".to_string(),
      Self::Behind { target_page, .. } => {
        format!("Read to page {target_page} to stay on track")
      }
      Self::Overdue => "Pick a new target date to get back on track".to_string(),
      Self::OnTrack => "You've read enough today to stay on track".to_string(),
    }
  }

  pub fn color(&self) -> StatusColor {
    match self {
      Self::Complete => StatusColor::Gold,
      Self::Behind { .. } => StatusColor::Blue,
      Self::Overdue => StatusColor::Gray,
      Self::OnTrack => StatusColor::Green,
    }
  }

  pub fn icon(&self) -> StatusIcon {
    match self {
      Self::Complete => StatusIcon::Star,
      Self::Behind { .. } => StatusIcon::Counter,
      Self::Overdue => StatusIcon::Exclamation,
      Self::OnTrack => StatusIcon::Check,
    }
  }

  /// Pages still to read to hit today's checkpoint; zero in every tier but
  /// [`ReadingStatus::Behind`].
  pub fn pages_to_target(&self) -> u32 {
    match self {
      Self::Behind { pages_to_target, .. } => *pages_to_target,
      _ => 0,
    }
  }
}

// ─── Presentation mapping ────────────────────────────────────────────────────

/// Fixed display color per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
  Gold,
  Blue,
  Gray,
  Green,
}

/// An HSL triple for progress-ring rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
  /// Hue in degrees.
  pub h: f32,
  /// Saturation percentage.
  pub s: f32,
  /// Lightness percentage.
  pub l: f32,
}

impl StatusColor {
  pub fn hsl(&self) -> Hsl {
    match self {
      Self::Gold => Hsl { h: 43.0, s: 96.4, l: 56.3 },
      Self::Blue => Hsl { h: 217.0, s: 91.2, l: 59.8 },
      Self::Gray => Hsl { h: 215.0, s: 13.8, l: 34.1 },
      Self::Green => Hsl { h: 158.0, s: 64.4, l: 51.6 },
    }
  }
}

/// Icon category per tier. [`StatusIcon::Counter`] renders the remaining
/// page count instead of a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusIcon {
  Star,
  Counter,
  Exclamation,
  Check,
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use uuid::Uuid;

  use super::*;
  use crate::target::TargetSnapshot;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()
  }

  fn book_with(current_page: u32, target_date: DateTime<Utc>) -> Book {
    Book {
      book_id:      Uuid::new_v4(),
      reader_id:    Uuid::new_v4(),
      title:        "Middlemarch".into(),
      author:       "George Eliot".into(),
      page_count:   300,
      current_page,
      start_date:   now() - Duration::days(10),
      target_date,
      rate_goal:    None,
      archived_at:  None,
    }
  }

  fn target_with(book: &Book, target_page: u32) -> DailyTarget {
    DailyTarget {
      target_id: Uuid::new_v4(),
      book_id: book.book_id,
      target_page,
      calculated_at: now(),
      snapshot: TargetSnapshot::of(book),
    }
  }

  #[test]
  fn complete_wins_regardless_of_dates() {
    // Even with the deadline a month gone, a finished book is Complete.
    let book = book_with(300, now() - Duration::days(30));
    let target = target_with(&book, 300);
    assert_eq!(classify(&book, &target, now()), ReadingStatus::Complete);
  }

  #[test]
  fn behind_reports_distance_to_checkpoint() {
    let book = book_with(10, now() + Duration::days(5));
    let target = target_with(&book, 28);
    let status = classify(&book, &target, now());
    assert_eq!(
      status,
      ReadingStatus::Behind {
        target_page:     28,
        pages_to_target: 18,
      }
    );
    assert_eq!(status.pages_to_target(), 18);
    assert_eq!(status.message(), "Read to page 28 to stay on track");
  }

  #[test]
  fn at_checkpoint_with_deadline_ahead_is_on_track() {
    let book = book_with(28, now() + Duration::days(5));
    let target = target_with(&book, 28);
    assert_eq!(classify(&book, &target, now()), ReadingStatus::OnTrack);
  }

  #[test]
  fn caught_up_past_deadline_is_overdue() {
    // Met today's (clamped) checkpoint but the target date was yesterday.
    let book = book_with(10, now() - Duration::days(1));
    let target = target_with(&book, 10);
    assert_eq!(classify(&book, &target, now()), ReadingStatus::Overdue);
  }

  #[test]
  fn behind_takes_precedence_over_overdue() {
    // Past the deadline and behind the checkpoint: Behind wins so the
    // message still names a concrete page.
    let book = book_with(10, now() - Duration::days(1));
    let target = target_with(&book, 300);
    assert!(matches!(
      classify(&book, &target, now()),
      ReadingStatus::Behind { .. }
    ));
  }

  #[test]
  fn tiers_map_to_fixed_colors_and_icons() {
    assert_eq!(ReadingStatus::Complete.color(), StatusColor::Gold);
    assert_eq!(ReadingStatus::Complete.icon(), StatusIcon::Star);
    assert_eq!(ReadingStatus::Overdue.color(), StatusColor::Gray);
    assert_eq!(ReadingStatus::OnTrack.color(), StatusColor::Green);
    let behind = ReadingStatus::Behind {
      target_page:     5,
      pages_to_target: 5,
    };
    assert_eq!(behind.color(), StatusColor::Blue);
    assert_eq!(behind.icon(), StatusIcon::Counter);
  }
}
