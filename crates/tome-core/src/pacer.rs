//! The pacer — orchestrates staleness checking, recomputation, and status
//! classification over a [`BookStore`] and a [`Clock`].
//!
//! Every read-for-display goes through here: listing or viewing a book first
//! ensures its daily target is fresh (writing a new one if not), then derives
//! status from it. There is no background scheduler; the read path is the
//! recomputation trigger.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  book::Book,
  clock::{Clock, SystemClock},
  pacing,
  staleness::is_stale,
  status::{ReadingStatus, classify},
  store::BookStore,
  target::{DailyTarget, NewTarget, TargetSnapshot},
};

/// A fresh target together with the status derived from it — everything a
/// presentation layer needs for one book.
#[derive(Debug, Clone)]
pub struct BookStatus {
  pub status: ReadingStatus,
  pub target: DailyTarget,
}

/// Pacing orchestrator. Cheap to clone; share one per process.
pub struct Pacer<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock>,
}

impl<S> Clone for Pacer<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      clock: Arc::clone(&self.clock),
    }
  }
}

impl<S: BookStore> Pacer<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
    Self { store, clock }
  }

  /// A pacer on the real wall clock.
  pub fn system(store: Arc<S>) -> Self {
    Self::new(store, Arc::new(SystemClock))
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// The current instant according to the pacer's clock. Boundary
  /// validation uses this so tests see one consistent "today".
  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }

  /// Return today's target for `book`, recomputing and persisting a new one
  /// only if the stored target is stale. Idempotent within a calendar day:
  /// repeated calls with unchanged book fields return the same row without
  /// writing.
  ///
  /// Persistence failures propagate; a stale target is never returned as if
  /// it were fresh.
  pub async fn ensure_fresh_target(&self, book: &Book) -> Result<DailyTarget> {
    let now = self.clock.now();
    let latest = self
      .store
      .latest_target(book.book_id)
      .await
      .map_err(Error::store)?;

    match latest {
      Some(target) if !is_stale(book, Some(&target), now) => Ok(target),
      _ => self.refresh_target(book).await,
    }
  }

  /// Unconditionally recompute from the book's live fields and append a new
  /// target. Used to seed the first target at creation and to recompute
  /// eagerly after a goal change, where the staleness check is pointless.
  pub async fn refresh_target(&self, book: &Book) -> Result<DailyTarget> {
    let now = self.clock.now();
    let target_page = pacing::target_page(
      book.current_page,
      book.page_count,
      book.target_date,
      now,
    );

    self
      .store
      .record_target(NewTarget {
        book_id: book.book_id,
        target_page,
        calculated_at: now,
        snapshot: TargetSnapshot::of(book),
      })
      .await
      .map_err(Error::store)
  }

  /// Fresh target plus classified status for one book — the display read
  /// path.
  pub async fn display_status(&self, book: &Book) -> Result<BookStatus> {
    let target = self.ensure_fresh_target(book).await?;
    let status = classify(book, &target, self.clock.now());
    Ok(BookStatus { status, target })
  }
}
