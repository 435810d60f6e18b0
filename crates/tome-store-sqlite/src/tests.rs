//! Integration tests for `SqliteStore` against an in-memory database,
//! including the pacer flows that need real persistence underneath.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tome_core::{
  book::{Book, NewBook},
  clock::{Clock, FixedClock},
  pacer::Pacer,
  status::ReadingStatus,
  store::{BookFilter, BookStore},
  target::{NewTarget, TargetSnapshot},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// 09:00 UTC on an arbitrary fixed day.
fn day_zero() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
}

fn new_book(reader_id: Uuid, target_date: DateTime<Utc>) -> NewBook {
  NewBook {
    reader_id,
    title: "The Left Hand of Darkness".into(),
    author: "Ursula K. Le Guin".into(),
    page_count: 300,
    current_page: 0,
    target_date,
    rate_goal: None,
  }
}

async fn seeded_book(s: &SqliteStore, target_date: DateTime<Utc>) -> Book {
  let reader = s.ensure_reader("sol").await.unwrap();
  s.add_book(new_book(reader.reader_id, target_date))
    .await
    .unwrap()
}

fn pacer(s: &SqliteStore, clock: &Arc<FixedClock>) -> Pacer<SqliteStore> {
  let clock: Arc<dyn Clock> = clock.clone();
  Pacer::new(Arc::new(s.clone()), clock)
}

// ─── Readers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_reader_creates_then_reuses() {
  let s = store().await;

  let first = s.ensure_reader("sol").await.unwrap();
  assert_eq!(first.username, "sol");

  let again = s.ensure_reader("sol").await.unwrap();
  assert_eq!(again.reader_id, first.reader_id);

  let other = s.ensure_reader("luna").await.unwrap();
  assert_ne!(other.reader_id, first.reader_id);
}

// ─── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_book() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  let fetched = s.get_book(book.book_id).await.unwrap().unwrap();
  assert_eq!(fetched.book_id, book.book_id);
  assert_eq!(fetched.title, "The Left Hand of Darkness");
  assert_eq!(fetched.page_count, 300);
  assert_eq!(fetched.current_page, 0);
  assert_eq!(fetched.target_date, book.target_date);
  assert!(fetched.archived_at.is_none());
}

#[tokio::test]
async fn get_book_missing_returns_none() {
  let s = store().await;
  assert!(s.get_book(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_books_respects_archive_filter() {
  let s = store().await;
  let reader = s.ensure_reader("sol").await.unwrap();
  let due = day_zero() + Duration::days(10);

  let keep = s.add_book(new_book(reader.reader_id, due)).await.unwrap();
  let shelve = s.add_book(new_book(reader.reader_id, due)).await.unwrap();
  s.set_archived(shelve.book_id, true).await.unwrap();

  let active = s
    .list_books(reader.reader_id, BookFilter::Active)
    .await
    .unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].book_id, keep.book_id);

  let archived = s
    .list_books(reader.reader_id, BookFilter::Archived)
    .await
    .unwrap();
  assert_eq!(archived.len(), 1);
  assert_eq!(archived[0].book_id, shelve.book_id);

  let all = s
    .list_books(reader.reader_id, BookFilter::All)
    .await
    .unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn list_books_scoped_to_reader() {
  let s = store().await;
  let sol = s.ensure_reader("sol").await.unwrap();
  let luna = s.ensure_reader("luna").await.unwrap();
  let due = day_zero() + Duration::days(10);

  s.add_book(new_book(sol.reader_id, due)).await.unwrap();

  let lunas = s.list_books(luna.reader_id, BookFilter::All).await.unwrap();
  assert!(lunas.is_empty());
}

#[tokio::test]
async fn update_progress_persists() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  let updated = s.update_progress(book.book_id, 57).await.unwrap();
  assert_eq!(updated.current_page, 57);

  let fetched = s.get_book(book.book_id).await.unwrap().unwrap();
  assert_eq!(fetched.current_page, 57);
}

#[tokio::test]
async fn update_goal_persists() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let moved = day_zero() + Duration::days(20);

  let updated = s.update_goal(book.book_id, moved).await.unwrap();
  assert_eq!(updated.target_date, moved);
}

#[tokio::test]
async fn mutations_on_missing_book_error() {
  let s = store().await;
  let missing = Uuid::new_v4();

  assert!(matches!(
    s.update_progress(missing, 1).await.unwrap_err(),
    crate::Error::BookNotFound(_)
  ));
  assert!(matches!(
    s.update_goal(missing, day_zero()).await.unwrap_err(),
    crate::Error::BookNotFound(_)
  ));
  assert!(matches!(
    s.set_archived(missing, true).await.unwrap_err(),
    crate::Error::BookNotFound(_)
  ));
}

#[tokio::test]
async fn archive_and_restore_roundtrip() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  let archived = s.set_archived(book.book_id, true).await.unwrap();
  assert!(archived.archived_at.is_some());

  let restored = s.set_archived(book.book_id, false).await.unwrap();
  assert!(restored.archived_at.is_none());
}

// ─── Daily targets ───────────────────────────────────────────────────────────

fn target_input(book: &Book, target_page: u32, at: DateTime<Utc>) -> NewTarget {
  NewTarget {
    book_id: book.book_id,
    target_page,
    calculated_at: at,
    snapshot: TargetSnapshot::of(book),
  }
}

#[tokio::test]
async fn latest_target_is_newest_by_calculation_time() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  s.record_target(target_input(&book, 28, day_zero() - Duration::days(1)))
    .await
    .unwrap();
  let newer = s
    .record_target(target_input(&book, 30, day_zero()))
    .await
    .unwrap();

  let latest = s.latest_target(book.book_id).await.unwrap().unwrap();
  assert_eq!(latest.target_id, newer.target_id);
  assert_eq!(latest.target_page, 30);
}

#[tokio::test]
async fn latest_target_same_instant_resolves_to_last_write() {
  // Two tabs racing on the same day compute identical targets; whichever
  // lands second wins and nothing is lost.
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  s.record_target(target_input(&book, 28, day_zero()))
    .await
    .unwrap();
  let second = s
    .record_target(target_input(&book, 28, day_zero()))
    .await
    .unwrap();

  let latest = s.latest_target(book.book_id).await.unwrap().unwrap();
  assert_eq!(latest.target_id, second.target_id);
}

#[tokio::test]
async fn target_history_newest_first() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;

  for (page, days_ago) in [(40u32, 2i64), (35, 1), (28, 0)] {
    s.record_target(target_input(&book, page, day_zero() - Duration::days(days_ago)))
      .await
      .unwrap();
  }

  let history = s.target_history(book.book_id).await.unwrap();
  assert_eq!(history.len(), 3);
  assert_eq!(
    history.iter().map(|t| t.target_page).collect::<Vec<_>>(),
    [28, 35, 40]
  );
}

#[tokio::test]
async fn target_snapshot_roundtrip() {
  let s = store().await;
  let mut book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  book.rate_goal = Some(25);

  s.record_target(target_input(&book, 28, day_zero()))
    .await
    .unwrap();

  let latest = s.latest_target(book.book_id).await.unwrap().unwrap();
  assert_eq!(latest.snapshot, TargetSnapshot::of(&book));
  assert_eq!(latest.snapshot.rate_goal, Some(25));
}

// ─── Pacer read path ─────────────────────────────────────────────────────────

#[tokio::test]
async fn first_read_seeds_the_expected_target() {
  let s = store().await;
  // 300 pages, due 10 calendar days out: ceil(300 / 11) = 28.
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let target = pacer.ensure_fresh_target(&book).await.unwrap();
  assert_eq!(target.target_page, 28);
  assert_eq!(target.calculated_at, day_zero());
  assert_eq!(target.snapshot.target_date, book.target_date);
}

#[tokio::test]
async fn same_day_reads_are_idempotent() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let first = pacer.ensure_fresh_target(&book).await.unwrap();

  // Later the same day: same row back, no second write.
  clock.set(day_zero() + Duration::hours(8));
  let second = pacer.ensure_fresh_target(&book).await.unwrap();

  assert_eq!(second.target_id, first.target_id);
  assert_eq!(second.target_page, first.target_page);
  assert_eq!(second.calculated_at, first.calculated_at);
  assert_eq!(s.target_history(book.book_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn next_calendar_day_recomputes() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let first = pacer.ensure_fresh_target(&book).await.unwrap();

  clock.set(day_zero() + Duration::days(1));
  let second = pacer.ensure_fresh_target(&book).await.unwrap();

  assert_ne!(second.target_id, first.target_id);
  // No reading happened: 300 pages over the 10 remaining days, ceil = 30.
  assert_eq!(second.target_page, 30);
  assert_eq!(s.target_history(book.book_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn goal_change_recomputes_at_the_same_instant() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let first = pacer.ensure_fresh_target(&book).await.unwrap();

  // The reader moves the goal; the clock does not advance at all.
  let moved = s
    .update_goal(book.book_id, day_zero() + Duration::days(29))
    .await
    .unwrap();
  let second = pacer.ensure_fresh_target(&moved).await.unwrap();

  assert_ne!(second.target_id, first.target_id);
  // 300 pages over 30 inclusive days.
  assert_eq!(second.target_page, 10);
  assert_eq!(second.snapshot.target_date, moved.target_date);
}

#[tokio::test]
async fn progress_update_same_day_keeps_the_checkpoint() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let first = pacer.ensure_fresh_target(&book).await.unwrap();

  let read_on = s.update_progress(book.book_id, 20).await.unwrap();
  let second = pacer.ensure_fresh_target(&read_on).await.unwrap();

  // Reading further today leaves today's checkpoint where it was.
  assert_eq!(second.target_id, first.target_id);
}

#[tokio::test]
async fn last_page_due_today_targets_the_end() {
  let s = store().await;
  let reader = s.ensure_reader("sol").await.unwrap();
  let mut input = new_book(reader.reader_id, day_zero());
  input.current_page = 299;
  let book = s.add_book(input).await.unwrap();

  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let target = pacer.ensure_fresh_target(&book).await.unwrap();
  assert_eq!(target.target_page, 300);
}

#[tokio::test]
async fn display_status_classifies_against_fresh_target() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(10)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  // Page 0 against checkpoint 28: behind by 28.
  let behind = pacer.display_status(&book).await.unwrap();
  assert_eq!(
    behind.status,
    ReadingStatus::Behind {
      target_page:     28,
      pages_to_target: 28,
    }
  );

  // Catch up to the checkpoint: on track.
  let caught_up = s.update_progress(book.book_id, 28).await.unwrap();
  let on_track = pacer.display_status(&caught_up).await.unwrap();
  assert_eq!(on_track.status, ReadingStatus::OnTrack);

  // Finish the book: complete, regardless of dates.
  let finished = s.update_progress(book.book_id, 300).await.unwrap();
  let complete = pacer.display_status(&finished).await.unwrap();
  assert_eq!(complete.status, ReadingStatus::Complete);
}

#[tokio::test]
async fn passed_deadline_demands_the_remainder_today() {
  let s = store().await;
  let book = seeded_book(&s, day_zero() + Duration::days(1)).await;
  let clock = Arc::new(FixedClock::new(day_zero()));
  let pacer = pacer(&s, &clock);

  let half_read = s.update_progress(book.book_id, 150).await.unwrap();
  clock.set(day_zero() + Duration::days(3));

  // The recompute clamps the day count instead of dividing by a negative:
  // everything left lands on today's checkpoint.
  let status = pacer.display_status(&half_read).await.unwrap();
  assert_eq!(
    status.status,
    ReadingStatus::Behind {
      target_page:     300,
      pages_to_target: 150,
    }
  );
}
