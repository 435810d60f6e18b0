//! The `BookStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `tome-store-sqlite`).
//! Higher layers (`tome-api`, `tome-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  book::{Book, NewBook, Reader},
  target::{DailyTarget, NewTarget},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Archive filter for [`BookStore::list_books`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookFilter {
  /// Books currently being read (`archived_at` unset).
  #[default]
  Active,
  /// Soft-deleted books only.
  Archived,
  All,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Tome storage backend.
///
/// Books are mutable rows; daily targets are strictly append-only, and the
/// "current" target is the most recently calculated row for a book.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BookStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Readers ───────────────────────────────────────────────────────────

  /// Find the reader with this username, creating one if absent.
  /// Usernames are unique.
  fn ensure_reader<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Reader, Self::Error>> + Send + 'a;

  // ── Books ─────────────────────────────────────────────────────────────

  /// Persist a new book. `book_id` and `start_date` are set by the store;
  /// input validation is the caller's responsibility.
  fn add_book(
    &self,
    input: NewBook,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  /// Retrieve a book by id. Returns `None` if not found.
  fn get_book(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// List a reader's books under the given archive filter.
  fn list_books(
    &self,
    reader_id: Uuid,
    filter: BookFilter,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  /// Set the reader's current page. Errors if the book does not exist.
  fn update_progress(
    &self,
    book_id: Uuid,
    current_page: u32,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  /// Move the committed finish date. Errors if the book does not exist.
  fn update_goal(
    &self,
    book_id: Uuid,
    target_date: DateTime<Utc>,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  /// Soft-delete (or restore) a book by stamping or clearing `archived_at`.
  fn set_archived(
    &self,
    book_id: Uuid,
    archived: bool,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  // ── Daily targets — append-only ───────────────────────────────────────

  /// The most recently calculated target for a book, if any. Same-instant
  /// duplicates (benign races) resolve to the last write.
  fn latest_target(
    &self,
    book_id: Uuid,
  ) -> impl Future<Output = Result<Option<DailyTarget>, Self::Error>> + Send + '_;

  /// Append a newly calculated target. The previous row is superseded, not
  /// deleted.
  fn record_target(
    &self,
    input: NewTarget,
  ) -> impl Future<Output = Result<DailyTarget, Self::Error>> + Send + '_;

  /// All targets ever calculated for a book, newest first.
  fn target_history(
    &self,
    book_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DailyTarget>, Self::Error>> + Send + '_;
}
