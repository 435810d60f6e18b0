//! Handlers for the book read path and creation.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/books` | Optional `?filter=active\|archived\|all` (default active) |
//! | `POST` | `/books` | Body: [`CreateBookBody`]; seeds the first daily target |
//! | `GET`  | `/books/:id` | 404 if unknown or owned by another reader |
//! | `GET`  | `/books/:id/targets` | Append-only target history, newest first |
//!
//! Every read ensures the daily target is fresh before status is derived;
//! listing and viewing are what trigger recomputation.

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tome_core::{
  book::{Book, NewBook},
  clock::zoned_date_to_utc,
  pacer::Pacer,
  status::{ReadingStatus, StatusColor, StatusIcon},
  store::{BookFilter, BookStore},
  target::DailyTarget,
};
use uuid::Uuid;

use crate::{CurrentReader, error::ApiError};

// ─── Views ───────────────────────────────────────────────────────────────────

/// Everything the presentation layer needs to render one book: the entity,
/// its fresh daily target, and the classified status with its display
/// mapping.
#[derive(Debug, Serialize)]
pub struct BookView {
  pub book:             Book,
  pub target:           DailyTarget,
  pub status:           ReadingStatus,
  pub message:          String,
  pub color:            StatusColor,
  pub icon:             StatusIcon,
  pub pages_to_target:  u32,
  pub percent_complete: u32,
}

/// Assemble a [`BookView`], refreshing the book's target if stale.
pub(crate) async fn view<S>(
  pacer: &Pacer<S>,
  book: Book,
) -> Result<BookView, ApiError>
where
  S: BookStore,
{
  let book_status = pacer.display_status(&book).await?;
  let status = book_status.status;
  let percent_complete = (f64::from(book.current_page)
    / f64::from(book.page_count)
    * 100.0)
    .round() as u32;

  Ok(BookView {
    message: status.message(),
    color: status.color(),
    icon: status.icon(),
    pages_to_target: status.pages_to_target(),
    percent_complete,
    target: book_status.target,
    status,
    book,
  })
}

/// Fetch a book and check it belongs to the current reader. Books owned by
/// other readers are reported as not found rather than forbidden.
pub(crate) async fn owned_book<S>(
  pacer: &Pacer<S>,
  book_id: Uuid,
  reader_id: Uuid,
) -> Result<Book, ApiError>
where
  S: BookStore,
{
  let book = pacer
    .store()
    .get_book(book_id)
    .await
    .map_err(ApiError::store)?
    .filter(|b| b.reader_id == reader_id)
    .ok_or_else(|| ApiError::NotFound(format!("book {book_id} not found")))?;
  Ok(book)
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterParam {
  #[default]
  Active,
  Archived,
  All,
}

impl From<FilterParam> for BookFilter {
  fn from(f: FilterParam) -> Self {
    match f {
      FilterParam::Active => BookFilter::Active,
      FilterParam::Archived => BookFilter::Archived,
      FilterParam::All => BookFilter::All,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub filter: FilterParam,
}

/// `GET /books[?filter=active|archived|all]`
pub async fn list<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<BookView>>, ApiError>
where
  S: BookStore,
{
  let books = pacer
    .store()
    .list_books(reader_id, params.filter.into())
    .await
    .map_err(ApiError::store)?;

  let mut views = Vec::with_capacity(books.len());
  for book in books {
    views.push(view(&pacer, book).await?);
  }
  Ok(Json(views))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /books`. The target date arrives as the
/// calendar date the reader picked plus their JS timezone offset, and is
/// canonicalised to a UTC instant before storage.
#[derive(Debug, Deserialize)]
pub struct CreateBookBody {
  pub title:         String,
  pub author:        String,
  pub page_count:    u32,
  #[serde(default)]
  pub current_page:  u32,
  pub target_date:   NaiveDate,
  pub tz_offset_min: i32,
  pub rate_goal:     Option<u32>,
}

/// `POST /books` — validates, persists, seeds the very first daily target,
/// and returns 201 with the assembled view.
pub async fn create<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Json(body): Json<CreateBookBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BookStore,
{
  let input = NewBook {
    reader_id,
    title: body.title,
    author: body.author,
    page_count: body.page_count,
    current_page: body.current_page,
    target_date: zoned_date_to_utc(body.target_date, body.tz_offset_min),
    rate_goal: body.rate_goal,
  };
  input.validate(pacer.now())?;

  let book = pacer
    .store()
    .add_book(input)
    .await
    .map_err(ApiError::store)?;

  // Seed the first goal now rather than waiting for the first listing.
  pacer.refresh_target(&book).await?;

  Ok((StatusCode::CREATED, Json(view(&pacer, book).await?)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /books/:id`
pub async fn get_one<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
) -> Result<Json<BookView>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  Ok(Json(view(&pacer, book).await?))
}

// ─── Target history ──────────────────────────────────────────────────────────

/// `GET /books/:id/targets` — every target ever calculated, newest first.
pub async fn target_history<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<DailyTarget>>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  let history = pacer
    .store()
    .target_history(book.book_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(history))
}
