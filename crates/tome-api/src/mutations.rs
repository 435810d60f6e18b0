//! Handlers for book mutations: progress, goal, and archive state.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/books/:id/progress` | Body: `{"current_page": n}` |
//! | `POST` | `/books/:id/goal` | Body: `{"target_date": "YYYY-MM-DD", "tz_offset_min": m}` |
//! | `POST` | `/books/:id/archive` | Soft-delete |
//! | `POST` | `/books/:id/unarchive` | Restore |
//!
//! A goal change recomputes the daily target immediately; the inputs just
//! changed, so consulting the staleness check first would be pointless. A
//! progress change does not: today's checkpoint stays where it was until the
//! next calendar day.

use axum::{
  Extension, Json,
  extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tome_core::{
  book::{Book, validate_progress},
  clock::zoned_date_to_utc,
  pacer::Pacer,
  store::BookStore,
};
use uuid::Uuid;

use crate::{
  CurrentReader,
  books::{BookView, owned_book, view},
  error::ApiError,
};

// ─── Progress ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProgressBody {
  pub current_page: u32,
}

/// `POST /books/:id/progress`
pub async fn update_progress<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
  Json(body): Json<ProgressBody>,
) -> Result<Json<BookView>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  validate_progress(&book, body.current_page)?;

  let updated = pacer
    .store()
    .update_progress(book.book_id, body.current_page)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(view(&pacer, updated).await?))
}

// ─── Goal ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GoalBody {
  pub target_date:   NaiveDate,
  pub tz_offset_min: i32,
}

/// `POST /books/:id/goal` — moves the finish date and eagerly recomputes the
/// daily target from the new inputs.
pub async fn update_goal<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
  Json(body): Json<GoalBody>,
) -> Result<Json<BookView>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  let target_date = zoned_date_to_utc(body.target_date, body.tz_offset_min);

  let updated = pacer
    .store()
    .update_goal(book.book_id, target_date)
    .await
    .map_err(ApiError::store)?;

  pacer.refresh_target(&updated).await?;

  Ok(Json(view(&pacer, updated).await?))
}

// ─── Archive ─────────────────────────────────────────────────────────────────

/// `POST /books/:id/archive`
pub async fn archive<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
) -> Result<Json<Book>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  let archived = pacer
    .store()
    .set_archived(book.book_id, true)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(archived))
}

/// `POST /books/:id/unarchive` — restore from the archive.
pub async fn unarchive<S>(
  State(pacer): State<Pacer<S>>,
  Extension(CurrentReader(reader_id)): Extension<CurrentReader>,
  Path(id): Path<Uuid>,
) -> Result<Json<Book>, ApiError>
where
  S: BookStore,
{
  let book = owned_book(&pacer, id, reader_id).await?;
  let restored = pacer
    .store()
    .set_archived(book.book_id, false)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(restored))
}
