//! JSON REST API for Tome.
//!
//! Exposes an axum [`Router`] backed by any [`tome_core::store::BookStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; the
//! caller identifies the authenticated reader by inserting a
//! [`CurrentReader`] extension on each request (see `tome-server`).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tome_api::api_router(pacer))
//! ```

pub mod books;
pub mod error;
pub mod mutations;

use axum::{
  Router,
  routing::{get, post},
};
use tome_core::{pacer::Pacer, store::BookStore};
use uuid::Uuid;

pub use error::ApiError;

/// The authenticated reader for the current request, inserted by the
/// caller's auth layer.
#[derive(Debug, Clone, Copy)]
pub struct CurrentReader(pub Uuid);

/// Build a fully-materialised API router over `pacer`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(pacer: Pacer<S>) -> Router<()>
where
  S: BookStore + 'static,
{
  Router::new()
    // Books
    .route("/books", get(books::list::<S>).post(books::create::<S>))
    .route("/books/{id}", get(books::get_one::<S>))
    .route("/books/{id}/targets", get(books::target_history::<S>))
    // Mutations
    .route("/books/{id}/progress", post(mutations::update_progress::<S>))
    .route("/books/{id}/goal", post(mutations::update_goal::<S>))
    .route("/books/{id}/archive", post(mutations::archive::<S>))
    .route("/books/{id}/unarchive", post(mutations::unarchive::<S>))
    .with_state(pacer)
}
