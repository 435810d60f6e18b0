//! Core types and decision logic for the Tome reading tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod book;
pub mod clock;
pub mod error;
pub mod pacer;
pub mod pacing;
pub mod staleness;
pub mod status;
pub mod store;
pub mod target;

pub use error::{Error, Result};
