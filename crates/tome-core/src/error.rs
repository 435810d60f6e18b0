//! Error types for `tome-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid {field}: {message}")]
  InvalidField {
    field:   &'static str,
    message: String,
  },

  /// A persistence failure surfaced through the [`crate::pacer::Pacer`].
  /// Never swallowed: a read path must not report a fabricated target.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
    Self::InvalidField {
      field,
      message: message.into(),
    }
  }

  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
