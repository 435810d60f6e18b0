//! HTTP Basic-auth middleware.
//!
//! One reader per server instance: the configured username maps to a reader
//! row resolved at startup, and every authenticated request carries that
//! reader's id as a [`CurrentReader`] extension for the API layer.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use std::sync::Arc;
use tome_api::CurrentReader;
use uuid::Uuid;

/// Credentials accepted as valid for this server instance, plus the reader
/// they resolve to.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub reader_id:     Uuid,
}

fn unauthorized() -> Response {
  let mut res = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
  res.headers_mut().insert(
    header::WWW_AUTHENTICATE,
    HeaderValue::from_static("Basic realm=\"tome\""),
  );
  res
}

/// Verify credentials directly from headers.
pub fn verify_basic(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Response> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or_else(unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| unauthorized())?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| unauthorized())?;

  let (username, password) = creds.split_once(':').ok_or_else(unauthorized)?;

  if username != config.username {
    return Err(unauthorized());
  }

  let parsed_hash =
    PasswordHash::new(&config.password_hash).map_err(|_| unauthorized())?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| unauthorized())?;

  Ok(())
}

/// Middleware: reject unauthenticated requests, stamp the rest with the
/// resolved reader.
pub async fn require_basic_auth(
  State(auth): State<Arc<AuthConfig>>,
  mut req: Request,
  next: Next,
) -> Response {
  match verify_basic(req.headers(), &auth) {
    Ok(()) => {
      req.extensions_mut().insert(CurrentReader(auth.reader_id));
      next.run(req).await
    }
    Err(rejection) => rejection,
  }
}
