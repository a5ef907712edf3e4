//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as `{ "error": <message> }` with 400 (validation,
//! duplicate year, moderation conflicts), 404 (missing id), or 500
//! (store/blob failure).

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Wrap a blob-store failure. Always a 500 — blob errors carry no
  /// client-correctable meaning.
  pub fn blob<E: std::error::Error>(e: E) -> Self {
    Self::Internal(e.to_string())
  }
}

impl From<fece_core::Error> for ApiError {
  fn from(e: fece_core::Error) -> Self {
    use fece_core::Error as E;
    match &e {
      E::YearNotFound(_) | E::SongNotFound(_) | E::SubmissionNotFound(_) => {
        Self::NotFound(e.to_string())
      }
      E::DuplicateYear(_) | E::AlreadyModerated { .. } | E::UnknownStatus(_) => {
        Self::BadRequest(e.to_string())
      }
      E::Storage(_) => Self::Internal(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Self::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Self::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!("request failed: {message}");
    }
    (status, Json(json!({ "error": message }))).into_response()
  }
}
