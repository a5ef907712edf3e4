//! Error type for `fece-blob`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The URL a caller handed us does not contain an object key we own.
  #[error("invalid object url: {0}")]
  InvalidUrl(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("object store request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("object store returned {status} for key {key:?}")]
  UnexpectedStatus { status: u16, key: String },

  #[error("signing error: {0}")]
  Sign(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
