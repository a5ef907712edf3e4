//! Error types for `fece-core`.

use thiserror::Error;

use crate::submission::SubmissionStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("year not found: {0}")]
  YearNotFound(i64),

  #[error("year {0} already exists")]
  DuplicateYear(i32),

  #[error("song not found: {0}")]
  SongNotFound(i64),

  #[error("submission not found: {0}")]
  SubmissionNotFound(i64),

  /// Approval or rejection of a submission that has already left PENDING.
  #[error("submission {id} is already {status:?}")]
  AlreadyModerated {
    id:     i64,
    status: SubmissionStatus,
  },

  #[error("unknown submission status: {0:?}")]
  UnknownStatus(String),

  /// Backend failure surfaced by a store implementation.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
