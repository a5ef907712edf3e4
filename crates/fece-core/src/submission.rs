//! Submission — an unreviewed candidate song awaiting moderation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Moderation state of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
  Pending,
  Approved,
  Rejected,
}

impl SubmissionStatus {
  /// The discriminant string stored in the `status` column and sent on
  /// the wire. Must match the serde rename above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Approved => "APPROVED",
      Self::Rejected => "REJECTED",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "PENDING" => Ok(Self::Pending),
      "APPROVED" => Ok(Self::Approved),
      "REJECTED" => Ok(Self::Rejected),
      other => Err(Error::UnknownStatus(other.to_string())),
    }
  }
}

/// A submitted song waiting for (or past) review. The audio object is
/// uploaded before the record is created; `audio_url` points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  pub id:              i64,
  pub title:           String,
  pub fartist:         String,
  pub email:           Option<String>,
  pub bio:             Option<String>,
  pub lyrics:          Option<String>,
  pub audio_url:       String,
  /// The file name the submitter originally uploaded.
  pub audio_file_name: String,
  pub status:          SubmissionStatus,
  /// Denormalised copy of the target year number, set on approval.
  pub target_year:     Option<i32>,
  pub created_at:      DateTime<Utc>,
}

/// Input for a new submission. Status is always PENDING on creation.
#[derive(Debug, Clone)]
pub struct NewSubmission {
  pub title:           String,
  pub fartist:         String,
  pub email:           Option<String>,
  pub bio:             Option<String>,
  pub lyrics:          Option<String>,
  pub audio_url:       String,
  pub audio_file_name: String,
}

/// Partial update for a submission (admin field edits and rejection).
/// `None` leaves the field unchanged. Approval does not go through this
/// type — see [`crate::store::RecordStore::approve_submission`].
#[derive(Debug, Clone, Default)]
pub struct SubmissionPatch {
  pub title:   Option<String>,
  pub fartist: Option<String>,
  pub email:   Option<String>,
  pub bio:     Option<String>,
  pub lyrics:  Option<String>,
  pub status:  Option<SubmissionStatus>,
}
