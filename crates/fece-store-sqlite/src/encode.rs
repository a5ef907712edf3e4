//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; submission statuses as their
//! upper-case discriminants.

use chrono::{DateTime, Utc};
use fece_core::{
  Error, Result,
  song::Song,
  submission::{Submission, SubmissionStatus},
  year::Year,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(format!("bad timestamp {s:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `years` row as read from SQLite, before timestamp decoding.
pub struct RawYear {
  pub id:          i64,
  pub year:        i32,
  pub description: String,
  pub created_at:  String,
}

impl RawYear {
  pub fn into_year(self) -> Result<Year> {
    Ok(Year {
      id:          self.id,
      year:        self.year,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// A `songs` row as read from SQLite.
pub struct RawSong {
  pub id:         i64,
  pub title:      String,
  pub fartist:    String,
  pub bio:        String,
  pub lyrics:     String,
  pub audio_url:  String,
  pub year_id:    i64,
  pub created_at: String,
}

impl RawSong {
  pub fn into_song(self) -> Result<Song> {
    Ok(Song {
      id:         self.id,
      title:      self.title,
      fartist:    self.fartist,
      bio:        self.bio,
      lyrics:     self.lyrics,
      audio_url:  self.audio_url,
      year_id:    self.year_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `submissions` row as read from SQLite.
pub struct RawSubmission {
  pub id:              i64,
  pub title:           String,
  pub fartist:         String,
  pub email:           Option<String>,
  pub bio:             Option<String>,
  pub lyrics:          Option<String>,
  pub audio_url:       String,
  pub audio_file_name: String,
  pub status:          String,
  pub target_year:     Option<i32>,
  pub created_at:      String,
}

impl RawSubmission {
  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:              self.id,
      title:           self.title,
      fartist:         self.fartist,
      email:           self.email,
      bio:             self.bio,
      lyrics:          self.lyrics,
      audio_url:       self.audio_url,
      audio_file_name: self.audio_file_name,
      status:          SubmissionStatus::parse(&self.status)?,
      target_year:     self.target_year,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
