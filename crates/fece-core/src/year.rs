//! Year — a yearly compilation container grouping songs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::song::Song;

/// A compilation year. Identified either by its rowid or by the unique
/// year number (the natural key used by seeding).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Year {
  pub id:          i64,
  /// The calendar year, unique across the table.
  pub year:        i32,
  pub description: String,
  pub created_at:  DateTime<Utc>,
}

/// A year together with its songs, ordered by creation time ascending —
/// the shape returned by the public playlist endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearWithSongs {
  #[serde(flatten)]
  pub year:  Year,
  pub songs: Vec<Song>,
}

/// Input for creating (or seed-upserting) a year.
#[derive(Debug, Clone)]
pub struct NewYear {
  pub year:        i32,
  pub description: String,
}
