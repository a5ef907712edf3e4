//! Song — a published, year-assigned track visible on public pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::year::Year;

/// A published track. `bio` and `lyrics` default to the empty string
/// rather than NULL; submissions keep them optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
  pub id:         i64,
  pub title:      String,
  /// The submitting artist's display name.
  pub fartist:    String,
  pub bio:        String,
  pub lyrics:     String,
  /// Public URL (or path) of the audio object, stored verbatim.
  pub audio_url:  String,
  pub year_id:    i64,
  pub created_at: DateTime<Utc>,
}

/// A song joined with its owning year — the admin listing shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongWithYear {
  #[serde(flatten)]
  pub song: Song,
  pub year: Year,
}

/// Input for creating a song directly (admin path).
#[derive(Debug, Clone)]
pub struct NewSong {
  pub title:     String,
  pub fartist:   String,
  pub bio:       String,
  pub lyrics:    String,
  pub audio_url: String,
  pub year_id:   i64,
}

/// Partial update for a song. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SongPatch {
  pub title:     Option<String>,
  pub fartist:   Option<String>,
  pub bio:       Option<String>,
  pub lyrics:    Option<String>,
  pub audio_url: Option<String>,
  pub year_id:   Option<i64>,
}

impl Song {
  /// The conventional download name for a published track.
  pub fn download_file_name(&self) -> String {
    format!("{} - {}.mp3", self.fartist, self.title)
  }
}
