//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use fece_core::{
  Error, Result,
  song::{NewSong, Song, SongPatch, SongWithYear},
  store::RecordStore,
  submission::{NewSubmission, Submission, SubmissionPatch, SubmissionStatus},
  year::{NewYear, Year, YearWithSongs},
};

use crate::{
  encode::{RawSong, RawSubmission, RawYear, encode_dt},
  schema::SCHEMA,
};

const YEAR_COLS: &str = "id, year, description, created_at";
const SONG_COLS: &str = "id, title, fartist, bio, lyrics, audio_url, year_id, created_at";
const SUBMISSION_COLS: &str = "id, title, fartist, email, bio, lyrics, audio_url, \
   audio_file_name, status, target_year, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A FECE record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(db_err)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }
}

fn db_err(e: tokio_rusqlite::Error) -> Error {
  Error::Storage(e.to_string())
}

// ─── Row mappers ─────────────────────────────────────────────────────────────

fn year_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawYear> {
  Ok(RawYear {
    id:          row.get(0)?,
    year:        row.get(1)?,
    description: row.get(2)?,
    created_at:  row.get(3)?,
  })
}

fn song_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSong> {
  Ok(RawSong {
    id:         row.get(0)?,
    title:      row.get(1)?,
    fartist:    row.get(2)?,
    bio:        row.get(3)?,
    lyrics:     row.get(4)?,
    audio_url:  row.get(5)?,
    year_id:    row.get(6)?,
    created_at: row.get(7)?,
  })
}

fn submission_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubmission> {
  Ok(RawSubmission {
    id:              row.get(0)?,
    title:           row.get(1)?,
    fartist:         row.get(2)?,
    email:           row.get(3)?,
    bio:             row.get(4)?,
    lyrics:          row.get(5)?,
    audio_url:       row.get(6)?,
    audio_file_name: row.get(7)?,
    status:          row.get(8)?,
    target_year:     row.get(9)?,
    created_at:      row.get(10)?,
  })
}

fn select_year(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawYear>> {
  conn
    .query_row(
      &format!("SELECT {YEAR_COLS} FROM years WHERE id = ?1"),
      rusqlite::params![id],
      year_from_row,
    )
    .optional()
}

fn select_song_with_year(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<(RawSong, RawYear)>> {
  conn
    .query_row(
      "SELECT s.id, s.title, s.fartist, s.bio, s.lyrics, s.audio_url,
              s.year_id, s.created_at,
              y.id, y.year, y.description, y.created_at
       FROM songs s JOIN years y ON y.id = s.year_id
       WHERE s.id = ?1",
      rusqlite::params![id],
      song_year_from_row,
    )
    .optional()
}

fn song_year_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(RawSong, RawYear)> {
  Ok((
    RawSong {
      id:         row.get(0)?,
      title:      row.get(1)?,
      fartist:    row.get(2)?,
      bio:        row.get(3)?,
      lyrics:     row.get(4)?,
      audio_url:  row.get(5)?,
      year_id:    row.get(6)?,
      created_at: row.get(7)?,
    },
    RawYear {
      id:          row.get(8)?,
      year:        row.get(9)?,
      description: row.get(10)?,
      created_at:  row.get(11)?,
    },
  ))
}

fn select_submission(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawSubmission>> {
  conn
    .query_row(
      &format!("SELECT {SUBMISSION_COLS} FROM submissions WHERE id = ?1"),
      rusqlite::params![id],
      submission_from_row,
    )
    .optional()
}

fn into_song_with_year(raw: (RawSong, RawYear)) -> Result<SongWithYear> {
  Ok(SongWithYear {
    song: raw.0.into_song()?,
    year: raw.1.into_year()?,
  })
}

// ─── Multi-step outcomes ─────────────────────────────────────────────────────

/// What happened inside the approval transaction.
enum ApproveOutcome {
  SubmissionMissing,
  AlreadyModerated(String),
  YearMissing,
  Approved(RawSubmission),
}

/// What happened inside a song update.
enum UpdateSongOutcome {
  SongMissing,
  YearMissing(i64),
  Updated(RawSong, RawYear),
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  // ── Years ─────────────────────────────────────────────────────────────

  async fn create_year(&self, input: NewYear) -> Result<Year> {
    let number = input.year;
    let now = encode_dt(Utc::now());

    let raw: Option<RawYear> = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM years WHERE year = ?1",
            rusqlite::params![input.year],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(None);
        }

        conn.execute(
          "INSERT INTO years (year, description, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![input.year, input.description, now],
        )?;
        select_year(conn, conn.last_insert_rowid()).map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    match raw {
      Some(raw) => raw.into_year(),
      None => Err(Error::DuplicateYear(number)),
    }
  }

  async fn upsert_year(&self, input: NewYear) -> Result<Year> {
    let now = encode_dt(Utc::now());

    let raw: RawYear = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE years SET description = ?1 WHERE year = ?2",
          rusqlite::params![input.description, input.year],
        )?;
        let id = if changed == 0 {
          conn.execute(
            "INSERT INTO years (year, description, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![input.year, input.description, now],
          )?;
          conn.last_insert_rowid()
        } else {
          conn.query_row(
            "SELECT id FROM years WHERE year = ?1",
            rusqlite::params![input.year],
            |r| r.get(0),
          )?
        };
        conn
          .query_row(
            &format!("SELECT {YEAR_COLS} FROM years WHERE id = ?1"),
            rusqlite::params![id],
            year_from_row,
          )
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    raw.into_year()
  }

  async fn get_year(&self, id: i64) -> Result<Option<YearWithSongs>> {
    let raw: Option<(RawYear, Vec<RawSong>)> = self
      .conn
      .call(move |conn| {
        let Some(year) = select_year(conn, id)? else {
          return Ok(None);
        };
        let mut stmt = conn.prepare(&format!(
          "SELECT {SONG_COLS} FROM songs WHERE year_id = ?1
           ORDER BY created_at ASC, id ASC"
        ))?;
        let songs = stmt
          .query_map(rusqlite::params![id], song_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Some((year, songs)))
      })
      .await
      .map_err(db_err)?;

    raw
      .map(|(year, songs)| {
        Ok(YearWithSongs {
          year:  year.into_year()?,
          songs: songs
            .into_iter()
            .map(RawSong::into_song)
            .collect::<Result<Vec<_>>>()?,
        })
      })
      .transpose()
  }

  async fn find_year_by_number(&self, year: i32) -> Result<Option<Year>> {
    let raw: Option<RawYear> = self
      .conn
      .call(move |conn| {
        conn
          .query_row(
            &format!("SELECT {YEAR_COLS} FROM years WHERE year = ?1"),
            rusqlite::params![year],
            year_from_row,
          )
          .optional()
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    raw.map(RawYear::into_year).transpose()
  }

  async fn list_years(&self) -> Result<Vec<YearWithSongs>> {
    let (years, songs): (Vec<RawYear>, Vec<RawSong>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {YEAR_COLS} FROM years ORDER BY year DESC"))?;
        let years = stmt
          .query_map([], year_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(&format!(
          "SELECT {SONG_COLS} FROM songs ORDER BY created_at ASC, id ASC"
        ))?;
        let songs = stmt
          .query_map([], song_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((years, songs))
      })
      .await
      .map_err(db_err)?;

    // Group songs under their year, preserving the per-year creation order.
    let mut by_year: HashMap<i64, Vec<Song>> = HashMap::new();
    for raw in songs {
      let song = raw.into_song()?;
      by_year.entry(song.year_id).or_default().push(song);
    }

    years
      .into_iter()
      .map(|raw| {
        let year = raw.into_year()?;
        let songs = by_year.remove(&year.id).unwrap_or_default();
        Ok(YearWithSongs { year, songs })
      })
      .collect()
  }

  async fn update_year_description(
    &self,
    id: i64,
    description: String,
  ) -> Result<Year> {
    let raw: Option<RawYear> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE years SET description = ?1 WHERE id = ?2",
          rusqlite::params![description, id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        select_year(conn, id).map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    match raw {
      Some(raw) => raw.into_year(),
      None => Err(Error::YearNotFound(id)),
    }
  }

  // ── Songs ─────────────────────────────────────────────────────────────

  async fn create_song(&self, input: NewSong) -> Result<SongWithYear> {
    let year_id = input.year_id;
    let now = encode_dt(Utc::now());

    let raw: Option<(RawSong, RawYear)> = self
      .conn
      .call(move |conn| {
        if select_year(conn, input.year_id)?.is_none() {
          return Ok(None);
        }
        conn.execute(
          "INSERT INTO songs (title, fartist, bio, lyrics, audio_url, year_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            input.title,
            input.fartist,
            input.bio,
            input.lyrics,
            input.audio_url,
            input.year_id,
            now,
          ],
        )?;
        select_song_with_year(conn, conn.last_insert_rowid()).map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    match raw {
      Some(raw) => into_song_with_year(raw),
      None => Err(Error::YearNotFound(year_id)),
    }
  }

  async fn get_song(&self, id: i64) -> Result<Option<SongWithYear>> {
    let raw: Option<(RawSong, RawYear)> = self
      .conn
      .call(move |conn| select_song_with_year(conn, id).map_err(Into::into))
      .await
      .map_err(db_err)?;

    raw.map(into_song_with_year).transpose()
  }

  async fn find_song(&self, title: &str, fartist: &str) -> Result<Option<Song>> {
    let title = title.to_owned();
    let fartist = fartist.to_owned();

    let raw: Option<RawSong> = self
      .conn
      .call(move |conn| {
        conn
          .query_row(
            &format!(
              "SELECT {SONG_COLS} FROM songs WHERE title = ?1 AND fartist = ?2"
            ),
            rusqlite::params![title, fartist],
            song_from_row,
          )
          .optional()
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    raw.map(RawSong::into_song).transpose()
  }

  async fn list_songs(&self) -> Result<Vec<SongWithYear>> {
    let raws: Vec<(RawSong, RawYear)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT s.id, s.title, s.fartist, s.bio, s.lyrics, s.audio_url,
                  s.year_id, s.created_at,
                  y.id, y.year, y.description, y.created_at
           FROM songs s JOIN years y ON y.id = s.year_id
           ORDER BY s.created_at DESC, s.id DESC",
        )?;
        let rows = stmt
          .query_map([], song_year_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws.into_iter().map(into_song_with_year).collect()
  }

  async fn update_song(&self, id: i64, patch: SongPatch) -> Result<SongWithYear> {
    let outcome: UpdateSongOutcome = self
      .conn
      .call(move |conn| {
        let Some((song, _)) = select_song_with_year(conn, id)? else {
          return Ok(UpdateSongOutcome::SongMissing);
        };

        let year_id = patch.year_id.unwrap_or(song.year_id);
        if select_year(conn, year_id)?.is_none() {
          return Ok(UpdateSongOutcome::YearMissing(year_id));
        }

        conn.execute(
          "UPDATE songs
           SET title = ?1, fartist = ?2, bio = ?3, lyrics = ?4,
               audio_url = ?5, year_id = ?6
           WHERE id = ?7",
          rusqlite::params![
            patch.title.unwrap_or(song.title),
            patch.fartist.unwrap_or(song.fartist),
            patch.bio.unwrap_or(song.bio),
            patch.lyrics.unwrap_or(song.lyrics),
            patch.audio_url.unwrap_or(song.audio_url),
            year_id,
            id,
          ],
        )?;

        match select_song_with_year(conn, id)? {
          Some((song, year)) => Ok(UpdateSongOutcome::Updated(song, year)),
          None => Ok(UpdateSongOutcome::SongMissing),
        }
      })
      .await
      .map_err(db_err)?;

    match outcome {
      UpdateSongOutcome::SongMissing => Err(Error::SongNotFound(id)),
      UpdateSongOutcome::YearMissing(year_id) => Err(Error::YearNotFound(year_id)),
      UpdateSongOutcome::Updated(song, year) => into_song_with_year((song, year)),
    }
  }

  async fn delete_song(&self, id: i64) -> Result<()> {
    let deleted: usize = self
      .conn
      .call(move |conn| {
        conn
          .execute("DELETE FROM songs WHERE id = ?1", rusqlite::params![id])
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    if deleted == 0 {
      Err(Error::SongNotFound(id))
    } else {
      Ok(())
    }
  }

  // ── Submissions ───────────────────────────────────────────────────────

  async fn create_submission(&self, input: NewSubmission) -> Result<Submission> {
    let now = encode_dt(Utc::now());

    let raw: RawSubmission = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions
             (title, fartist, email, bio, lyrics, audio_url, audio_file_name,
              status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'PENDING', ?8)",
          rusqlite::params![
            input.title,
            input.fartist,
            input.email,
            input.bio,
            input.lyrics,
            input.audio_url,
            input.audio_file_name,
            now,
          ],
        )?;
        conn
          .query_row(
            &format!("SELECT {SUBMISSION_COLS} FROM submissions WHERE id = ?1"),
            rusqlite::params![conn.last_insert_rowid()],
            submission_from_row,
          )
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    raw.into_submission()
  }

  async fn get_submission(&self, id: i64) -> Result<Option<Submission>> {
    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| select_submission(conn, id).map_err(Into::into))
      .await
      .map_err(db_err)?;

    raw.map(RawSubmission::into_submission).transpose()
  }

  async fn list_submissions(&self) -> Result<Vec<Submission>> {
    let raws: Vec<RawSubmission> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SUBMISSION_COLS} FROM submissions
           ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], submission_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(db_err)?;

    raws
      .into_iter()
      .map(RawSubmission::into_submission)
      .collect()
  }

  async fn update_submission(
    &self,
    id: i64,
    patch: SubmissionPatch,
  ) -> Result<Submission> {
    let status = patch.status.map(SubmissionStatus::as_str);

    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        let Some(sub) = select_submission(conn, id)? else {
          return Ok(None);
        };

        conn.execute(
          "UPDATE submissions
           SET title = ?1, fartist = ?2, email = ?3, bio = ?4, lyrics = ?5,
               status = ?6
           WHERE id = ?7",
          rusqlite::params![
            patch.title.unwrap_or(sub.title),
            patch.fartist.unwrap_or(sub.fartist),
            patch.email.or(sub.email),
            patch.bio.or(sub.bio),
            patch.lyrics.or(sub.lyrics),
            status.unwrap_or(&sub.status),
            id,
          ],
        )?;
        select_submission(conn, id).map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    match raw {
      Some(raw) => raw.into_submission(),
      None => Err(Error::SubmissionNotFound(id)),
    }
  }

  async fn approve_submission(&self, id: i64, year_id: i64) -> Result<Submission> {
    let now = encode_dt(Utc::now());

    let outcome: ApproveOutcome = self
      .conn
      .call(move |conn| {
        // Song creation and the status flip commit or roll back together;
        // the PENDING check inside the transaction makes a concurrent
        // second approval fail instead of duplicating the song.
        let tx = conn.transaction()?;

        let Some(sub) = tx
          .query_row(
            &format!("SELECT {SUBMISSION_COLS} FROM submissions WHERE id = ?1"),
            rusqlite::params![id],
            submission_from_row,
          )
          .optional()?
        else {
          return Ok(ApproveOutcome::SubmissionMissing);
        };

        if sub.status != "PENDING" {
          return Ok(ApproveOutcome::AlreadyModerated(sub.status));
        }

        let Some(year) = tx
          .query_row(
            &format!("SELECT {YEAR_COLS} FROM years WHERE id = ?1"),
            rusqlite::params![year_id],
            year_from_row,
          )
          .optional()?
        else {
          return Ok(ApproveOutcome::YearMissing);
        };

        tx.execute(
          "INSERT INTO songs (title, fartist, bio, lyrics, audio_url, year_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            sub.title,
            sub.fartist,
            sub.bio.unwrap_or_default(),
            sub.lyrics.unwrap_or_default(),
            sub.audio_url,
            year_id,
            now,
          ],
        )?;

        tx.execute(
          "UPDATE submissions SET status = 'APPROVED', target_year = ?1 WHERE id = ?2",
          rusqlite::params![year.year, id],
        )?;

        let updated = tx.query_row(
          &format!("SELECT {SUBMISSION_COLS} FROM submissions WHERE id = ?1"),
          rusqlite::params![id],
          submission_from_row,
        )?;

        tx.commit()?;
        Ok(ApproveOutcome::Approved(updated))
      })
      .await
      .map_err(db_err)?;

    match outcome {
      ApproveOutcome::SubmissionMissing => Err(Error::SubmissionNotFound(id)),
      ApproveOutcome::YearMissing => Err(Error::YearNotFound(year_id)),
      ApproveOutcome::AlreadyModerated(status) => Err(Error::AlreadyModerated {
        id,
        status: SubmissionStatus::parse(&status)?,
      }),
      ApproveOutcome::Approved(raw) => raw.into_submission(),
    }
  }

  async fn delete_submission(&self, id: i64) -> Result<()> {
    let deleted: usize = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "DELETE FROM submissions WHERE id = ?1",
            rusqlite::params![id],
          )
          .map_err(Into::into)
      })
      .await
      .map_err(db_err)?;

    if deleted == 0 {
      Err(Error::SubmissionNotFound(id))
    } else {
      Ok(())
    }
  }
}
