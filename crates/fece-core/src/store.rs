//! The `RecordStore` trait — persistence seam for years, songs, and
//! submissions.
//!
//! The trait is implemented by storage backends (e.g. `fece-store-sqlite`).
//! Higher layers (`fece-api`, `fece-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`). Errors are the
//! shared [`crate::Error`] so callers can distinguish not-found and
//! conflict conditions from backend failures.

use std::future::Future;

use crate::{
  Error,
  song::{NewSong, Song, SongPatch, SongWithYear},
  submission::{NewSubmission, Submission, SubmissionPatch},
  year::{NewYear, Year, YearWithSongs},
};

/// Abstraction over the site's record store.
///
/// Creation timestamps are always assigned by the store; they are not
/// accepted from callers.
pub trait RecordStore: Send + Sync {
  // ── Years ─────────────────────────────────────────────────────────────

  /// Create a new year. Fails with [`Error::DuplicateYear`] if the year
  /// number is already taken.
  fn create_year(
    &self,
    input: NewYear,
  ) -> impl Future<Output = Result<Year, Error>> + Send + '_;

  /// Create the year if its number is absent, otherwise update its
  /// description. Used by seeding.
  fn upsert_year(
    &self,
    input: NewYear,
  ) -> impl Future<Output = Result<Year, Error>> + Send + '_;

  /// Retrieve a year with its songs (creation order). `None` if missing.
  fn get_year(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<YearWithSongs>, Error>> + Send + '_;

  /// Look up a year by its unique year number.
  fn find_year_by_number(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Option<Year>, Error>> + Send + '_;

  /// All years, newest year number first, each with its songs in
  /// creation order.
  fn list_years(
    &self,
  ) -> impl Future<Output = Result<Vec<YearWithSongs>, Error>> + Send + '_;

  /// Update a year's description — the only mutation years support.
  fn update_year_description(
    &self,
    id: i64,
    description: String,
  ) -> impl Future<Output = Result<Year, Error>> + Send + '_;

  // ── Songs ─────────────────────────────────────────────────────────────

  /// Create a song directly (the admin path). Fails with
  /// [`Error::YearNotFound`] if the target year does not exist.
  fn create_song(
    &self,
    input: NewSong,
  ) -> impl Future<Output = Result<SongWithYear, Error>> + Send + '_;

  fn get_song(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SongWithYear>, Error>> + Send + '_;

  /// Look up a song by title and fartist. Used by seeding to stay
  /// idempotent.
  fn find_song<'a>(
    &'a self,
    title: &'a str,
    fartist: &'a str,
  ) -> impl Future<Output = Result<Option<Song>, Error>> + Send + 'a;

  /// All songs, newest first, each joined with its year.
  fn list_songs(
    &self,
  ) -> impl Future<Output = Result<Vec<SongWithYear>, Error>> + Send + '_;

  /// Apply a partial edit, including year reassignment.
  fn update_song(
    &self,
    id: i64,
    patch: SongPatch,
  ) -> impl Future<Output = Result<SongWithYear, Error>> + Send + '_;

  /// Delete a song row. The audio object is untouched — published audio
  /// is independent storage state.
  fn delete_song(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Error>> + Send + '_;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Persist a new submission in PENDING status.
  fn create_submission(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<Submission, Error>> + Send + '_;

  fn get_submission(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Submission>, Error>> + Send + '_;

  /// All submissions, newest first.
  fn list_submissions(
    &self,
  ) -> impl Future<Output = Result<Vec<Submission>, Error>> + Send + '_;

  /// Apply field edits and/or a non-approval status change (rejection).
  fn update_submission(
    &self,
    id: i64,
    patch: SubmissionPatch,
  ) -> impl Future<Output = Result<Submission, Error>> + Send + '_;

  /// Approve a PENDING submission into `year_id`, atomically:
  /// a song is created from the submission's fields and the submission
  /// moves to APPROVED with `target_year` set, both in one transaction.
  ///
  /// Fails with [`Error::SubmissionNotFound`] / [`Error::YearNotFound`]
  /// if either side is missing, and with [`Error::AlreadyModerated`] if
  /// the submission is no longer PENDING — which also makes concurrent
  /// approvals of the same submission safe.
  fn approve_submission(
    &self,
    id: i64,
    year_id: i64,
  ) -> impl Future<Output = Result<Submission, Error>> + Send + '_;

  /// Delete a submission row. Blob cleanup is the caller's concern.
  fn delete_submission(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Error>> + Send + '_;
}
