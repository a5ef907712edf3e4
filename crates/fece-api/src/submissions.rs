//! Handlers for `/submissions` — public intake plus moderation.
//!
//! The PATCH handler carries the approval path: a body of
//! `{"status":"APPROVED","yearId":N}` promotes the submission into a song
//! atomically. Everything else is a plain field/status edit.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fece_core::{
  blob::BlobStore,
  store::RecordStore,
  submission::{NewSubmission, Submission, SubmissionPatch, SubmissionStatus},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /submissions` — newest first.
pub async fn list<S, B>(
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<Submission>>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  Ok(Json(state.store.list_submissions().await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionBody {
  pub title:           Option<String>,
  pub fartist:         Option<String>,
  pub email:           Option<String>,
  pub bio:             Option<String>,
  pub lyrics:          Option<String>,
  pub audio_url:       Option<String>,
  pub audio_file_name: Option<String>,
}

/// `POST /submissions` — the audio object is already uploaded (presigned
/// flow); the body carries its public URL.
pub async fn create<S, B>(
  State(state): State<AppState<S, B>>,
  Json(body): Json<CreateSubmissionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let (Some(title), Some(fartist), Some(audio_url)) =
    (body.title, body.fartist, body.audio_url)
  else {
    return Err(ApiError::BadRequest(
      "Title, fartist, and audioUrl are required".into(),
    ));
  };

  let submission = state
    .store
    .create_submission(NewSubmission {
      title,
      fartist,
      email: body.email,
      bio: body.bio,
      lyrics: body.lyrics,
      audio_url,
      audio_file_name: body.audio_file_name.unwrap_or_else(|| "audio.mp3".into()),
    })
    .await?;
  Ok((StatusCode::CREATED, Json(submission)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /submissions/:id`
pub async fn get_one<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
) -> Result<Json<Submission>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let submission = state
    .store
    .get_submission(id)
    .await?
    .ok_or_else(|| ApiError::NotFound("Submission not found".into()))?;
  Ok(Json(submission))
}

// ─── Update / moderation ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmissionBody {
  pub status:  Option<SubmissionStatus>,
  pub year_id: Option<i64>,
  pub title:   Option<String>,
  pub fartist: Option<String>,
  pub email:   Option<String>,
  pub bio:     Option<String>,
  pub lyrics:  Option<String>,
}

/// `PATCH /submissions/:id`
pub async fn update<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateSubmissionBody>,
) -> Result<Json<Submission>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  if body.status == Some(SubmissionStatus::Approved) {
    let year_id = body
      .year_id
      .ok_or_else(|| ApiError::BadRequest("yearId is required to approve".into()))?;
    let approved = state.store.approve_submission(id, year_id).await?;
    return Ok(Json(approved));
  }

  let updated = state
    .store
    .update_submission(id, SubmissionPatch {
      title:   body.title,
      fartist: body.fartist,
      email:   body.email,
      bio:     body.bio,
      lyrics:  body.lyrics,
      status:  body.status,
    })
    .await?;
  Ok(Json(updated))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /submissions/:id` — tries to delete the stored audio object
/// first; that cleanup is best-effort and the row is removed either way.
pub async fn delete<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let submission = state
    .store
    .get_submission(id)
    .await?
    .ok_or_else(|| ApiError::NotFound("Submission not found".into()))?;

  if let Err(e) = state.blobs.delete(&submission.audio_url).await {
    tracing::warn!(
      url = %submission.audio_url,
      "could not delete audio object: {e}"
    );
  }

  state.store.delete_submission(id).await?;
  Ok(Json(json!({ "success": true })))
}
