//! Handlers for `/songs` endpoints — the admin path for managing
//! published tracks directly.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fece_core::{
  blob::BlobStore,
  song::{NewSong, SongPatch, SongWithYear},
  store::RecordStore,
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /songs` — newest first, joined with their year.
pub async fn list<S, B>(
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<SongWithYear>>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  Ok(Json(state.store.list_songs().await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongBody {
  pub title:     Option<String>,
  pub fartist:   Option<String>,
  pub bio:       Option<String>,
  pub lyrics:    Option<String>,
  pub audio_url: Option<String>,
  pub year_id:   Option<i64>,
}

/// `POST /songs`
pub async fn create<S, B>(
  State(state): State<AppState<S, B>>,
  Json(body): Json<CreateSongBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let (Some(title), Some(fartist), Some(audio_url), Some(year_id)) =
    (body.title, body.fartist, body.audio_url, body.year_id)
  else {
    return Err(ApiError::BadRequest(
      "title, fartist, audioUrl, and yearId are required".into(),
    ));
  };

  let song = state
    .store
    .create_song(NewSong {
      title,
      fartist,
      bio: body.bio.unwrap_or_default(),
      lyrics: body.lyrics.unwrap_or_default(),
      audio_url,
      year_id,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(song)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /songs/:id`
pub async fn get_one<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
) -> Result<Json<SongWithYear>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let song = state
    .store
    .get_song(id)
    .await?
    .ok_or_else(|| ApiError::NotFound("Song not found".into()))?;
  Ok(Json(song))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongBody {
  pub title:     Option<String>,
  pub fartist:   Option<String>,
  pub bio:       Option<String>,
  pub lyrics:    Option<String>,
  pub audio_url: Option<String>,
  pub year_id:   Option<i64>,
}

/// `PATCH /songs/:id` — partial edit, including year reassignment.
pub async fn update<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateSongBody>,
) -> Result<Json<SongWithYear>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let song = state
    .store
    .update_song(id, SongPatch {
      title:     body.title,
      fartist:   body.fartist,
      bio:       body.bio,
      lyrics:    body.lyrics,
      audio_url: body.audio_url,
      year_id:   body.year_id,
    })
    .await?;
  Ok(Json(song))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /songs/:id` — removes the row only; published audio is
/// independent storage state.
pub async fn delete<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  state.store.delete_song(id).await?;
  Ok(Json(json!({ "success": true })))
}
