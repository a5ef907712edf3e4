//! Handlers for `/years` endpoints.
//!
//! | Method  | Path          | Notes |
//! |---------|---------------|-------|
//! | `GET`   | `/years`      | Newest year first, songs in creation order |
//! | `POST`  | `/years`      | Body: `{"year":2026,"description":"..."}` |
//! | `GET`   | `/years/:id`  | 404 if not found |
//! | `PATCH` | `/years/:id`  | Description is the only mutable field |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use fece_core::{
  blob::BlobStore,
  store::RecordStore,
  year::{NewYear, Year, YearWithSongs},
};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /years`
pub async fn list<S, B>(
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<YearWithSongs>>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  Ok(Json(state.store.list_years().await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateYearBody {
  pub year:        Option<i32>,
  pub description: Option<String>,
}

/// `POST /years`
pub async fn create<S, B>(
  State(state): State<AppState<S, B>>,
  Json(body): Json<CreateYearBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let year = body
    .year
    .ok_or_else(|| ApiError::BadRequest("year is required".into()))?;

  let created = state
    .store
    .create_year(NewYear {
      year,
      description: body.description.unwrap_or_default(),
    })
    .await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /years/:id`
pub async fn get_one<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
) -> Result<Json<YearWithSongs>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let year = state
    .store
    .get_year(id)
    .await?
    .ok_or_else(|| ApiError::NotFound("Year not found".into()))?;
  Ok(Json(year))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateYearBody {
  pub description: Option<String>,
}

/// `PATCH /years/:id`
pub async fn update<S, B>(
  State(state): State<AppState<S, B>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateYearBody>,
) -> Result<Json<Year>, ApiError>
where
  S: RecordStore,
  B: BlobStore,
{
  let description = body
    .description
    .ok_or_else(|| ApiError::BadRequest("description is required".into()))?;

  let year = state.store.update_year_description(id, description).await?;
  Ok(Json(year))
}
