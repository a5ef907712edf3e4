//! Handler for `POST /upload-url` — presigned direct upload.
//!
//! The browser asks for an upload slot, PUTs the audio bytes straight to
//! the object store, then posts only the resulting public URL to
//! `/submissions`. The audio payload never passes through this server.

use axum::{Json, extract::State};
use fece_core::blob::{BlobStore, PresignedUpload};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlBody {
  pub file_name:    Option<String>,
  pub content_type: Option<String>,
}

/// `POST /upload-url`
pub async fn create_url<S, B>(
  State(state): State<AppState<S, B>>,
  Json(body): Json<UploadUrlBody>,
) -> Result<Json<PresignedUpload>, ApiError>
where
  S: fece_core::store::RecordStore,
  B: BlobStore,
{
  let (Some(file_name), Some(content_type)) = (body.file_name, body.content_type)
  else {
    return Err(ApiError::BadRequest(
      "fileName and contentType are required".into(),
    ));
  };

  let presigned = state
    .blobs
    .presign_upload(&file_name, &content_type)
    .await
    .map_err(ApiError::blob)?;
  Ok(Json(presigned))
}
