//! JSON REST API for the FECE ON EARTH song site.
//!
//! Exposes an axum [`Router`] backed by any [`RecordStore`] +
//! [`BlobStore`] pair. Transport concerns (static file serving, tracing
//! middleware, the local upload route) belong to the server binary.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", fece_api::api_router(state.clone()))
//! ```

pub mod error;
pub mod songs;
pub mod submissions;
pub mod upload;
pub mod years;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use fece_core::{blob::BlobStore, store::RecordStore};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers. Built once in the process
/// entry point; both handles are injected, never global.
pub struct AppState<S, B> {
  pub store: Arc<S>,
  pub blobs: Arc<B>,
}

// Manual impl so `S`/`B` don't need to be `Clone` themselves.
impl<S, B> Clone for AppState<S, B> {
  fn clone(&self) -> Self {
    Self {
      store: self.store.clone(),
      blobs: self.blobs.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S, B>(state: AppState<S, B>) -> Router<()>
where
  S: RecordStore + 'static,
  B: BlobStore + 'static,
{
  Router::new()
    // Years
    .route("/years", get(years::list::<S, B>).post(years::create::<S, B>))
    .route(
      "/years/{id}",
      get(years::get_one::<S, B>).patch(years::update::<S, B>),
    )
    // Songs
    .route("/songs", get(songs::list::<S, B>).post(songs::create::<S, B>))
    .route(
      "/songs/{id}",
      get(songs::get_one::<S, B>)
        .patch(songs::update::<S, B>)
        .delete(songs::delete::<S, B>),
    )
    // Submissions
    .route(
      "/submissions",
      get(submissions::list::<S, B>).post(submissions::create::<S, B>),
    )
    .route(
      "/submissions/{id}",
      get(submissions::get_one::<S, B>)
        .patch(submissions::update::<S, B>)
        .delete(submissions::delete::<S, B>),
    )
    // Presigned uploads
    .route("/upload-url", post(upload::create_url::<S, B>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use bytes::Bytes;
  use fece_blob::LocalBlobStore;
  use fece_core::blob::BlobStore as _;
  use fece_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  struct TestApp {
    router: Router,
    blobs:  Arc<LocalBlobStore>,
    // Held so the blob directory outlives the test.
    _dir:   tempfile::TempDir,
  }

  async fn app() -> TestApp {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let blobs = Arc::new(LocalBlobStore::new(
      dir.path(),
      "http://localhost:3000",
      "http://localhost:3000/api/upload",
    ));
    let router = api_router(AppState {
      store: Arc::new(store),
      blobs: blobs.clone(),
    });
    TestApp {
      router,
      blobs,
      _dir: dir,
    }
  }

  async fn call(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app
      .router
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn create_year(app: &TestApp, year: i32) -> i64 {
    let (status, body) =
      call(app, "POST", "/years", Some(json!({ "year": year }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
  }

  fn submission_payload(title: &str, fartist: &str) -> Value {
    json!({
      "title": title,
      "fartist": fartist,
      "bio": "recorded in a garage",
      "audioUrl": format!("http://localhost:3000/audio/1-{title}.mp3"),
      "audioFileName": format!("{title}.mp3"),
    })
  }

  // ── Submission intake ───────────────────────────────────────────────────

  #[tokio::test]
  async fn valid_submission_returns_201_and_lists_as_pending() {
    let app = app().await;

    let (status, created) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Sleigh What", "Mrs. Claws")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["fartist"], "Mrs. Claws");
    assert_eq!(created["targetYear"], Value::Null);

    let (status, listed) = call(&app, "GET", "/submissions", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["title"], "Sleigh What");
    assert_eq!(listed[0]["status"], "PENDING");
  }

  #[tokio::test]
  async fn submission_missing_required_fields_is_rejected() {
    let app = app().await;

    for payload in [
      json!({ "fartist": "X", "audioUrl": "http://x/audio/1-a.mp3" }),
      json!({ "title": "T", "audioUrl": "http://x/audio/1-a.mp3" }),
      json!({ "title": "T", "fartist": "X" }),
    ] {
      let (status, body) = call(&app, "POST", "/submissions", Some(payload)).await;
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert!(body["error"].is_string());
    }

    // No records were created.
    let (_, listed) = call(&app, "GET", "/submissions", None).await;
    assert!(listed.as_array().unwrap().is_empty());
  }

  // ── Moderation ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn approving_pending_submission_promotes_it() {
    let app = app().await;
    let year_id = create_year(&app, 2025).await;

    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Tinsel Fever", "Garland Greg")),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();

    let (status, approved) = call(
      &app,
      "PATCH",
      &format!("/submissions/{sub_id}"),
      Some(json!({ "status": "APPROVED", "yearId": year_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "APPROVED");
    assert_eq!(approved["targetYear"], 2025);

    // Exactly one song, fields copied, URL reused verbatim.
    let (_, songs) = call(&app, "GET", "/songs", None).await;
    let songs = songs.as_array().unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0]["title"], "Tinsel Fever");
    assert_eq!(songs[0]["fartist"], "Garland Greg");
    assert_eq!(songs[0]["bio"], "recorded in a garage");
    assert_eq!(songs[0]["audioUrl"], sub["audioUrl"]);
    assert_eq!(songs[0]["year"]["year"], 2025);
  }

  #[tokio::test]
  async fn approving_without_year_id_is_rejected() {
    let app = app().await;
    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Halfway", "Approved")),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();

    let (status, body) = call(
      &app,
      "PATCH",
      &format!("/submissions/{sub_id}"),
      Some(json!({ "status": "APPROVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Still pending, no song created.
    let (_, fetched) = call(&app, "GET", &format!("/submissions/{sub_id}"), None).await;
    assert_eq!(fetched["status"], "PENDING");
  }

  #[tokio::test]
  async fn rejecting_sets_status_and_creates_no_song() {
    let app = app().await;
    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Too Edgy", "The Grinch")),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();

    let (status, rejected) = call(
      &app,
      "PATCH",
      &format!("/submissions/{sub_id}"),
      Some(json!({ "status": "REJECTED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "REJECTED");

    let (_, songs) = call(&app, "GET", "/songs", None).await;
    assert!(songs.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn approving_missing_submission_or_year_is_404() {
    let app = app().await;
    let year_id = create_year(&app, 2025).await;

    let (status, _) = call(
      &app,
      "PATCH",
      "/submissions/404",
      Some(json!({ "status": "APPROVED", "yearId": year_id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Lost", "Nobody")),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();
    let (status, _) = call(
      &app,
      "PATCH",
      &format!("/submissions/{sub_id}"),
      Some(json!({ "status": "APPROVED", "yearId": 404 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Submission deletion ─────────────────────────────────────────────────

  #[tokio::test]
  async fn deleting_submission_removes_row_even_if_blob_delete_fails() {
    let app = app().await;

    // The audio URL points at an object that was never stored.
    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(submission_payload("Phantom", "No Object")),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();

    let (status, body) =
      call(&app, "DELETE", &format!("/submissions/{sub_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = call(&app, "GET", &format!("/submissions/{sub_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn deleting_submission_deletes_its_stored_audio() {
    let app = app().await;

    let url = app
      .blobs
      .upload(Bytes::from_static(b"mp3"), "real.mp3", "audio/mpeg")
      .await
      .unwrap();
    let key = fece_core::blob::key_from_url(&url).unwrap();

    let (_, sub) = call(
      &app,
      "POST",
      "/submissions",
      Some(json!({
        "title": "Stored",
        "fartist": "On Disk",
        "audioUrl": url,
      })),
    )
    .await;
    let sub_id = sub["id"].as_i64().unwrap();

    let (status, _) = call(&app, "DELETE", &format!("/submissions/{sub_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.blobs.root().join(key).exists());
  }

  // ── Years and songs ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn year_playlist_lists_songs_in_creation_order() {
    let app = app().await;
    let year_id = create_year(&app, 2025).await;

    for (title, fartist) in [
      ("Frosty Twinkle", "Saint Mary of Puddle"),
      ("Diarrhea For Christmas", "DJ Yule"),
    ] {
      let (status, _) = call(
        &app,
        "POST",
        "/songs",
        Some(json!({
          "title": title,
          "fartist": fartist,
          "audioUrl": format!("http://localhost:3000/audio/1-{title}.mp3"),
          "yearId": year_id,
        })),
      )
      .await;
      assert_eq!(status, StatusCode::CREATED);
    }

    let (status, year) = call(&app, "GET", &format!("/years/{year_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(year["year"], 2025);
    let titles: Vec<&str> = year["songs"]
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["title"].as_str().unwrap())
      .collect();
    assert_eq!(titles, ["Frosty Twinkle", "Diarrhea For Christmas"]);
  }

  #[tokio::test]
  async fn duplicate_year_is_rejected() {
    let app = app().await;
    create_year(&app, 2025).await;

    let (status, body) =
      call(&app, "POST", "/years", Some(json!({ "year": 2025 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn missing_records_return_404_with_error_body() {
    let app = app().await;
    for uri in ["/years/99", "/songs/99", "/submissions/99"] {
      let (status, body) = call(&app, "GET", uri, None).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
      assert!(body["error"].is_string(), "{uri}");
    }
  }

  #[tokio::test]
  async fn song_create_requires_all_fields_and_real_year() {
    let app = app().await;

    let (status, _) = call(
      &app,
      "POST",
      "/songs",
      Some(json!({ "title": "No Year", "fartist": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
      &app,
      "POST",
      "/songs",
      Some(json!({
        "title": "Ghost Year",
        "fartist": "X",
        "audioUrl": "http://x/audio/1-g.mp3",
        "yearId": 42,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Presigned uploads ───────────────────────────────────────────────────

  #[tokio::test]
  async fn upload_url_returns_key_and_urls() {
    let app = app().await;

    let (status, body) = call(
      &app,
      "POST",
      "/upload-url",
      Some(json!({ "fileName": "my song!.mp3", "contentType": "audio/mpeg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let key = body["key"].as_str().unwrap();
    assert!(key.starts_with("audio/"));
    assert!(key.ends_with("-my_song_.mp3"));
    assert_eq!(
      body["uploadUrl"],
      format!("http://localhost:3000/api/upload/{key}")
    );
    assert_eq!(body["publicUrl"], format!("http://localhost:3000/{key}"));
  }

  #[tokio::test]
  async fn upload_url_requires_name_and_type() {
    let app = app().await;
    let (status, body) = call(
      &app,
      "POST",
      "/upload-url",
      Some(json!({ "fileName": "a.mp3" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "fileName and contentType are required");
  }
}
