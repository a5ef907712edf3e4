//! Async HTTP client wrapping the FECE ON EARTH JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use fece_core::{
  blob::PresignedUpload,
  song::SongWithYear,
  submission::Submission,
  year::YearWithSongs,
};
use reqwest::Client;
use serde_json::json;

/// Async HTTP client for the site's JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(120))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_string(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url, path)
  }

  /// Error out on non-2xx, surfacing the server's `{"error": ...}` body
  /// when there is one.
  async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v["error"].as_str().map(str::to_string));
    match message {
      Some(m) => Err(anyhow!("{what} → {status}: {m}")),
      None => Err(anyhow!("{what} → {status}")),
    }
  }

  // ── Years ───────────────────────────────────────────────────────────────

  /// `GET /api/years`
  pub async fn list_years(&self) -> Result<Vec<YearWithSongs>> {
    let resp = self
      .client
      .get(self.url("/years"))
      .send()
      .await
      .context("GET /years failed")?;
    let resp = Self::check(resp, "GET /years").await?;
    resp.json().await.context("deserialising years")
  }

  /// Find a year (with its songs) by year number.
  pub async fn find_year(&self, year: i32) -> Result<Option<YearWithSongs>> {
    Ok(
      self
        .list_years()
        .await?
        .into_iter()
        .find(|y| y.year.year == year),
    )
  }

  // ── Songs ───────────────────────────────────────────────────────────────

  /// `GET /api/songs`
  pub async fn list_songs(&self) -> Result<Vec<SongWithYear>> {
    let resp = self
      .client
      .get(self.url("/songs"))
      .send()
      .await
      .context("GET /songs failed")?;
    let resp = Self::check(resp, "GET /songs").await?;
    resp.json().await.context("deserialising songs")
  }

  // ── Submissions ─────────────────────────────────────────────────────────

  /// `GET /api/submissions`
  pub async fn list_submissions(&self) -> Result<Vec<Submission>> {
    let resp = self
      .client
      .get(self.url("/submissions"))
      .send()
      .await
      .context("GET /submissions failed")?;
    let resp = Self::check(resp, "GET /submissions").await?;
    resp.json().await.context("deserialising submissions")
  }

  /// `POST /api/submissions` — the audio object is already uploaded.
  pub async fn create_submission(&self, body: serde_json::Value) -> Result<Submission> {
    let resp = self
      .client
      .post(self.url("/submissions"))
      .json(&body)
      .send()
      .await
      .context("POST /submissions failed")?;
    let resp = Self::check(resp, "POST /submissions").await?;
    resp.json().await.context("deserialising submission")
  }

  /// Approve a submission into a year.
  pub async fn approve_submission(&self, id: i64, year_id: i64) -> Result<Submission> {
    self
      .patch_submission(id, json!({ "status": "APPROVED", "yearId": year_id }))
      .await
  }

  /// Reject a submission.
  pub async fn reject_submission(&self, id: i64) -> Result<Submission> {
    self.patch_submission(id, json!({ "status": "REJECTED" })).await
  }

  async fn patch_submission(&self, id: i64, body: serde_json::Value) -> Result<Submission> {
    let resp = self
      .client
      .patch(self.url(&format!("/submissions/{id}")))
      .json(&body)
      .send()
      .await
      .context("PATCH /submissions failed")?;
    let resp = Self::check(resp, "PATCH /submissions").await?;
    resp.json().await.context("deserialising submission")
  }

  /// `DELETE /api/submissions/{id}`
  pub async fn delete_submission(&self, id: i64) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/submissions/{id}")))
      .send()
      .await
      .context("DELETE /submissions failed")?;
    Self::check(resp, "DELETE /submissions").await?;
    Ok(())
  }

  // ── Uploads ─────────────────────────────────────────────────────────────

  /// `POST /api/upload-url`
  pub async fn create_upload_url(
    &self,
    file_name: &str,
    content_type: &str,
  ) -> Result<PresignedUpload> {
    let resp = self
      .client
      .post(self.url("/upload-url"))
      .json(&json!({ "fileName": file_name, "contentType": content_type }))
      .send()
      .await
      .context("POST /upload-url failed")?;
    let resp = Self::check(resp, "POST /upload-url").await?;
    resp.json().await.context("deserialising upload URL")
  }

  /// PUT the audio bytes to a presigned upload URL.
  pub async fn put_audio(
    &self,
    upload_url: &str,
    data: Vec<u8>,
    content_type: &str,
  ) -> Result<()> {
    let resp = self
      .client
      .put(upload_url)
      .header(reqwest::header::CONTENT_TYPE, content_type)
      .body(data)
      .send()
      .await
      .context("uploading audio failed")?;
    Self::check(resp, "PUT audio").await?;
    Ok(())
  }

  /// Download an audio object. Site-relative URLs (`/audio/...`) are
  /// resolved against the configured base URL.
  pub async fn download_audio(&self, audio_url: &str) -> Result<Vec<u8>> {
    let url = if audio_url.starts_with('/') {
      format!("{}{audio_url}", self.base_url)
    } else {
      audio_url.to_string()
    };
    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;
    let resp = Self::check(resp, "GET audio").await?;
    Ok(resp.bytes().await.context("reading audio body")?.to_vec())
  }
}
