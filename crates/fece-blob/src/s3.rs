//! [`S3BlobStore`] — audio objects in an S3-compatible bucket.
//!
//! Built for Cloudflare R2 but speaks plain S3: path-style addressing
//! against a configured endpoint, SigV4 presigned requests, and a separate
//! public-read base URL (R2 buckets are fronted by their own domain).
//!
//! The server's own uploads and deletes go through presigned URLs too, so
//! there is exactly one signing code path whether the client is a browser
//! or this process.

use bytes::Bytes;
use chrono::Utc;
use fece_core::blob::{
  BlobStore, PresignedUpload, UPLOAD_URL_EXPIRY_SECS, key_from_url, object_key,
  sanitize_file_name,
};
use serde::Deserialize;

use crate::{
  Error, Result,
  sign::{Presigner, encode_path},
};

/// Bucket connection settings, deserialised from the server config.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
  /// S3 endpoint, e.g. `https://<account-id>.r2.cloudflarestorage.com`.
  pub endpoint:          String,
  /// `auto` for R2.
  pub region:            String,
  pub bucket:            String,
  pub access_key_id:     String,
  pub secret_access_key: String,
  /// Base URL the bucket is publicly readable under.
  pub public_url:        String,
}

pub struct S3BlobStore {
  endpoint:    String,
  host:        String,
  bucket:      String,
  public_base: String,
  signer:      Presigner,
  client:      reqwest::Client,
}

impl S3BlobStore {
  pub fn new(config: S3Config) -> Self {
    let endpoint = config.endpoint.trim_end_matches('/').to_string();
    let host = endpoint
      .split_once("://")
      .map(|(_, rest)| rest)
      .unwrap_or(&endpoint)
      .to_string();

    Self {
      endpoint,
      host,
      bucket: config.bucket,
      public_base: config.public_url.trim_end_matches('/').to_string(),
      signer: Presigner::new(
        config.access_key_id,
        config.secret_access_key,
        config.region,
      ),
      client: reqwest::Client::new(),
    }
  }

  /// A presigned URL for `method` on `key`, valid for `expires_secs`.
  fn presigned_url(&self, method: &str, key: &str, expires_secs: u64) -> Result<String> {
    let path = encode_path(&format!("{}/{key}", self.bucket));
    let query = self
      .signer
      .presign_query(method, &self.host, &path, Utc::now(), expires_secs)?;
    Ok(format!("{}{path}?{query}", self.endpoint))
  }

  fn public_url(&self, key: &str) -> String {
    format!("{}/{key}", self.public_base)
  }
}

impl BlobStore for S3BlobStore {
  type Error = Error;

  async fn upload(
    &self,
    data: Bytes,
    file_name: &str,
    content_type: &str,
  ) -> Result<String> {
    let key = object_key(Utc::now().timestamp_millis(), &sanitize_file_name(file_name));
    let url = self.presigned_url("PUT", &key, UPLOAD_URL_EXPIRY_SECS)?;

    let resp = self
      .client
      .put(url)
      .header(reqwest::header::CONTENT_TYPE, content_type)
      .body(data)
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::UnexpectedStatus {
        status: resp.status().as_u16(),
        key,
      });
    }
    Ok(self.public_url(&key))
  }

  async fn delete(&self, url: &str) -> Result<()> {
    let key = key_from_url(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    let presigned = self.presigned_url("DELETE", &key, UPLOAD_URL_EXPIRY_SECS)?;

    let resp = self.client.delete(presigned).send().await?;
    // S3 DELETE returns 204 for existing and missing objects alike.
    if !resp.status().is_success() {
      return Err(Error::UnexpectedStatus {
        status: resp.status().as_u16(),
        key,
      });
    }
    Ok(())
  }

  async fn presign_upload(
    &self,
    file_name: &str,
    content_type: &str,
  ) -> Result<PresignedUpload> {
    let _ = content_type; // the payload and its type are not signed
    let key = object_key(Utc::now().timestamp_millis(), &sanitize_file_name(file_name));
    Ok(PresignedUpload {
      upload_url: self.presigned_url("PUT", &key, UPLOAD_URL_EXPIRY_SECS)?,
      public_url: self.public_url(&key),
      key,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> S3BlobStore {
    S3BlobStore::new(S3Config {
      endpoint:          "https://acct.r2.cloudflarestorage.com/".into(),
      region:            "auto".into(),
      bucket:            "fece-audio".into(),
      access_key_id:     "key".into(),
      secret_access_key: "secret".into(),
      public_url:        "https://audio.example.com/".into(),
    })
  }

  #[tokio::test]
  async fn presign_upload_shapes_key_and_urls() {
    let s = store();
    let p = s.presign_upload("O Höly Night.mp3", "audio/mpeg").await.unwrap();

    assert!(p.key.starts_with("audio/"));
    assert!(p.key.ends_with("-O_H_ly_Night.mp3"));
    assert_eq!(p.public_url, format!("https://audio.example.com/{}", p.key));
    assert!(p.upload_url.starts_with(
      "https://acct.r2.cloudflarestorage.com/fece-audio/audio/"
    ));
    assert!(p.upload_url.contains("X-Amz-Expires=3600"));
    assert!(p.upload_url.contains("X-Amz-Signature="));
  }

  #[test]
  fn endpoint_host_extraction() {
    let s = store();
    assert_eq!(s.host, "acct.r2.cloudflarestorage.com");
    assert_eq!(s.endpoint, "https://acct.r2.cloudflarestorage.com");
  }
}
