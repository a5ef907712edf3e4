//! [`LocalBlobStore`] — audio objects on the local filesystem.
//!
//! Objects live under `<root>/<key>` and are served by the site server
//! itself. "Presigned" uploads point at the server's own upload route so
//! the direct-upload flow works identically against either backend.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use fece_core::blob::{
  BlobStore, PresignedUpload, key_from_url, object_key, sanitize_file_name,
};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
  root:        PathBuf,
  /// Base under which stored keys are publicly readable,
  /// e.g. `http://localhost:3000`.
  public_base: String,
  /// Base for the server's direct-PUT upload route,
  /// e.g. `http://localhost:3000/api/upload`.
  upload_base: String,
}

impl LocalBlobStore {
  pub fn new(
    root: impl Into<PathBuf>,
    public_base: impl Into<String>,
    upload_base: impl Into<String>,
  ) -> Self {
    Self {
      root:        root.into(),
      public_base: trim_slash(public_base.into()),
      upload_base: trim_slash(upload_base.into()),
    }
  }

  /// The directory objects are stored under.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Write `data` under `key`. Also used by the server's upload route.
  pub async fn put_key(&self, key: &str, data: Bytes) -> Result<()> {
    let path = self.path_for(key)?;
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, data).await?;
    Ok(())
  }

  fn path_for(&self, key: &str) -> Result<PathBuf> {
    // Keys come from URLs; refuse anything that could escape the root.
    if key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
      return Err(Error::InvalidUrl(key.to_string()));
    }
    Ok(self.root.join(key))
  }

  fn fresh_key(file_name: &str) -> String {
    object_key(Utc::now().timestamp_millis(), &sanitize_file_name(file_name))
  }
}

fn trim_slash(mut s: String) -> String {
  while s.ends_with('/') {
    s.pop();
  }
  s
}

impl BlobStore for LocalBlobStore {
  type Error = Error;

  async fn upload(
    &self,
    data: Bytes,
    file_name: &str,
    _content_type: &str,
  ) -> Result<String> {
    let key = Self::fresh_key(file_name);
    self.put_key(&key, data).await?;
    Ok(format!("{}/{key}", self.public_base))
  }

  async fn delete(&self, url: &str) -> Result<()> {
    let key = key_from_url(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    let path = self.path_for(&key)?;
    tokio::fs::remove_file(path).await?;
    Ok(())
  }

  async fn presign_upload(
    &self,
    file_name: &str,
    _content_type: &str,
  ) -> Result<PresignedUpload> {
    let key = Self::fresh_key(file_name);
    Ok(PresignedUpload {
      upload_url: format!("{}/{key}", self.upload_base),
      public_url: format!("{}/{key}", self.public_base),
      key,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store(dir: &Path) -> LocalBlobStore {
    LocalBlobStore::new(
      dir,
      "http://localhost:3000",
      "http://localhost:3000/api/upload/",
    )
  }

  #[tokio::test]
  async fn upload_writes_file_and_returns_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let s = store(dir.path());

    let url = s
      .upload(Bytes::from_static(b"mp3 bytes"), "my song!.mp3", "audio/mpeg")
      .await
      .unwrap();

    assert!(url.starts_with("http://localhost:3000/audio/"));
    assert!(url.ends_with("-my_song_.mp3"));

    let key = key_from_url(&url).unwrap();
    let on_disk = tokio::fs::read(dir.path().join(&key)).await.unwrap();
    assert_eq!(on_disk, b"mp3 bytes");
  }

  #[tokio::test]
  async fn delete_removes_the_object() {
    let dir = tempfile::tempdir().unwrap();
    let s = store(dir.path());

    let url = s
      .upload(Bytes::from_static(b"x"), "gone.mp3", "audio/mpeg")
      .await
      .unwrap();
    s.delete(&url).await.unwrap();

    let key = key_from_url(&url).unwrap();
    assert!(!dir.path().join(key).exists());
  }

  #[tokio::test]
  async fn delete_of_missing_object_fails() {
    let dir = tempfile::tempdir().unwrap();
    let s = store(dir.path());
    let err = s
      .delete("http://localhost:3000/audio/1-nothing.mp3")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
  }

  #[tokio::test]
  async fn path_traversal_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let s = store(dir.path());
    let err = s
      .delete("http://localhost:3000/audio/../../etc/passwd")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
  }

  #[tokio::test]
  async fn presign_points_at_the_upload_route() {
    let dir = tempfile::tempdir().unwrap();
    let s = store(dir.path());

    let p = s.presign_upload("tune.mp3", "audio/mpeg").await.unwrap();
    assert!(p.key.starts_with("audio/"));
    assert!(p.key.ends_with("-tune.mp3"));
    assert_eq!(p.upload_url, format!("http://localhost:3000/api/upload/{}", p.key));
    assert_eq!(p.public_url, format!("http://localhost:3000/{}", p.key));
  }
}
