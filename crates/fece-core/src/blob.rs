//! The `BlobStore` trait — capability seam for audio object storage.
//!
//! Three storage strategies existed historically (local disk, server-side
//! bucket upload, presigned direct upload); all are equivalent from the
//! record store's point of view, producing a URL string stored verbatim.
//! This trait models the surviving capability set with a local-filesystem
//! and a bucket-backed implementation behind it (`fece-blob`).

use std::future::Future;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Everything a browser (or the CLI) needs to upload one object directly
/// and then tell the server only the resulting public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
  /// Time-limited URL the client PUTs the audio bytes to.
  pub upload_url: String,
  /// The object key, `audio/<unix-millis>-<fileName>`.
  pub key:        String,
  /// Where the object will be publicly readable once uploaded.
  pub public_url: String,
}

/// How long a presigned upload URL stays valid.
pub const UPLOAD_URL_EXPIRY_SECS: u64 = 3600;

/// Abstraction over the audio object store.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `data` under a fresh timestamped key and return its public URL.
  fn upload<'a>(
    &'a self,
    data: Bytes,
    file_name: &'a str,
    content_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Delete the object a public URL points at. The key is parsed out of
  /// the URL path. Callers treat failure as best-effort cleanup.
  fn delete<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Issue a presigned PUT so the client uploads directly, bypassing the
  /// server for the audio payload. Expiry is [`UPLOAD_URL_EXPIRY_SECS`].
  fn presign_upload<'a>(
    &'a self,
    file_name: &'a str,
    content_type: &'a str,
  ) -> impl Future<Output = Result<PresignedUpload, Self::Error>> + Send + 'a;
}

// ─── Key helpers ─────────────────────────────────────────────────────────────

/// Replace every character outside `[A-Za-z0-9.-]` with `_`, so uploaded
/// names are safe as object-key suffixes and on local filesystems.
pub fn sanitize_file_name(name: &str) -> String {
  name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
        c
      } else {
        '_'
      }
    })
    .collect()
}

/// Build the object key for an upload: `audio/<unix-millis>-<fileName>`.
/// The timestamp prefix keeps concurrent uploads of identically-named
/// files from clobbering each other.
pub fn object_key(unix_millis: i64, sanitized_file_name: &str) -> String {
  format!("audio/{unix_millis}-{sanitized_file_name}")
}

/// Extract the object key from a public URL: the path without its leading
/// slash. Returns `None` for URLs with no path component.
pub fn key_from_url(url: &str) -> Option<String> {
  let after_scheme = match url.split_once("://") {
    Some((_, rest)) => rest,
    None => url,
  };
  let (_, path) = after_scheme.split_once('/')?;
  let path = path.split(['?', '#']).next().unwrap_or(path);
  if path.is_empty() {
    None
  } else {
    Some(path.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitize_keeps_safe_characters() {
    assert_eq!(sanitize_file_name("jingle-bells.v2.mp3"), "jingle-bells.v2.mp3");
  }

  #[test]
  fn sanitize_replaces_everything_else() {
    assert_eq!(
      sanitize_file_name("DJ Yule - Diarrhea For Christmas.mp3"),
      "DJ_Yule_-_Diarrhea_For_Christmas.mp3"
    );
    assert_eq!(sanitize_file_name("nöel/était là.mp3"), "n_el__tait_l_.mp3");
  }

  #[test]
  fn object_key_format() {
    assert_eq!(
      object_key(1700000000000, "song.mp3"),
      "audio/1700000000000-song.mp3"
    );
  }

  #[test]
  fn key_from_url_strips_host_and_query() {
    assert_eq!(
      key_from_url("https://cdn.example.com/audio/1-song.mp3").as_deref(),
      Some("audio/1-song.mp3")
    );
    assert_eq!(
      key_from_url("https://cdn.example.com/audio/1-song.mp3?X-Amz-Expires=3600").as_deref(),
      Some("audio/1-song.mp3")
    );
    assert_eq!(key_from_url("https://cdn.example.com/"), None);
    assert_eq!(key_from_url("https://cdn.example.com"), None);
  }
}
