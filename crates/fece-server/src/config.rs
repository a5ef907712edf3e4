//! Server configuration, deserialised from `config.toml` plus `FECE_*`
//! environment variables.
//!
//! ```toml
//! host          = "0.0.0.0"
//! port          = 3000
//! public_url    = "https://fece.example.com"
//! database_path = "fece.db"
//!
//! [storage]
//! backend = "local"
//! dir     = "data"
//! ```
//!
//! or, for a bucket:
//!
//! ```toml
//! [storage]
//! backend           = "s3"
//! endpoint          = "https://<account-id>.r2.cloudflarestorage.com"
//! region            = "auto"
//! bucket            = "fece-audio"
//! access_key_id     = "..."
//! secret_access_key = "..."
//! public_url        = "https://audio.example.com"
//! ```

use std::path::PathBuf;

use fece_blob::S3Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// Base URL the site is reachable at. Local audio objects are public
  /// under it, and the local upload route lives below it.
  #[serde(default = "default_public_url")]
  pub public_url:    String,
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  #[serde(default)]
  pub storage:       StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
  /// Audio objects on the local filesystem, served by this process.
  Local {
    #[serde(default = "default_storage_dir")]
    dir: PathBuf,
  },
  /// Audio objects in an S3-compatible bucket (e.g. Cloudflare R2).
  S3(S3Config),
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self::Local {
      dir: default_storage_dir(),
    }
  }
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  3000
}

fn default_public_url() -> String {
  "http://localhost:3000".to_string()
}

fn default_database_path() -> PathBuf {
  PathBuf::from("fece.db")
}

fn default_storage_dir() -> PathBuf {
  PathBuf::from("data")
}
