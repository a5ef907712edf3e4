//! FECE ON EARTH site server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite database, and serves the JSON API over HTTP. With the
//! local storage backend it also serves the audio objects themselves and
//! accepts direct uploads on `PUT /api/upload/{key}`.
//!
//! # Seeding
//!
//! To create the canonical years and starter songs:
//!
//! ```
//! cargo run -p fece-server -- --seed
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{
  Router,
  extract::{Path, State},
  http::StatusCode,
  routing::put,
};
use bytes::Bytes;
use clap::Parser;
use fece_api::AppState;
use fece_blob::{LocalBlobStore, S3BlobStore};
use fece_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod config;
mod seed;

use crate::config::{ServerConfig, StorageConfig};

#[derive(Parser)]
#[command(author, version, about = "FECE ON EARTH site server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Seed the canonical years and starter songs, then exit.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = ::config::Config::builder()
    .add_source(::config::File::from(cli.config).required(false))
    .add_source(::config::Environment::with_prefix("FECE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store (creates the schema on first use).
  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| {
      format!("failed to open database at {:?}", server_cfg.database_path)
    })?;

  // Helper mode: seed and exit.
  if cli.seed {
    seed::run(&store).await?;
    return Ok(());
  }

  let app = match &server_cfg.storage {
    StorageConfig::Local { dir } => {
      let blobs = Arc::new(LocalBlobStore::new(
        dir.clone(),
        &server_cfg.public_url,
        format!("{}/api/upload", server_cfg.public_url),
      ));
      let state = AppState {
        store: Arc::new(store),
        blobs: blobs.clone(),
      };

      // The local backend has no bucket to presign against, so presigned
      // upload URLs point back at this route.
      let upload = Router::new()
        .route("/api/upload/{*key}", put(put_object))
        .with_state(blobs);

      Router::new()
        .nest("/api", fece_api::api_router(state))
        .merge(upload)
        .nest_service("/audio", ServeDir::new(dir.join("audio")))
    }
    StorageConfig::S3(s3) => {
      let state = AppState {
        store: Arc::new(store),
        blobs: Arc::new(S3BlobStore::new(s3.clone())),
      };
      Router::new().nest("/api", fece_api::api_router(state))
    }
  };
  let app = app.layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// `PUT /api/upload/{key}` — the local-backend upload endpoint that
/// presigned upload URLs point at.
async fn put_object(
  State(blobs): State<Arc<LocalBlobStore>>,
  Path(key): Path<String>,
  body: Bytes,
) -> StatusCode {
  match blobs.put_key(&key, body).await {
    Ok(()) => StatusCode::OK,
    Err(fece_blob::Error::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
    Err(e) => {
      tracing::error!(%key, "upload failed: {e}");
      StatusCode::INTERNAL_SERVER_ERROR
    }
  }
}
