//! `fece` — command line companion for the FECE ON EARTH site.
//!
//! # Usage
//!
//! ```
//! fece years
//! fece submit --title "Frosty Twinkle" --fartist "Saint Mary of Puddle" --file song.mp3
//! fece approve 3 --year-id 1
//! fece download-all --year 2025
//! ```

mod client;
mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use client::ApiClient;
use serde_json::json;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fece", about = "Command line companion for the FECE ON EARTH site")]
struct Args {
  /// Base URL of the site server.
  #[arg(long, env = "FECE_URL", default_value = "http://localhost:3000")]
  url: String,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all years with their song counts.
  Years,
  /// List all published songs, newest first.
  Songs,
  /// List all submissions, newest first.
  Submissions,
  /// Upload an audio file and submit it for review.
  Submit {
    #[arg(long)]
    title:   String,
    #[arg(long)]
    fartist: String,
    /// Path to the audio file to upload.
    #[arg(long)]
    file:    PathBuf,
    #[arg(long)]
    email:   Option<String>,
    #[arg(long)]
    bio:     Option<String>,
    #[arg(long)]
    lyrics:  Option<String>,
  },
  /// Approve a pending submission into a year.
  Approve {
    id: i64,
    #[arg(long)]
    year_id: i64,
  },
  /// Reject a pending submission.
  Reject { id: i64 },
  /// Delete a submission and its stored audio.
  DeleteSubmission { id: i64 },
  /// Download every song of a year into one ZIP archive.
  DownloadAll {
    #[arg(long)]
    year: i32,
    /// Output path (default: FECE-ON-EARTH-<year>.zip).
    #[arg(long)]
    out:  Option<PathBuf>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let client = ApiClient::new(&args.url)?;

  match args.command {
    Command::Years => {
      for year in client.list_years().await? {
        println!(
          "{:>4}  {:>3} song(s)  {}",
          year.year.year,
          year.songs.len(),
          year.year.description
        );
      }
    }

    Command::Songs => {
      for song in client.list_songs().await? {
        println!(
          "{:>4}  [{}]  {} - {}",
          song.song.id, song.year.year, song.song.fartist, song.song.title
        );
      }
    }

    Command::Submissions => {
      for sub in client.list_submissions().await? {
        println!(
          "{:>4}  {:<8}  {} - {}",
          sub.id,
          sub.status.as_str(),
          sub.fartist,
          sub.title
        );
      }
    }

    Command::Submit {
      title,
      fartist,
      file,
      email,
      bio,
      lyrics,
    } => {
      let submission =
        submit(&client, &title, &fartist, &file, email, bio, lyrics).await?;
      println!(
        "submitted #{} ({} - {}), status {}",
        submission.id,
        submission.fartist,
        submission.title,
        submission.status.as_str()
      );
    }

    Command::Approve { id, year_id } => {
      let sub = client.approve_submission(id, year_id).await?;
      println!(
        "approved #{} into {}",
        sub.id,
        sub.target_year.map_or_else(|| "?".to_string(), |y| y.to_string())
      );
    }

    Command::Reject { id } => {
      let sub = client.reject_submission(id).await?;
      println!("rejected #{}", sub.id);
    }

    Command::DeleteSubmission { id } => {
      client.delete_submission(id).await?;
      println!("deleted #{id}");
    }

    Command::DownloadAll { year, out } => {
      download_all(&client, year, out).await?;
    }
  }

  Ok(())
}

// ─── Submit flow ──────────────────────────────────────────────────────────────

/// The presigned-upload submission flow: ask for an upload slot, PUT the
/// audio bytes, then post the submission with the resulting public URL.
async fn submit(
  client: &ApiClient,
  title: &str,
  fartist: &str,
  file: &Path,
  email: Option<String>,
  bio: Option<String>,
  lyrics: Option<String>,
) -> Result<fece_core::submission::Submission> {
  let file_name = file
    .file_name()
    .and_then(|n| n.to_str())
    .ok_or_else(|| anyhow!("{} has no usable file name", file.display()))?
    .to_string();
  let content_type = content_type_for(&file_name);

  let data = tokio::fs::read(file)
    .await
    .with_context(|| format!("reading {}", file.display()))?;

  let slot = client.create_upload_url(&file_name, content_type).await?;
  client.put_audio(&slot.upload_url, data, content_type).await?;

  client
    .create_submission(json!({
      "title": title,
      "fartist": fartist,
      "email": email,
      "bio": bio,
      "lyrics": lyrics,
      "audioUrl": slot.public_url,
      "audioFileName": file_name,
    }))
    .await
}

fn content_type_for(file_name: &str) -> &'static str {
  let ext = file_name.rsplit('.').next().unwrap_or("");
  match ext.to_ascii_lowercase().as_str() {
    "mp3" => "audio/mpeg",
    "wav" => "audio/wav",
    "ogg" => "audio/ogg",
    "m4a" => "audio/mp4",
    "flac" => "audio/flac",
    _ => "application/octet-stream",
  }
}

// ─── Bulk download ────────────────────────────────────────────────────────────

/// Download every song of `year` and write them into a single ZIP archive,
/// stopping at the first failed download.
async fn download_all(client: &ApiClient, year: i32, out: Option<PathBuf>) -> Result<()> {
  let with_songs = client
    .find_year(year)
    .await?
    .ok_or_else(|| anyhow!("no year {year} on the server"))?;

  if with_songs.songs.is_empty() {
    return Err(anyhow!("year {year} has no songs"));
  }

  let total = with_songs.songs.len();
  let mut entries = Vec::with_capacity(total);
  for (i, song) in with_songs.songs.iter().enumerate() {
    let data = client
      .download_audio(&song.audio_url)
      .await
      .with_context(|| format!("downloading {} - {}", song.fartist, song.title))?;
    entries.push((song.download_file_name(), data));
    println!("downloaded {}/{total} ({}%)", i + 1, (i + 1) * 100 / total);
  }

  let archive = export::build_zip(&entries)?;
  let path = out.unwrap_or_else(|| PathBuf::from(export::archive_name(year)));
  tokio::fs::write(&path, archive)
    .await
    .with_context(|| format!("writing {}", path.display()))?;
  println!("wrote {} ({} songs)", path.display(), total);

  Ok(())
}
