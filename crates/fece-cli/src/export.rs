//! Bulk export of a year's songs into a single ZIP archive.
//!
//! Audio files are already compressed, so entries are stored rather than
//! deflated.

use std::io::{Cursor, Write as _};

use anyhow::{Context, Result};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// The conventional archive name for a year's export.
pub fn archive_name(year: i32) -> String {
  format!("FECE-ON-EARTH-{year}.zip")
}

/// Assemble `(entry name, bytes)` pairs into an in-memory ZIP archive.
pub fn build_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
  let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
  let options =
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

  for (name, data) in entries {
    writer
      .start_file(name.as_str(), options)
      .with_context(|| format!("adding {name} to archive"))?;
    writer
      .write_all(data)
      .with_context(|| format!("writing {name} to archive"))?;
  }

  Ok(writer.finish().context("finalising archive")?.into_inner())
}

#[cfg(test)]
mod tests {
  use zip::ZipArchive;

  use super::*;

  #[test]
  fn archive_name_embeds_the_year() {
    assert_eq!(archive_name(2025), "FECE-ON-EARTH-2025.zip");
  }

  #[test]
  fn zip_round_trips_entries_uncompressed() {
    let entries = vec![
      ("Saint Mary of Puddle - Frosty Twinkle.mp3".to_string(), b"aaaa".to_vec()),
      ("DJ Yule - Diarrhea For Christmas.mp3".to_string(), b"bbbb".to_vec()),
    ];

    let bytes = build_zip(&entries).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    for (name, data) in &entries {
      let mut file = archive.by_name(name).unwrap();
      assert_eq!(file.compression(), CompressionMethod::Stored);
      let mut out = Vec::new();
      std::io::Read::read_to_end(&mut file, &mut out).unwrap();
      assert_eq!(&out, data);
    }
  }

  #[test]
  fn empty_archive_is_valid() {
    let bytes = build_zip(&[]).unwrap();
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 0);
  }
}
