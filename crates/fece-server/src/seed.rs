//! Idempotent seeding of the canonical years and starter songs.
//!
//! Safe to run repeatedly: years are upserted (descriptions refreshed) and
//! songs are looked up by title and fartist before being created.

use anyhow::Context as _;
use fece_core::{song::NewSong, store::RecordStore, year::NewYear};

const YEARS: &[(i32, &str)] = &[
  (2025, "The latest and greatest holiday hits!"),
  (2024, "Another year of holiday magic!"),
  (2023, ""),
  (2022, ""),
  (2021, ""),
  (2020, ""),
  (2019, ""),
  (2018, ""),
  (2017, ""),
  (2016, ""),
  (2015, ""),
  (2014, ""),
  (2013, ""),
  (2012, ""),
  (2011, "Where it all began..."),
];

const STARTER_SONGS: &[(&str, &str)] = &[
  ("Frosty Twinkle", "Saint Mary of Puddle"),
  ("Diarrhea For Christmas", "DJ Yule"),
];

pub async fn run<S: RecordStore>(store: &S) -> anyhow::Result<()> {
  for (year, description) in YEARS {
    store
      .upsert_year(NewYear {
        year:        *year,
        description: (*description).to_string(),
      })
      .await
      .with_context(|| format!("failed to seed year {year}"))?;
  }
  tracing::info!("seeded {} years", YEARS.len());

  let year_2025 = store
    .find_year_by_number(2025)
    .await?
    .context("year 2025 missing after seeding")?;

  for (title, fartist) in STARTER_SONGS {
    if store.find_song(title, fartist).await?.is_some() {
      continue;
    }
    store
      .create_song(NewSong {
        title:     (*title).to_string(),
        fartist:   (*fartist).to_string(),
        bio:       String::new(),
        lyrics:    String::new(),
        audio_url: format!("/audio/{fartist} - {title}.mp3"),
        year_id:   year_2025.id,
      })
      .await
      .with_context(|| format!("failed to seed song {title:?}"))?;
    tracing::info!("seeded song {fartist} - {title}");
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use fece_store_sqlite::SqliteStore;

  use super::*;

  #[tokio::test]
  async fn seeding_twice_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    run(&store).await.unwrap();
    run(&store).await.unwrap();

    let years = store.list_years().await.unwrap();
    assert_eq!(years.len(), 15);
    // Newest year number first.
    assert_eq!(years[0].year.year, 2025);
    assert_eq!(years[14].year.year, 2011);
    assert_eq!(years[14].year.description, "Where it all began...");

    let songs = store.list_songs().await.unwrap();
    assert_eq!(songs.len(), 2);
    assert!(songs.iter().all(|s| s.year.year == 2025));
  }
}
