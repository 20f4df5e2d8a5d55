//! Song list read from the local music directory.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_core::result::AppResult;
use folio_core::traits::Upstream;

/// One playable track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

/// Parse an `"<artist>-<title>.mp3"` file name. Returns `None` for other files.
///
/// Splits on the first `-`, so titles may contain dashes.
pub fn parse_song_file(file_name: &str) -> Option<Song> {
    let stem = file_name.strip_suffix(".mp3")?;
    let (artist, title) = stem.split_once('-').unwrap_or((stem, ""));
    Some(Song {
        title: title.trim().to_string(),
        artist: artist.trim().to_string(),
    })
}

/// Lists the `.mp3` files of one directory.
#[derive(Debug, Clone)]
pub struct SongLibrary {
    dir: PathBuf,
}

impl SongLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Upstream for SongLibrary {
    type Output = Vec<Song>;

    fn name(&self) -> &'static str {
        "songs"
    }

    /// Songs ordered by file name.
    async fn fetch(&self) -> AppResult<Vec<Song>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();

        let songs: Vec<Song> = names.iter().filter_map(|n| parse_song_file(n)).collect();
        debug!(dir = %self.dir.display(), songs = songs.len(), "Listed songs");
        Ok(songs)
    }
}
