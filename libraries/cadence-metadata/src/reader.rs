/// Track factory implementation using lofty
use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use cadence_core::{Track, TrackFactory};
use lofty::{AudioFile, TaggedFileExt};
use std::path::Path;

/// Creates tracks by reading tags with the lofty library
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTrackFactory;

impl LoftyTrackFactory {
    /// Create a new track factory
    pub fn new() -> Self {
        Self
    }

    /// Read a track from `path`, blocking the current thread
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be parsed
    pub fn read_track(path: &Path) -> Result<Track> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = lofty::read_from_path(path)?;

        let mut track = Track::new(fallback_title(path), path.to_path_buf());
        track.set_duration(tagged_file.properties().duration());

        // Primary tag first, any tag otherwise
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.tags().first());
        if let Some(tag) = tag {
            apply_tag(&mut track, tag);
        }

        Ok(track)
    }
}

#[async_trait]
impl TrackFactory for LoftyTrackFactory {
    async fn create_from_file(&self, path: &Path) -> cadence_core::Result<Track> {
        let owned = path.to_path_buf();
        let track = tokio::task::spawn_blocking(move || Self::read_track(&owned))
            .await
            .map_err(|e| MetadataError::TaskFailed(e.to_string()))??;

        tracing::debug!("Read track '{}' from {}", track.title, path.display());
        Ok(track)
    }
}

/// Copy the tag items lofty knows about onto `track`
fn apply_tag(track: &mut Track, tag: &lofty::Tag) {
    // lofty 0.18 API - iterate through items
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            continue;
        };

        match item.key() {
            lofty::ItemKey::TrackTitle if !text.trim().is_empty() => {
                track.title = text.to_string();
            }
            lofty::ItemKey::TrackArtist => track.artist = Some(text.to_string()),
            lofty::ItemKey::AlbumTitle => track.album = Some(text.to_string()),
            lofty::ItemKey::AlbumArtist => track.album_artist = Some(text.to_string()),
            lofty::ItemKey::Genre => track.genre = Some(text.to_string()),
            lofty::ItemKey::Year => track.year = parse_number(text),
            lofty::ItemKey::TrackNumber => track.track_number = parse_number(text),
            lofty::ItemKey::DiscNumber => track.disc_number = parse_number(text),
            _ => {}
        }
    }
}

/// Title used when the file has no title tag
fn fallback_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse "3", "3/12" or "2004-05-01" style tag values
fn parse_number(text: &str) -> Option<u32> {
    text.trim()
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|digits| digits.parse().ok())
}
