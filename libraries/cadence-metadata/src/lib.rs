//! Cadence Metadata
//!
//! Builds queue tracks from audio files on disk.
//!
//! Tags are read with lofty (MP3, FLAC, OGG, WAV, AAC, OPUS). Files without
//! a title tag are named after their file stem.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::TrackFactory;
//! use cadence_metadata::LoftyTrackFactory;
//! use std::path::Path;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let factory = LoftyTrackFactory::new();
//! let track = factory.create_from_file(Path::new("/music/song.flac")).await?;
//! println!("{} ({:?})", track.title, track.duration());
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::LoftyTrackFactory;
