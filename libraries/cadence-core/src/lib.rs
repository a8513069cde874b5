//! Cadence Core
//!
//! Domain types, collaborator ports, and error handling shared by every
//! Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track` and the persisted queue row
//! - **Ports**: `QueueStore` (durable queue snapshot) and `TrackFactory`
//!   (builds a `Track` from a file on disk)
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! Adapters live in their own crates (`cadence-storage`, `cadence-metadata`)
//! so the playback logic never depends on a database or a tag reader.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::Track;
//! use std::path::PathBuf;
//!
//! let mut track = Track::new("My Favorite Song", PathBuf::from("/music/song.mp3"));
//! track.artist = Some("Artist Name".to_string());
//!
//! assert_eq!(track.duration(), None);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CadenceError, Result};
pub use traits::{QueueStore, TrackFactory};
pub use types::{PersistedQueueRow, Track};
