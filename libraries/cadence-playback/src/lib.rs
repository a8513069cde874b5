//! Cadence - Playback Queue
//!
//! Platform-agnostic playback queue for Cadence.
//!
//! This crate provides:
//! - Two-tier queue (priority "play next" tier + system tier)
//! - Shuffled or insertion-order playback over the system tier
//! - Next/previous traversal with optional wraparound
//! - Queue persistence through storage and track-factory ports
//!
//! # Architecture
//!
//! `cadence-playback` knows nothing about databases or tag formats:
//! - No dependency on SQLite (see `cadence-storage`)
//! - No dependency on tag readers (see `cadence-metadata`)
//!
//! Both are reached through the `QueueStore` and `TrackFactory` traits from
//! `cadence-core`.
//!
//! # Example: Priority Tracks
//!
//! ```rust
//! use cadence_core::Track;
//! use cadence_playback::Queue;
//! use std::path::PathBuf;
//!
//! let album: Vec<Track> = ["a", "b", "c"]
//!     .iter()
//!     .map(|name| Track::new(*name, PathBuf::from(format!("/music/{}.flac", name))))
//!     .collect();
//!
//! let mut queue = Queue::new();
//! queue.set_tracks(&album, false);
//! let playing = queue.first_track().unwrap();
//!
//! // User asks for another song to play next
//! queue.add_tracks(&[Track::new("x", PathBuf::from("/music/x.flac"))]);
//!
//! let next = queue.next_track(Some(&playing), false).unwrap();
//! assert_eq!(next.title, "x");
//!
//! // After the priority tier drains, the album continues where it left off
//! let next = queue.next_track(Some(&next), false).unwrap();
//! assert_eq!(next.title, "b");
//! ```
//!
//! # Example: Shuffle
//!
//! ```rust
//! use cadence_playback::{RandomShuffler, Shuffler};
//!
//! let mut order: Vec<usize> = (0..10).collect();
//! RandomShuffler::seeded(42).shuffle(&mut order);
//!
//! order.sort_unstable();
//! assert_eq!(order, (0..10).collect::<Vec<_>>());
//! ```

mod error;
mod persister;
mod queue;
mod shuffle;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use persister::{snapshot_rows, QueuePersister};
pub use queue::Queue;
pub use shuffle::{RandomShuffler, Shuffler};
pub use types::{PlaybackConfig, QueueRestoreInfo, RestorePolicy};
