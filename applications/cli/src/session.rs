//! One playback session
//!
//! A session restores the saved queue, applies commands to it and saves it
//! again on close. It tracks which queued track is playing and how far
//! playback has progressed.

use crate::error::{CliError, Result};
use cadence_core::{QueueStore, Track, TrackFactory};
use cadence_playback::{PlaybackConfig, Queue, QueuePersister, RandomShuffler};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Session {
    queue: Queue,
    playing: Option<Arc<Track>>,
    progress_seconds: u64,
    persister: QueuePersister,
    factory: Arc<dyn TrackFactory>,
    config: PlaybackConfig,
}

impl Session {
    /// Restore the saved queue and start a session on it
    pub async fn open(
        store: Arc<dyn QueueStore>,
        factory: Arc<dyn TrackFactory>,
        config: PlaybackConfig,
    ) -> Self {
        let persister = QueuePersister::new(store, Arc::clone(&factory))
            .with_policy(config.restore_policy);
        let info = persister.restore().await;

        let mut queue = Queue::with_shuffler(RandomShuffler::from_seed(config.shuffle_seed));
        let (playing, progress_seconds) =
            match queue.restore_tracks(info.tracks, info.playback_order) {
                Ok(()) => (info.playing_track, info.progress_seconds),
                Err(e) => {
                    tracing::error!("Discarding restored queue: {}", e);
                    (None, 0)
                }
            };

        Self {
            queue,
            playing,
            progress_seconds,
            persister,
            factory,
            config,
        }
    }

    /// Save the queue and end the session
    pub async fn close(self) {
        self.persister
            .save(&self.queue, self.playing.as_deref(), self.progress_seconds)
            .await;
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn playing(&self) -> Option<&Arc<Track>> {
        self.playing.as_ref()
    }

    pub fn progress_seconds(&self) -> u64 {
        self.progress_seconds
    }

    /// Replace the queue with `paths` and start playing from the top
    pub async fn play(&mut self, paths: &[PathBuf], shuffle: bool) -> Result<Option<&Arc<Track>>> {
        let tracks = self.read_tracks(paths).await?;

        self.queue.set_tracks(&tracks, shuffle || self.config.shuffle);
        self.start(self.queue.first_track());

        Ok(self.playing.as_ref())
    }

    /// Queue `paths` to play after the current track
    pub async fn enqueue(&mut self, paths: &[PathBuf]) -> Result<()> {
        let tracks = self.read_tracks(paths).await?;
        self.queue.add_tracks(&tracks);

        if self.playing.is_none() {
            self.start(self.queue.first_track());
        }

        Ok(())
    }

    /// Finish the playing track and move on
    pub fn next(&mut self) -> Option<&Arc<Track>> {
        let current = self.playing.take();
        let next = self
            .queue
            .next_track(current.as_ref(), self.config.allow_wrap_around);
        self.start(next);
        self.playing.as_ref()
    }

    /// Step back to the track before the playing one
    ///
    /// At the head of the queue the playing track restarts from 0.
    pub fn previous(&mut self) -> Option<&Arc<Track>> {
        let previous = self
            .queue
            .previous_track(self.playing.as_ref(), self.config.allow_wrap_around);
        match previous {
            Some(track) => self.start(Some(track)),
            None => self.progress_seconds = 0,
        }
        self.playing.as_ref()
    }

    /// Remove every queued track whose file is one of `paths`
    ///
    /// Removing the playing track stops playback. Returns how many tracks
    /// were removed.
    pub fn remove(&mut self, paths: &[PathBuf]) -> usize {
        let matching: Vec<Arc<Track>> = self
            .queue
            .tracks()
            .filter(|track| paths.contains(&track.file_path))
            .cloned()
            .collect();

        self.queue.remove_tracks(&matching);

        let removed_playing = self
            .playing
            .as_ref()
            .is_some_and(|playing| matching.iter().any(|track| Arc::ptr_eq(track, playing)));
        if removed_playing {
            self.start(None);
        }

        matching.len()
    }

    pub fn shuffle(&mut self) {
        self.queue.shuffle();
    }

    pub fn unshuffle(&mut self) {
        self.queue.unshuffle();
    }

    /// Move the playback position of the playing track
    pub fn seek(&mut self, seconds: u64) -> Result<()> {
        let playing = self.playing.as_ref().ok_or(CliError::NothingPlaying)?;

        self.progress_seconds = match playing.duration() {
            Some(duration) => seconds.min(duration.as_secs()),
            None => seconds,
        };
        Ok(())
    }

    /// Empty the queue and stop playback
    pub fn clear(&mut self) {
        self.queue.clear();
        self.start(None);
    }

    /// Queue listing in playback order, playing track marked with `>`
    pub fn render(&self) -> String {
        let mut out = String::new();

        match &self.playing {
            Some(track) => {
                let _ = writeln!(
                    out,
                    "Playing: {} [{}]",
                    describe(track),
                    format_progress(self.progress_seconds, track)
                );
            }
            None => out.push_str("Nothing playing\n"),
        }

        if self.queue.is_empty() {
            out.push_str("Queue is empty\n");
            return out;
        }

        let priority = self.queue.priority_tracks().len();
        for (position, track) in self.queue.tracks_in_playback_order().enumerate() {
            let marker = match &self.playing {
                Some(playing) if Arc::ptr_eq(playing, track) => '>',
                _ if position < priority => '+',
                _ => ' ',
            };
            let _ = writeln!(out, "{} {:>3}. {}", marker, position + 1, describe(track));
        }

        out
    }

    fn start(&mut self, track: Option<Arc<Track>>) {
        if let Some(track) = &track {
            tracing::info!("Now playing: {}", describe(track));
        }
        self.playing = track;
        self.progress_seconds = 0;
    }

    async fn read_tracks(&self, paths: &[PathBuf]) -> Result<Vec<Track>> {
        let mut tracks = Vec::with_capacity(paths.len());
        for path in paths {
            tracks.push(self.factory.create_from_file(path).await?);
        }
        Ok(tracks)
    }
}

fn describe(track: &Track) -> String {
    match &track.artist {
        Some(artist) => format!("{} - {}", artist, track.title),
        None => track.title.clone(),
    }
}

fn format_progress(progress_seconds: u64, track: &Track) -> String {
    let clock = |secs: u64| format!("{}:{:02}", secs / 60, secs % 60);

    match track.duration() {
        Some(duration) => format!("{} / {}", clock(progress_seconds), clock(duration.as_secs())),
        None => clock(progress_seconds),
    }
}
