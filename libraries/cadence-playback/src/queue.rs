//! Two-tier playback queue
//!
//! Implements a Spotify-style queue with:
//! - Priority tier: tracks the user asked to play next, consumed front to back
//! - System tier: the body of the queue, walked through a playback order
//!   that is either insertion order or a shuffled permutation of it

use crate::error::{PlaybackError, Result};
use crate::shuffle::{RandomShuffler, Shuffler};
use cadence_core::Track;
use std::borrow::Borrow;
use std::sync::{Arc, Weak};

/// Two-tier queue for playback
///
/// Structure:
/// ```text
/// Priority (play next, FIFO):
///   - Track X (user added)
///   - Track Y (user added)
/// ─────────────────────────────
/// System (insertion order):    [A, B, C, D]
/// Playback order (indices):    [2, 0, 3, 1]  ->  C, A, D, B
/// ```
///
/// Tracks are shared handles. Identity inside the queue is handle identity
/// (`Arc::ptr_eq`), never content equality, so the same file may be queued
/// twice and each copy is removed independently. `set_tracks` and
/// `add_tracks` copy their input into fresh handles owned by the queue.
#[derive(Debug)]
pub struct Queue<S = RandomShuffler> {
    /// Non-priority body of the queue, in insertion order
    system: Vec<Arc<Track>>,

    /// Permutation of indices into `system`
    playback_order: Vec<usize>,

    /// Tracks explicitly queued to play next
    priority: Vec<Arc<Track>>,

    /// Last system track handed out while the priority tier is active
    last_system_track: Option<Weak<Track>>,

    shuffler: S,
}

impl Queue<RandomShuffler> {
    /// Create new empty queue with a randomly seeded shuffler
    pub fn new() -> Self {
        Self::with_shuffler(RandomShuffler::new())
    }
}

impl Default for Queue<RandomShuffler> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Shuffler> Queue<S> {
    /// Create new empty queue using `shuffler` for shuffled orders
    pub fn with_shuffler(shuffler: S) -> Self {
        Self {
            system: Vec::new(),
            playback_order: Vec::new(),
            priority: Vec::new(),
            last_system_track: None,
            shuffler,
        }
    }

    // ===== Views =====

    /// All tracks: priority tier first, then system tier in insertion order
    pub fn tracks(&self) -> impl Iterator<Item = &Arc<Track>> + '_ {
        self.priority.iter().chain(self.system.iter())
    }

    /// All tracks in the order they will play
    pub fn tracks_in_playback_order(&self) -> impl Iterator<Item = &Arc<Track>> + '_ {
        self.priority
            .iter()
            .chain(self.playback_order.iter().map(move |&index| &self.system[index]))
    }

    /// Total number of tracks in queue
    pub fn number_of_tracks(&self) -> usize {
        self.system.len() + self.priority.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.priority.is_empty()
    }

    /// Current playback order over the system tier
    pub fn playback_order(&self) -> &[usize] {
        &self.playback_order
    }

    /// Tracks waiting in the priority tier
    pub fn priority_tracks(&self) -> &[Arc<Track>] {
        &self.priority
    }

    /// System tier in insertion order
    pub fn system_tracks(&self) -> &[Arc<Track>] {
        &self.system
    }

    // ===== Mutation =====

    /// Replace the queue contents
    ///
    /// Copies every input track into a new handle, clears the priority tier
    /// and builds either the identity or a shuffled playback order. Returns
    /// the new system tier.
    pub fn set_tracks<T: Borrow<Track>>(&mut self, tracks: &[T], shuffle: bool) -> &[Arc<Track>] {
        self.system = tracks
            .iter()
            .map(|track| Arc::new(track.borrow().clone()))
            .collect();
        self.priority.clear();
        self.last_system_track = None;

        if shuffle {
            self.shuffle();
        } else {
            self.unshuffle();
        }

        tracing::debug!(tracks = self.system.len(), shuffle, "Queue tracks set");
        &self.system
    }

    /// Install previously saved tracks and playback order verbatim
    ///
    /// No copying and no reshuffling. The priority tier is cleared.
    ///
    /// # Errors
    /// Returns `InvalidPlaybackOrder` if `playback_order` is not a
    /// permutation of `0..tracks.len()`; the queue is left unchanged.
    pub fn restore_tracks(
        &mut self,
        tracks: Vec<Arc<Track>>,
        playback_order: Vec<usize>,
    ) -> Result<()> {
        validate_playback_order(&playback_order, tracks.len())?;

        self.system = tracks;
        self.playback_order = playback_order;
        self.priority.clear();
        self.last_system_track = None;

        tracing::debug!(tracks = self.system.len(), "Queue tracks restored");
        Ok(())
    }

    /// Queue copies of `tracks` to play next, after any already queued
    pub fn add_tracks<T: Borrow<Track>>(&mut self, tracks: &[T]) {
        self.priority
            .extend(tracks.iter().map(|track| Arc::new(track.borrow().clone())));

        tracing::debug!(
            added = tracks.len(),
            priority = self.priority.len(),
            "Tracks queued to play next"
        );
    }

    /// Remove tracks from whichever tier holds them
    ///
    /// Tracks not in the queue are ignored. Removing the track that system
    /// traversal would resume from also forgets that resume point.
    pub fn remove_tracks(&mut self, tracks: &[Arc<Track>]) {
        for track in tracks {
            if self.is_last_system_track(track) {
                self.last_system_track = None;
            }
            self.remove_track(track);
        }
    }

    /// Reset playback order to insertion order
    pub fn unshuffle(&mut self) {
        self.playback_order = (0..self.system.len()).collect();
    }

    /// Draw a new random playback order over the system tier
    pub fn shuffle(&mut self) {
        self.unshuffle();
        self.shuffler.shuffle(&mut self.playback_order);
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.system.clear();
        self.playback_order.clear();
        self.priority.clear();
        self.last_system_track = None;
    }

    // ===== Traversal =====

    /// Track to start playback with
    pub fn first_track(&self) -> Option<Arc<Track>> {
        self.priority
            .first()
            .cloned()
            .or_else(|| self.system_next(None, false))
    }

    /// Advance past `current` and return the track to play next
    ///
    /// The priority tier always plays before the system tier. When the last
    /// priority track finishes, system traversal resumes after the system
    /// track that was playing before the priority tier took over.
    ///
    /// `current` is consumed: it is removed from the queue before returning.
    pub fn next_track(
        &mut self,
        current: Option<&Arc<Track>>,
        allow_wrap_around: bool,
    ) -> Option<Arc<Track>> {
        let next = match current.and_then(|track| self.priority_position(track)) {
            Some(position) => match self.priority.get(position + 1) {
                Some(track) => Some(Arc::clone(track)),
                None => {
                    let resume_from = self.last_system_track();
                    self.system_next(resume_from.as_ref(), allow_wrap_around)
                }
            },
            None => {
                if let Some(track) = current {
                    if self.system_position(track).is_some() {
                        self.last_system_track = Some(Arc::downgrade(track));
                    }
                }

                match self.priority.first() {
                    Some(track) => Some(Arc::clone(track)),
                    None => self.system_next(current, allow_wrap_around),
                }
            }
        };

        if let Some(track) = current {
            self.remove_track(track);
        }

        next
    }

    /// Track before `current`, without modifying the queue
    pub fn previous_track(
        &self,
        current: Option<&Arc<Track>>,
        allow_wrap_around: bool,
    ) -> Option<Arc<Track>> {
        if self.is_empty() {
            return None;
        }

        if let Some(position) = current.and_then(|track| self.priority_position(track)) {
            if position > 0 {
                return Some(Arc::clone(&self.priority[position - 1]));
            }

            return self.last_system_track().or_else(|| {
                self.playback_order
                    .last()
                    .map(|&index| Arc::clone(&self.system[index]))
            });
        }

        self.system_previous(current, allow_wrap_around)
    }

    /// Position of a system track within the playback order
    ///
    /// Returns `None` for priority tracks and tracks not in the queue.
    pub fn playback_order_index(&self, track: &Arc<Track>) -> Option<usize> {
        let index = self.system_position(track)?;
        self.playback_order.iter().position(|&i| i == index)
    }

    // ===== Internals =====

    fn priority_position(&self, track: &Arc<Track>) -> Option<usize> {
        self.priority.iter().position(|t| Arc::ptr_eq(t, track))
    }

    fn system_position(&self, track: &Arc<Track>) -> Option<usize> {
        self.system.iter().position(|t| Arc::ptr_eq(t, track))
    }

    fn last_system_track(&self) -> Option<Arc<Track>> {
        self.last_system_track.as_ref().and_then(Weak::upgrade)
    }

    fn is_last_system_track(&self, track: &Arc<Track>) -> bool {
        self.last_system_track
            .as_ref()
            .is_some_and(|last| std::ptr::eq(last.as_ptr(), Arc::as_ptr(track)))
    }

    /// Remove a single track; returns whether it was found
    fn remove_track(&mut self, track: &Arc<Track>) -> bool {
        if let Some(position) = self.priority_position(track) {
            self.priority.remove(position);
            return true;
        }

        if let Some(index) = self.system_position(track) {
            self.remove_system_at(index);
            return true;
        }

        false
    }

    /// Remove the system track at `index` and re-index the playback order
    fn remove_system_at(&mut self, index: usize) {
        self.system.remove(index);
        self.playback_order.retain(|&i| i != index);
        for i in &mut self.playback_order {
            if *i > index {
                *i -= 1;
            }
        }
    }

    /// System track after `reference` in playback order
    ///
    /// A missing or unknown reference starts from the beginning.
    fn system_next(
        &self,
        reference: Option<&Arc<Track>>,
        allow_wrap_around: bool,
    ) -> Option<Arc<Track>> {
        let first = *self.playback_order.first()?;

        let Some(position) = reference.and_then(|track| self.playback_order_index(track)) else {
            return Some(Arc::clone(&self.system[first]));
        };

        let next = match self.playback_order.get(position + 1) {
            Some(&index) => index,
            None if allow_wrap_around => first,
            None => return None,
        };

        Some(Arc::clone(&self.system[next]))
    }

    /// System track before `reference` in playback order
    ///
    /// A missing or unknown reference starts from the beginning.
    fn system_previous(
        &self,
        reference: Option<&Arc<Track>>,
        allow_wrap_around: bool,
    ) -> Option<Arc<Track>> {
        let first = *self.playback_order.first()?;

        let Some(position) = reference.and_then(|track| self.playback_order_index(track)) else {
            return Some(Arc::clone(&self.system[first]));
        };

        let previous = if position > 0 {
            self.playback_order[position - 1]
        } else if allow_wrap_around {
            *self.playback_order.last()?
        } else {
            return None;
        };

        Some(Arc::clone(&self.system[previous]))
    }
}

/// Check that `order` is a permutation of `0..len`
pub(crate) fn validate_playback_order(order: &[usize], len: usize) -> Result<()> {
    if order.len() != len {
        return Err(PlaybackError::InvalidPlaybackOrder(format!(
            "expected {} entries, found {}",
            len,
            order.len()
        )));
    }

    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || std::mem::replace(&mut seen[index], true) {
            return Err(PlaybackError::InvalidPlaybackOrder(format!(
                "index {} is out of range or repeated",
                index
            )));
        }
    }

    Ok(())
}
