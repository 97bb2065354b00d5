//! # Player State Store
//!
//! One playback session observed by many components.
//!
//! [`PlayerStore::new`] returns a cloneable read handle and a unique
//! [`StoreWriter`]. The writer is moved into the reconciler, so nothing
//! else can write snapshot fields. Consumers change the session only
//! through [`PlayerStore::set_track`].
//!
//! ```text
//!            set_track                 watch_track
//! consumer ─────────────> PlayerStore ─────────────> Reconciler
//!                              ^                          │
//!          snapshot/subscribe  │        StoreWriter       │
//! components <─────────────────┴──────────────────────────┘
//! ```

use core_async::sync::watch;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::controls::ControlBundle;
use crate::state::{PlayerStateSnapshot, SnapshotPatch, Track};

type SharedControls = Arc<RwLock<Option<ControlBundle>>>;

/// Read handle on the player session.
#[derive(Clone)]
pub struct PlayerStore {
    snapshot: watch::Receiver<PlayerStateSnapshot>,
    requested_track: Arc<watch::Sender<Option<Track>>>,
    controls: SharedControls,
}

/// Exclusive write access to the snapshot and the bound controls.
pub struct StoreWriter {
    snapshot: watch::Sender<PlayerStateSnapshot>,
    controls: SharedControls,
}

impl PlayerStore {
    pub fn new() -> (PlayerStore, StoreWriter) {
        let (snapshot_tx, snapshot_rx) = watch::channel(PlayerStateSnapshot::default());
        let (track_tx, _) = watch::channel(None);
        let controls: SharedControls = Arc::new(RwLock::new(None));

        let store = PlayerStore {
            snapshot: snapshot_rx,
            requested_track: Arc::new(track_tx),
            controls: Arc::clone(&controls),
        };
        let writer = StoreWriter {
            snapshot: snapshot_tx,
            controls,
        };
        (store, writer)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> PlayerStateSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<PlayerStateSnapshot> {
        let mut receiver = self.snapshot.clone();
        receiver.mark_unchanged();
        receiver
    }

    /// Track the reconciler has applied to the snapshot.
    pub fn current_track(&self) -> Option<Track> {
        self.snapshot.borrow().current_track.clone()
    }

    /// Selects a track, or clears the selection with `None`.
    ///
    /// The reconciler picks the change up asynchronously: it rebinds the
    /// controls and loads the content. Returns `false` when `track` equals
    /// the current selection and nothing happens.
    pub fn set_track(&self, track: Option<Track>) -> bool {
        self.requested_track.send_if_modified(|current| {
            if *current == track {
                false
            } else {
                *current = track;
                true
            }
        })
    }

    /// Receiver for track selections, used by the reconciler.
    pub fn watch_track(&self) -> watch::Receiver<Option<Track>> {
        self.requested_track.subscribe()
    }

    /// Controls bound to the current track, if any.
    pub fn controls(&self) -> Option<ControlBundle> {
        self.controls.read().clone()
    }
}

impl fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerStore")
            .field("snapshot", &*self.snapshot.borrow())
            .field("controls_bound", &self.controls.read().is_some())
            .finish()
    }
}

impl StoreWriter {
    pub fn snapshot(&self) -> PlayerStateSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Applies `patch`. Observers are only notified when a field changed.
    pub fn update(&self, patch: &SnapshotPatch) -> bool {
        self.snapshot.send_if_modified(|snapshot| patch.apply(snapshot))
    }

    /// Restores every field to its default, clearing the track.
    pub fn reset(&self) -> bool {
        self.replace(PlayerStateSnapshot::default())
    }

    /// Restores playback fields to their defaults, keeping the track and
    /// the repeat flag.
    pub fn reset_playback(&self) -> bool {
        let current = self.snapshot.borrow().clone();
        self.replace(PlayerStateSnapshot {
            current_track: current.current_track,
            repeat: current.repeat,
            ..PlayerStateSnapshot::default()
        })
    }

    /// Starts a new session for `track`, keeping the repeat flag.
    pub fn load_track(&self, track: Track) -> bool {
        let repeat = self.snapshot.borrow().repeat;
        self.replace(PlayerStateSnapshot {
            current_track: Some(track),
            repeat,
            ..PlayerStateSnapshot::default()
        })
    }

    pub fn bind_controls(&self, controls: Option<ControlBundle>) {
        *self.controls.write() = controls;
    }

    fn replace(&self, next: PlayerStateSnapshot) -> bool {
        self.snapshot.send_if_modified(|snapshot| {
            if *snapshot == next {
                false
            } else {
                *snapshot = next;
                true
            }
        })
    }
}

impl fmt::Debug for StoreWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreWriter").finish_non_exhaustive()
    }
}
