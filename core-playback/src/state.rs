//! # Player Data Model
//!
//! [`Track`], the canonical [`PlayerState`] and the
//! [`PlayerStateSnapshot`] every observer renders from.

use bridge_traits::{native_state, MediaPlayerInfo};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Track
// ============================================================================

/// Track descriptor selected by the consumer.
///
/// Tracks are replaced wholesale. Re-selecting an equal track is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Artwork URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    pub url: String,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: None,
            album: None,
            artwork: None,
            url: url.into(),
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Metadata for the OS media session / now-playing centre.
    pub fn media_info(&self) -> MediaPlayerInfo {
        MediaPlayerInfo {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            artwork: self.artwork.clone(),
        }
    }
}

// ============================================================================
// PlayerState
// ============================================================================

/// Canonical player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerState {
    #[default]
    Idle,
    Loaded,
    Playing,
    Paused,
    Stopped,
    Completed,
    Error,
}

impl PlayerState {
    /// Normalizes a native state string.
    ///
    /// Matching is exact. Strings outside the canonical set, `BUFFERING`
    /// included, fall back to [`PlayerState::Idle`].
    pub fn from_native(state: &str) -> Self {
        match state {
            native_state::IDLE => PlayerState::Idle,
            native_state::LOADED => PlayerState::Loaded,
            native_state::PLAYING => PlayerState::Playing,
            native_state::PAUSED => PlayerState::Paused,
            native_state::STOPPED => PlayerState::Stopped,
            native_state::COMPLETED => PlayerState::Completed,
            native_state::ERROR => PlayerState::Error,
            _ => PlayerState::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Idle => native_state::IDLE,
            PlayerState::Loaded => native_state::LOADED,
            PlayerState::Playing => native_state::PLAYING,
            PlayerState::Paused => native_state::PAUSED,
            PlayerState::Stopped => native_state::STOPPED,
            PlayerState::Completed => native_state::COMPLETED,
            PlayerState::Error => native_state::ERROR,
        }
    }

    /// Whether content is loaded in the native player and can be played
    /// without another `load_content`.
    pub fn is_loaded(&self) -> bool {
        matches!(
            self,
            PlayerState::Loaded | PlayerState::Playing | PlayerState::Paused
        )
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything an observer needs to render the player.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateSnapshot {
    pub current_track: Option<Track>,
    pub state: PlayerState,
    /// Seconds.
    pub elapsed_time: f64,
    /// Seconds, `0.0` while unknown.
    pub total_duration: f64,
    /// Percentage in `0.0..=100.0`.
    pub progress: f64,
    pub repeat: bool,
    /// Render flag, set optimistically by `play` before the native call
    /// completes.
    pub is_playing: bool,
}

impl PlayerStateSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }

    pub fn has_track(&self) -> bool {
        self.current_track.is_some()
    }
}

/// Partial update of a [`PlayerStateSnapshot`].
///
/// The current track is not part of a patch; it only changes through
/// `StoreWriter::load_track` and `StoreWriter::reset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotPatch {
    pub state: Option<PlayerState>,
    pub elapsed_time: Option<f64>,
    pub total_duration: Option<f64>,
    pub progress: Option<f64>,
    pub repeat: Option<bool>,
    pub is_playing: Option<bool>,
}

impl SnapshotPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: PlayerState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn elapsed_time(mut self, seconds: f64) -> Self {
        self.elapsed_time = Some(seconds);
        self
    }

    pub fn total_duration(mut self, seconds: f64) -> Self {
        self.total_duration = Some(seconds);
        self
    }

    pub fn progress(mut self, percent: f64) -> Self {
        self.progress = Some(percent);
        self
    }

    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn is_playing(mut self, playing: bool) -> Self {
        self.is_playing = Some(playing);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the set fields into `snapshot`. Returns whether any field
    /// actually changed.
    pub fn apply(&self, snapshot: &mut PlayerStateSnapshot) -> bool {
        let mut changed = false;
        changed |= assign(&mut snapshot.state, self.state);
        changed |= assign(&mut snapshot.elapsed_time, self.elapsed_time);
        changed |= assign(&mut snapshot.total_duration, self.total_duration);
        changed |= assign(&mut snapshot.progress, self.progress);
        changed |= assign(&mut snapshot.repeat, self.repeat);
        changed |= assign(&mut snapshot.is_playing, self.is_playing);
        changed
    }
}

fn assign<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}
