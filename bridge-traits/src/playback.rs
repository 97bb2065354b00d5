//! Native audio module contract and the event payloads it emits.
//!
//! A native audio module wraps the platform media engine (ExoPlayer on
//! Android, AVPlayer on iOS) behind a small command surface. Commands are
//! asynchronous and resolve once the native side has acted. State changes
//! and playback progress are *not* returned from commands. They are pushed
//! to registered listeners as [`NativeAudioEvent`]s, so consumers must
//! treat the event stream as the source of truth.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    emitter::{AudioEventListener, ListenerId},
    error::Result,
    platform::{HostPlatform, PlatformSendSync},
};

/// Event name for state transitions.
pub const AUDIO_STATE_CHANGE_EVENT: &str = "onAudioStateChange";

/// Event name for periodic progress updates.
pub const AUDIO_PROGRESS_EVENT: &str = "onAudioProgress";

/// State strings carried by [`NativeAudioEvent::StateChange`].
///
/// Consumers must tolerate values outside this list.
pub mod native_state {
    pub const IDLE: &str = "IDLE";
    pub const BUFFERING: &str = "BUFFERING";
    pub const LOADED: &str = "LOADED";
    pub const PLAYING: &str = "PLAYING";
    pub const PAUSED: &str = "PAUSED";
    pub const STOPPED: &str = "STOPPED";
    pub const COMPLETED: &str = "COMPLETED";
    pub const ERROR: &str = "ERROR";
}

/// Event pushed by a native audio module to its listeners.
///
/// Wire form is `{"name": "onAudioStateChange", "body": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "body")]
pub enum NativeAudioEvent {
    #[serde(rename = "onAudioStateChange")]
    StateChange {
        state: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// `progress` is a fraction in `0.0..=1.0`.
    #[serde(rename = "onAudioProgress", rename_all = "camelCase")]
    Progress {
        current_time: f64,
        progress: f64,
        total_duration: f64,
    },
}

impl NativeAudioEvent {
    /// State change without a message.
    pub fn state(state: impl Into<String>) -> Self {
        NativeAudioEvent::StateChange {
            state: state.into(),
            message: None,
        }
    }

    /// `ERROR` state change carrying the native error message.
    pub fn error(message: impl Into<String>) -> Self {
        NativeAudioEvent::StateChange {
            state: native_state::ERROR.to_string(),
            message: Some(message.into()),
        }
    }

    /// Progress event for the given position and duration in seconds.
    ///
    /// Unknown or non-positive durations report a total of zero and a
    /// progress of zero. The fraction is clamped to `0.0..=1.0`.
    pub fn progress(current_time: f64, total_duration: f64) -> Self {
        let total_duration = if total_duration.is_finite() && total_duration > 0.0 {
            total_duration
        } else {
            0.0
        };
        let current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };
        let progress = if total_duration > 0.0 {
            (current_time / total_duration).clamp(0.0, 1.0)
        } else {
            0.0
        };

        NativeAudioEvent::Progress {
            current_time,
            progress,
            total_duration,
        }
    }

    /// Name of the event channel this event travels on.
    pub fn name(&self) -> &'static str {
        match self {
            NativeAudioEvent::StateChange { .. } => AUDIO_STATE_CHANGE_EVENT,
            NativeAudioEvent::Progress { .. } => AUDIO_PROGRESS_EVENT,
        }
    }
}

/// Track metadata pushed to the OS media session (Android) or the
/// now-playing centre (iOS).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPlayerInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
}

impl MediaPlayerInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
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
}

/// Command surface of a platform audio module.
///
/// Implementations must be safe to call from any task. Calls are not
/// required to be serialized by the caller.
#[async_trait]
pub trait AudioModule: PlatformSendSync {
    /// Platform this module drives.
    fn platform(&self) -> HostPlatform;

    /// Replace the current item with `url` and prepare it.
    ///
    /// Resolves once the native player reports readiness, after `LOADED`
    /// has been emitted. A blank URL fails with `InvalidArgument`. A native
    /// preparation error fails with `NativeFailure` carrying the native
    /// message.
    async fn load_content(&self, url: String) -> Result<()>;

    /// Publish track metadata to the OS media session.
    async fn set_media_player_info(&self, info: MediaPlayerInfo) -> Result<()>;

    /// Start or resume playback. A no-op when already playing.
    async fn play_audio(&self) -> Result<()>;

    /// Pause playback. A no-op when not playing.
    async fn pause_audio(&self) -> Result<()>;

    /// Stop playback. A no-op when nothing is loaded.
    async fn stop_audio(&self) -> Result<()>;

    /// Move the playhead to `time_in_seconds`, clamped to
    /// `[0, total_duration]`.
    async fn seek(&self, time_in_seconds: f64) -> Result<()>;

    /// Duration of the loaded item in seconds.
    ///
    /// Fails with `NotReady` until the native duration is known.
    async fn get_total_duration(&self) -> Result<f64>;

    /// Register a listener for state and progress events.
    fn add_listener(&self, listener: Arc<dyn AudioEventListener>) -> ListenerId;

    /// Remove a listener. Returns `false` when the id was unknown.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Tear down the native player. Safe to call more than once.
    async fn release(&self) -> Result<()>;
}
