//! ExoPlayer surface the Android module drives.

use bridge_traits::{error::Result, platform::PlatformSendSync, MediaPlayerInfo};

/// ExoPlayer's `C.TIME_UNSET`, reported while the duration is unknown.
pub const TIME_UNSET: i64 = i64::MIN + 1;

/// Normalise a raw `Player.getDuration()` value.
pub fn duration_from_raw(raw_ms: i64) -> Option<i64> {
    if raw_ms == TIME_UNSET || raw_ms < 0 {
        None
    } else {
        Some(raw_ms)
    }
}

/// Calls into a host-owned ExoPlayer instance.
///
/// Every method maps to one `androidx.media3` call and returns immediately.
/// Asynchronous outcomes come back through the module's callback methods.
pub trait ExoPlayerHandle: PlatformSendSync {
    /// `setMediaItem(MediaItem.fromUri(uri))`
    fn set_media_item(&self, uri: &str) -> Result<()>;

    fn prepare(&self) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    fn seek_to(&self, position_ms: i64) -> Result<()>;

    fn current_position_ms(&self) -> i64;

    /// `None` while ExoPlayer reports `C.TIME_UNSET`.
    fn duration_ms(&self) -> Option<i64>;

    /// Push title/artist/album/artwork into the `MediaSession` metadata.
    fn update_media_session(&self, info: &MediaPlayerInfo) -> Result<()>;

    fn release(&self) -> Result<()>;
}

/// `Player.STATE_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExoPlaybackState {
    Idle,
    Buffering,
    Ready,
    Ended,
}

impl ExoPlaybackState {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(ExoPlaybackState::Idle),
            2 => Some(ExoPlaybackState::Buffering),
            3 => Some(ExoPlaybackState::Ready),
            4 => Some(ExoPlaybackState::Ended),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            ExoPlaybackState::Idle => 1,
            ExoPlaybackState::Buffering => 2,
            ExoPlaybackState::Ready => 3,
            ExoPlaybackState::Ended => 4,
        }
    }
}

/// Transport controls received through the `MediaSession` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSessionCommand {
    Play,
    Pause,
    Stop,
}
