//! AVPlayer surface the iOS module drives.

use bridge_traits::{error::Result, platform::PlatformSendSync, MediaPlayerInfo};

/// Calls into a host-owned `AVPlayer`.
pub trait AvPlayerHandle: PlatformSendSync {
    /// `replaceCurrentItem(with: AVPlayerItem(url:))`
    fn replace_current_item(&self, url: &str) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    /// `seek(to: CMTime(seconds:preferredTimescale:))`
    fn seek(&self, seconds: f64) -> Result<()>;

    /// `CMTimeGetSeconds(currentTime())`
    fn current_time(&self) -> f64;

    /// Item duration, `None` while it is indefinite or NaN.
    fn item_duration(&self) -> Option<f64>;

    /// Write `MPNowPlayingInfoCenter.default().nowPlayingInfo`.
    fn update_now_playing_info(&self, info: &MediaPlayerInfo) -> Result<()>;

    /// Remove observers and the current item.
    fn release(&self) -> Result<()>;
}

/// `AVPlayerItem.Status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvItemStatus {
    Unknown,
    ReadyToPlay,
    /// Carries `item.error?.localizedDescription`.
    Failed(String),
}

/// `AVPlayer.TimeControlStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvTimeControlStatus {
    Paused,
    WaitingToPlayAtSpecifiedRate,
    Playing,
}

/// `MPRemoteCommandCenter` commands the module handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
    ChangePlaybackPosition(f64),
}

/// Normalise a raw `CMTimeGetSeconds(item.duration)` value.
pub(crate) fn known_duration(seconds: Option<f64>) -> Option<f64> {
    seconds.filter(|secs| secs.is_finite() && *secs >= 0.0)
}
