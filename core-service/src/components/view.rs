//! Render output of the presentation models.

use core_playback::{PlayerState, PlayerStateSnapshot};
use serde::{Deserialize, Serialize};

/// Gesture a host button forwards to a presentation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerAction {
    /// Pause when playing, play otherwise.
    PlayPause,
    SeekForward,
    SeekBackward,
    Next,
    Previous,
    ToggleRepeat,
    Stop,
}

/// One button of a rendered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonView {
    pub action: PlayerAction,
    pub icon: String,
    /// `false` while pressing would fail, e.g. before controls are bound.
    pub enabled: bool,
}

/// Track text and artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackView {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Artwork URL, or the placeholder icon name when the track has none.
    pub artwork: Option<String>,
    pub placeholder_icon: String,
}

/// Elapsed and total time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationView {
    pub elapsed: String,
    pub total: String,
    /// Percentage in `0.0..=100.0`.
    pub progress: f64,
}

/// Everything a host needs to draw a player.
///
/// Sections hidden through the props are `None` (or empty for buttons).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub state: PlayerState,
    pub is_playing: bool,
    pub is_loaded: bool,
    pub repeat: bool,
    pub track: Option<TrackView>,
    pub duration: Option<DurationView>,
    pub buttons: Vec<ButtonView>,
}

impl PlayerView {
    pub fn button(&self, action: PlayerAction) -> Option<&ButtonView> {
        self.buttons.iter().find(|button| button.action == action)
    }
}

/// Formats seconds as `m:ss`, or `h:mm:ss` from one hour up.
///
/// Negative and non-finite values render as `0:00`. Fractions are
/// truncated.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

pub(crate) fn duration_view(snapshot: &PlayerStateSnapshot) -> DurationView {
    DurationView {
        elapsed: format_time(snapshot.elapsed_time),
        total: format_time(snapshot.total_duration),
        progress: snapshot.progress,
    }
}
