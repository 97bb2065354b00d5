//! # Presentation Models
//!
//! Headless counterparts of the full player and the mini player. They
//! read the shared [`PlayerStore`], turn snapshots into a [`PlayerView`]
//! the host draws, and forward button presses to the bound
//! [`ControlBundle`]. They hold no playback state of their own.
//!
//! Each model has the same shape:
//!
//! - `mount()` selects the track from the props
//! - `render()` builds the current [`PlayerView`]
//! - `press(action)` forwards a gesture
//! - `run()` drives auto-play (and, for the full player, repeat) until the
//!   player shuts down

mod audio_player;
mod icons;
mod mini_player;
mod view;

pub use audio_player::{AudioPlayer, AudioPlayerProps};
pub use icons::{IconLayout, IconSet, IconSlot};
pub use mini_player::{HostCallback, MiniPlayer, MiniPlayerProps};
pub use view::{format_time, ButtonView, DurationView, PlayerAction, PlayerView, TrackView};

use core_playback::{
    ControlBundle, PlaybackError, PlayerState, PlayerStateSnapshot, PlayerStore, Result, Track,
};
use tracing::{debug, warn};

/// Store access shared by both models.
#[derive(Debug, Clone)]
struct Binding {
    store: PlayerStore,
}

/// What `run` reacts to.
#[derive(Debug, Clone, Copy)]
struct AutoPlayPolicy {
    auto_play: bool,
    /// Restart on `COMPLETED`. The snapshot's repeat flag also counts.
    repeat: bool,
    /// Whether repeat applies at all.
    handles_completion: bool,
}

impl Binding {
    fn new(store: PlayerStore) -> Self {
        Self { store }
    }

    fn mount(&self, track: Option<&Track>) -> bool {
        match track {
            Some(track) => {
                debug!(title = %track.title, "Mounting player");
                self.store.set_track(Some(track.clone()))
            }
            None => false,
        }
    }

    fn controls(&self) -> Result<ControlBundle> {
        self.store
            .controls()
            .ok_or_else(|| PlaybackError::NotReady("player controls are not bound yet".to_string()))
    }

    fn is_bound(&self) -> bool {
        self.store.controls().is_some()
    }

    async fn press(&self, action: PlayerAction, seek_interval_secs: f64) -> Result<()> {
        let controls = self.controls()?;
        let snapshot = self.store.snapshot();
        debug!(?action, state = %snapshot.state, "Button pressed");

        match action {
            PlayerAction::PlayPause if snapshot.is_playing => controls.pause().await,
            PlayerAction::PlayPause => {
                if needs_load(snapshot.state) {
                    controls.load_content().await?;
                }
                controls.play().await
            }
            PlayerAction::SeekForward => {
                controls
                    .seek(seek_forward_target(&snapshot, seek_interval_secs))
                    .await
            }
            PlayerAction::SeekBackward => {
                controls
                    .seek(seek_backward_target(&snapshot, seek_interval_secs))
                    .await
            }
            PlayerAction::ToggleRepeat => controls.toggle_repeat().await,
            PlayerAction::Stop => controls.stop().await,
            PlayerAction::Next | PlayerAction::Previous => Ok(()),
        }
    }

    async fn run(&self, policy: AutoPlayPolicy) {
        let mut snapshots = self.store.subscribe();
        let mut previous: Option<PlayerStateSnapshot> = None;

        loop {
            let snapshot = snapshots.borrow_and_update().clone();
            self.react(policy, previous.as_ref(), &snapshot).await;
            previous = Some(snapshot);

            if snapshots.changed().await.is_err() {
                debug!("Player store closed, stopping presentation loop");
                return;
            }
        }
    }

    async fn react(
        &self,
        policy: AutoPlayPolicy,
        previous: Option<&PlayerStateSnapshot>,
        snapshot: &PlayerStateSnapshot,
    ) {
        let entered = |state: PlayerState| {
            snapshot.state == state
                && previous.map_or(true, |prev| {
                    prev.state != state || prev.current_track != snapshot.current_track
                })
        };

        let reason = if policy.auto_play && entered(PlayerState::Loaded) {
            "autoPlay"
        } else if policy.handles_completion
            && (policy.repeat || snapshot.repeat)
            && entered(PlayerState::Completed)
        {
            "repeat"
        } else {
            return;
        };

        let Some(controls) = self.store.controls() else {
            return;
        };
        debug!(reason, "Starting playback");
        if let Err(err) = controls.play().await {
            warn!(reason, error = %err, "Automatic playback failed");
        }
    }
}

/// States from which play needs content loaded first.
fn needs_load(state: PlayerState) -> bool {
    matches!(
        state,
        PlayerState::Idle | PlayerState::Stopped | PlayerState::Error
    )
}

/// `elapsed + interval`, capped at the total duration once it is known.
fn seek_forward_target(snapshot: &PlayerStateSnapshot, interval_secs: f64) -> f64 {
    let target = snapshot.elapsed_time + interval_secs;
    if snapshot.total_duration > 0.0 {
        target.min(snapshot.total_duration)
    } else {
        target
    }
}

fn seek_backward_target(snapshot: &PlayerStateSnapshot, interval_secs: f64) -> f64 {
    (snapshot.elapsed_time - interval_secs).max(0.0)
}

fn play_pause_button(snapshot: &PlayerStateSnapshot, icons: &IconSet, enabled: bool) -> ButtonView {
    let slot = if snapshot.is_playing {
        IconSlot::Pause
    } else {
        IconSlot::Play
    };
    ButtonView {
        action: PlayerAction::PlayPause,
        icon: icons.icon(slot).to_string(),
        enabled,
    }
}

fn button(action: PlayerAction, icons: &IconSet, slot: IconSlot, enabled: bool) -> ButtonView {
    ButtonView {
        action,
        icon: icons.icon(slot).to_string(),
        enabled,
    }
}

fn track_view(track: &Track, icons: &IconSet, with_text: bool, with_media: bool) -> TrackView {
    TrackView {
        title: if with_text {
            track.title.clone()
        } else {
            String::new()
        },
        artist: track.artist.clone().filter(|_| with_text),
        album: track.album.clone().filter(|_| with_text),
        artwork: track.artwork.clone().filter(|_| with_media),
        placeholder_icon: icons.icon(IconSlot::Media).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(elapsed: f64, total: f64) -> PlayerStateSnapshot {
        PlayerStateSnapshot {
            elapsed_time: elapsed,
            total_duration: total,
            ..PlayerStateSnapshot::default()
        }
    }

    #[test]
    fn test_seek_forward_caps_at_total() {
        assert_eq!(seek_forward_target(&at(10.0, 60.0), 3.0), 13.0);
        assert_eq!(seek_forward_target(&at(58.5, 60.0), 3.0), 60.0);
        assert_eq!(seek_forward_target(&at(4.0, 0.0), 3.0), 7.0);
    }

    #[test]
    fn test_seek_backward_floors_at_zero() {
        assert_eq!(seek_backward_target(&at(10.0, 60.0), 3.0), 7.0);
        assert_eq!(seek_backward_target(&at(1.0, 60.0), 3.0), 0.0);
    }

    #[test]
    fn test_needs_load() {
        assert!(needs_load(PlayerState::Idle));
        assert!(needs_load(PlayerState::Stopped));
        assert!(needs_load(PlayerState::Error));
        assert!(!needs_load(PlayerState::Loaded));
        assert!(!needs_load(PlayerState::Paused));
        assert!(!needs_load(PlayerState::Completed));
    }

    #[test]
    fn test_track_view_sections() {
        let track = Track::new("A", "http://x/a.mp3")
            .with_artist("Band")
            .with_artwork("http://x/a.jpg");
        let icons = IconSet::full();

        let full = track_view(&track, &icons, true, true);
        assert_eq!(full.title, "A");
        assert_eq!(full.artist.as_deref(), Some("Band"));
        assert_eq!(full.artwork.as_deref(), Some("http://x/a.jpg"));

        let media_only = track_view(&track, &icons, false, true);
        assert!(media_only.title.is_empty());
        assert_eq!(media_only.artist, None);
        assert_eq!(media_only.placeholder_icon, "musical-notes-sharp");
    }
}
