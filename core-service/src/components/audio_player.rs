use core_playback::{PlayerStore, Result, Track};
use core_runtime::config::{PlayerConfig, DEFAULT_SEEK_INTERVAL_SECS};
use std::time::Duration;

use super::view::duration_view;
use super::{
    button, play_pause_button, track_view, AutoPlayPolicy, Binding, IconSet, IconSlot,
    PlayerAction, PlayerView,
};

/// Props of the full player.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPlayerProps {
    pub track: Option<Track>,
    pub auto_play: bool,
    /// Restart the track when it completes.
    pub repeat: bool,
    /// Step of the seek forward/backward buttons.
    pub seek_interval: Duration,
    pub icons: IconSet,
    pub show_controls: bool,
    pub show_media: bool,
    pub show_content: bool,
    pub show_duration: bool,
}

impl Default for AudioPlayerProps {
    fn default() -> Self {
        Self {
            track: None,
            auto_play: false,
            repeat: false,
            seek_interval: Duration::from_secs_f64(DEFAULT_SEEK_INTERVAL_SECS),
            icons: IconSet::full(),
            show_controls: true,
            show_media: true,
            show_content: true,
            show_duration: true,
        }
    }
}

impl AudioPlayerProps {
    pub fn new(track: Track) -> Self {
        Self {
            track: Some(track),
            ..Self::default()
        }
    }

    /// Props seeded with the service-wide defaults.
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            auto_play: config.auto_play,
            repeat: config.repeat,
            seek_interval: Duration::from_secs_f64(config.seek_interval_secs),
            ..Self::default()
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    pub fn auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }

    pub fn repeat(mut self, enabled: bool) -> Self {
        self.repeat = enabled;
        self
    }

    pub fn seek_interval(mut self, interval: Duration) -> Self {
        self.seek_interval = interval;
        self
    }

    pub fn icons(mut self, icons: IconSet) -> Self {
        self.icons = icons;
        self
    }
}

/// Full player: track text, artwork, time labels and transport buttons.
#[derive(Debug, Clone)]
pub struct AudioPlayer {
    binding: Binding,
    props: AudioPlayerProps,
}

impl AudioPlayer {
    pub fn new(store: PlayerStore, props: AudioPlayerProps) -> Self {
        Self {
            binding: Binding::new(store),
            props,
        }
    }

    pub fn props(&self) -> &AudioPlayerProps {
        &self.props
    }

    /// Selects the track from the props. Returns whether the selection
    /// changed.
    pub fn mount(&self) -> bool {
        self.binding.mount(self.props.track.as_ref())
    }

    pub fn render(&self) -> PlayerView {
        let snapshot = self.binding.store.snapshot();
        let bound = self.binding.is_bound();
        let icons = &self.props.icons;

        let track = snapshot
            .current_track
            .as_ref()
            .filter(|_| self.props.show_content || self.props.show_media)
            .map(|track| {
                track_view(track, icons, self.props.show_content, self.props.show_media)
            });

        let duration = self
            .props
            .show_duration
            .then(|| duration_view(&snapshot));

        let buttons = if self.props.show_controls {
            let repeat_slot = if snapshot.repeat {
                IconSlot::Repeat
            } else {
                IconSlot::RepeatOff
            };
            vec![
                button(PlayerAction::SeekBackward, icons, IconSlot::SeekBackward, bound),
                play_pause_button(&snapshot, icons, bound),
                button(PlayerAction::SeekForward, icons, IconSlot::SeekForward, bound),
                button(PlayerAction::ToggleRepeat, icons, repeat_slot, bound),
            ]
        } else {
            Vec::new()
        };

        PlayerView {
            state: snapshot.state,
            is_playing: snapshot.is_playing,
            is_loaded: snapshot.is_loaded(),
            repeat: snapshot.repeat,
            track,
            duration,
            buttons,
        }
    }

    /// Forwards a gesture to the bound controls.
    ///
    /// Play from `IDLE`, `STOPPED` or `ERROR` loads the content first.
    /// Seeks move by the configured interval and stay within
    /// `0..=total_duration`. `Next` and `Previous` have no meaning for the
    /// full player and do nothing.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::NotReady`] before controls are bound, otherwise
    /// whatever the control call returns.
    ///
    /// [`PlaybackError::NotReady`]: core_playback::PlaybackError::NotReady
    pub async fn press(&self, action: PlayerAction) -> Result<()> {
        self.binding
            .press(action, self.props.seek_interval.as_secs_f64())
            .await
    }

    /// Plays on every `LOADED` when auto-play is on, and restarts on
    /// `COMPLETED` when repeat is on (through the props or the snapshot).
    /// Returns once the player shuts down.
    pub async fn run(&self) {
        self.binding
            .run(AutoPlayPolicy {
                auto_play: self.props.auto_play,
                repeat: self.props.repeat,
                handles_completion: true,
            })
            .await
    }
}
