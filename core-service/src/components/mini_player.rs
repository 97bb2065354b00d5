use core_playback::{PlaybackError, PlayerStore, Result, Track};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{
    button, play_pause_button, track_view, AutoPlayPolicy, Binding, IconSet, IconSlot,
    PlayerAction, PlayerView,
};

/// Callback into the host, e.g. to move through a queue.
pub type HostCallback = Arc<dyn Fn() + Send + Sync>;

/// Props of the mini player.
#[derive(Clone)]
pub struct MiniPlayerProps {
    pub track: Option<Track>,
    pub auto_play: bool,
    pub icons: IconSet,
    pub on_next: Option<HostCallback>,
    pub on_previous: Option<HostCallback>,
}

impl Default for MiniPlayerProps {
    fn default() -> Self {
        Self {
            track: None,
            auto_play: false,
            icons: IconSet::compact(),
            on_next: None,
            on_previous: None,
        }
    }
}

impl MiniPlayerProps {
    pub fn new(track: Track) -> Self {
        Self {
            track: Some(track),
            ..Self::default()
        }
    }

    pub fn auto_play(mut self, enabled: bool) -> Self {
        self.auto_play = enabled;
        self
    }

    pub fn icons(mut self, icons: IconSet) -> Self {
        self.icons = icons;
        self
    }

    pub fn on_next(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_next = Some(Arc::new(callback));
        self
    }

    pub fn on_previous(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_previous = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for MiniPlayerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniPlayerProps")
            .field("track", &self.track)
            .field("auto_play", &self.auto_play)
            .field("icons", &self.icons)
            .field("on_next", &self.on_next.is_some())
            .field("on_previous", &self.on_previous.is_some())
            .finish()
    }
}

/// Compact player: artwork placeholder, title and previous/play/next.
#[derive(Debug, Clone)]
pub struct MiniPlayer {
    binding: Binding,
    props: MiniPlayerProps,
}

impl MiniPlayer {
    pub fn new(store: PlayerStore, props: MiniPlayerProps) -> Self {
        Self {
            binding: Binding::new(store),
            props,
        }
    }

    pub fn mount(&self) -> bool {
        self.binding.mount(self.props.track.as_ref())
    }

    pub fn render(&self) -> PlayerView {
        let snapshot = self.binding.store.snapshot();
        let bound = self.binding.is_bound();
        let icons = &self.props.icons;

        PlayerView {
            state: snapshot.state,
            is_playing: snapshot.is_playing,
            is_loaded: snapshot.is_loaded(),
            repeat: snapshot.repeat,
            track: snapshot
                .current_track
                .as_ref()
                .map(|track| track_view(track, icons, true, true)),
            duration: None,
            buttons: vec![
                button(
                    PlayerAction::Previous,
                    icons,
                    IconSlot::Previous,
                    self.props.on_previous.is_some(),
                ),
                play_pause_button(&snapshot, icons, bound),
                button(
                    PlayerAction::Next,
                    icons,
                    IconSlot::Next,
                    self.props.on_next.is_some(),
                ),
            ],
        }
    }

    /// Forwards a gesture. `Next` and `Previous` go to the host callbacks
    /// and work without bound controls; a missing callback makes them a
    /// no-op. The mini player has no seek buttons, so seek gestures fail
    /// with `InvalidArgument`.
    pub async fn press(&self, action: PlayerAction) -> Result<()> {
        let callback = match action {
            PlayerAction::Next => &self.props.on_next,
            PlayerAction::Previous => &self.props.on_previous,
            PlayerAction::SeekForward | PlayerAction::SeekBackward => {
                return Err(PlaybackError::InvalidArgument(format!(
                    "{:?} is not available in the mini player",
                    action
                )));
            }
            _ => return self.binding.press(action, 0.0).await,
        };

        debug!(?action, "Delegating to host");
        if let Some(callback) = callback {
            callback();
        }
        Ok(())
    }

    /// Plays on every `LOADED` when auto-play is on. Returns once the
    /// player shuts down.
    pub async fn run(&self) {
        self.binding
            .run(AutoPlayPolicy {
                auto_play: self.props.auto_play,
                repeat: false,
                handles_completion: false,
            })
            .await
    }
}
