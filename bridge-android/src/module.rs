use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    native_state, AudioEventListener, AudioModule, EventEmitter, HostPlatform, ListenerId,
    MediaPlayerInfo, NativeAudioEvent, ProgressSample, ProgressTicker,
};
use core_async::sync::oneshot;
use core_async::time::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::exoplayer::{ExoPlaybackState, ExoPlayerHandle, MediaSessionCommand};

/// Cadence of `onAudioProgress` while playing.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

type LoadReply = oneshot::Sender<Result<()>>;

#[derive(Default)]
struct PlayerFlags {
    loaded: bool,
    playing: bool,
    ended: bool,
    released: bool,
    pending_load: Option<LoadReply>,
    ticker: Option<ProgressTicker>,
}

/// `AudioModule` backed by ExoPlayer.
///
/// State strings are emitted only on transitions this module observes:
/// `play_audio` while already playing and `pause_audio` while paused are
/// silent no-ops.
pub struct AndroidAudioModule {
    player: Arc<dyn ExoPlayerHandle>,
    emitter: EventEmitter,
    flags: Mutex<PlayerFlags>,
    progress_interval: Duration,
}

impl AndroidAudioModule {
    pub fn new(player: Arc<dyn ExoPlayerHandle>) -> Self {
        Self::with_progress_interval(player, DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn with_progress_interval(player: Arc<dyn ExoPlayerHandle>, interval: Duration) -> Self {
        Self {
            player,
            emitter: EventEmitter::new(),
            flags: Mutex::new(PlayerFlags::default()),
            progress_interval: interval,
        }
    }

    /// Forward of `Player.Listener.onPlaybackStateChanged`.
    ///
    /// `BUFFERING` is reported only while a load is preparing. Rebuffering a
    /// loaded item (after a seek or a network stall) keeps the last reported
    /// state, so observers never see a loaded item fall back to `IDLE`.
    pub fn on_playback_state_changed(&self, state: ExoPlaybackState) {
        debug!(state = ?state, "ExoPlayer state changed");
        match state {
            ExoPlaybackState::Buffering => {
                let preparing = self.flags.lock().pending_load.is_some();
                if preparing {
                    self.emitter
                        .emit(NativeAudioEvent::state(native_state::BUFFERING));
                } else {
                    debug!("Rebuffering loaded item");
                }
            }
            ExoPlaybackState::Ready => {
                let pending = {
                    let mut flags = self.flags.lock();
                    let pending = flags.pending_load.take();
                    if pending.is_some() {
                        flags.loaded = true;
                        flags.ended = false;
                    }
                    pending
                };

                match pending {
                    Some(reply) => {
                        self.emitter.emit(NativeAudioEvent::state(native_state::LOADED));
                        let _ = reply.send(Ok(()));
                    }
                    None => debug!("Rebuffering finished"),
                }
            }
            ExoPlaybackState::Ended => {
                {
                    let mut flags = self.flags.lock();
                    flags.playing = false;
                    flags.ended = true;
                    flags.ticker = None;
                }
                if let Some(duration) = self.player.duration_ms() {
                    let total = ms_to_secs(duration);
                    self.emitter.emit(NativeAudioEvent::progress(total, total));
                }
                self.emitter
                    .emit(NativeAudioEvent::state(native_state::COMPLETED));
            }
            ExoPlaybackState::Idle => {
                let was_loaded = {
                    let mut flags = self.flags.lock();
                    let was_loaded = flags.loaded;
                    flags.loaded = false;
                    flags.playing = false;
                    flags.ticker = None;
                    was_loaded
                };
                if was_loaded {
                    self.emitter.emit(NativeAudioEvent::state(native_state::IDLE));
                }
            }
        }
    }

    /// Forward of `Player.Listener.onPlayerError`.
    ///
    /// Rejects a pending load with the native message and emits `ERROR`.
    pub fn on_player_error(&self, message: &str) {
        error!(native_message = message, "ExoPlayer reported an error");
        let pending = {
            let mut flags = self.flags.lock();
            flags.loaded = false;
            flags.playing = false;
            flags.ticker = None;
            flags.pending_load.take()
        };
        if let Some(reply) = pending {
            let _ = reply.send(Err(BridgeError::NativeFailure(message.to_string())));
        }
        self.emitter.emit(NativeAudioEvent::error(message));
    }

    /// Transport controls from the lock screen, notification or headset.
    pub async fn handle_media_session(&self, command: MediaSessionCommand) -> Result<()> {
        debug!(command = ?command, "Media session command");
        match command {
            MediaSessionCommand::Play => self.play_audio().await,
            MediaSessionCommand::Pause => self.pause_audio().await,
            MediaSessionCommand::Stop => self.stop_audio().await,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.flags.lock().playing
    }

    fn ensure_alive(flags: &PlayerFlags) -> Result<()> {
        if flags.released {
            return Err(BridgeError::NotAvailable(
                "audio module has been released".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_loaded(flags: &PlayerFlags) -> Result<()> {
        Self::ensure_alive(flags)?;
        if !flags.loaded {
            return Err(BridgeError::NotReady("no content loaded".to_string()));
        }
        Ok(())
    }

    fn start_ticker(&self) -> Option<ProgressTicker> {
        let player = Arc::clone(&self.player);
        ProgressTicker::start(self.progress_interval, self.emitter.clone(), move || {
            let duration = player.duration_ms()?;
            Some(ProgressSample::new(
                ms_to_secs(player.current_position_ms()),
                ms_to_secs(duration),
            ))
        })
    }
}

#[async_trait]
impl AudioModule for AndroidAudioModule {
    fn platform(&self) -> HostPlatform {
        HostPlatform::Android
    }

    #[instrument(skip_all)]
    async fn load_content(&self, url: String) -> Result<()> {
        if url.trim().is_empty() {
            return Err(BridgeError::InvalidArgument(
                "url must not be empty".to_string(),
            ));
        }

        let ready = {
            let mut flags = self.flags.lock();
            Self::ensure_alive(&flags)?;
            if let Some(previous) = flags.pending_load.take() {
                let _ = previous.send(Err(BridgeError::NativeFailure(
                    "load superseded by a newer request".to_string(),
                )));
            }
            flags.loaded = false;
            flags.playing = false;
            flags.ended = false;
            flags.ticker = None;

            let (reply, ready) = oneshot::channel();
            flags.pending_load = Some(reply);
            ready
        };

        if let Err(err) = self
            .player
            .set_media_item(&url)
            .and_then(|_| self.player.prepare())
        {
            warn!(error = %err, "Failed to prepare media item");
            self.flags.lock().pending_load = None;
            return Err(err);
        }
        debug!("Media item preparing");

        match ready.await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Unknown(
                "load request dropped before the player became ready".to_string(),
            )),
        }
    }

    #[instrument(skip_all, fields(title = %info.title))]
    async fn set_media_player_info(&self, info: MediaPlayerInfo) -> Result<()> {
        if info.title.trim().is_empty() {
            return Err(BridgeError::InvalidArgument(
                "track title is required".to_string(),
            ));
        }
        Self::ensure_alive(&self.flags.lock())?;
        self.player.update_media_session(&info)
    }

    #[instrument(skip(self))]
    async fn play_audio(&self) -> Result<()> {
        let rewind = {
            let flags = self.flags.lock();
            Self::ensure_loaded(&flags)?;
            if flags.playing {
                debug!("Already playing");
                return Ok(());
            }
            flags.ended
        };

        if rewind {
            self.player.seek_to(0)?;
        }
        self.player.play()?;

        let ticker = self.start_ticker();
        {
            let mut flags = self.flags.lock();
            flags.playing = true;
            flags.ended = false;
            flags.ticker = ticker;
        }
        self.emitter.emit(NativeAudioEvent::state(native_state::PLAYING));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn pause_audio(&self) -> Result<()> {
        {
            let flags = self.flags.lock();
            Self::ensure_alive(&flags)?;
            if !flags.playing {
                debug!("Not playing, ignoring pause");
                return Ok(());
            }
        }

        self.player.pause()?;
        {
            let mut flags = self.flags.lock();
            flags.playing = false;
            flags.ticker = None;
        }
        self.emitter.emit(NativeAudioEvent::state(native_state::PAUSED));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_audio(&self) -> Result<()> {
        {
            let flags = self.flags.lock();
            Self::ensure_alive(&flags)?;
            if !flags.loaded {
                debug!("Nothing loaded, ignoring stop");
                return Ok(());
            }
        }

        self.player.stop()?;
        {
            let mut flags = self.flags.lock();
            flags.loaded = false;
            flags.playing = false;
            flags.ended = false;
            flags.ticker = None;
        }
        self.emitter.emit(NativeAudioEvent::state(native_state::STOPPED));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn seek(&self, time_in_seconds: f64) -> Result<()> {
        if !time_in_seconds.is_finite() {
            return Err(BridgeError::InvalidArgument(format!(
                "seek position must be finite, got {time_in_seconds}"
            )));
        }
        Self::ensure_loaded(&self.flags.lock())?;

        let duration_ms = self
            .player
            .duration_ms()
            .ok_or_else(|| BridgeError::NotReady("duration is not known yet".to_string()))?;
        let target_ms = ((time_in_seconds * 1000.0).round() as i64).clamp(0, duration_ms);

        self.player.seek_to(target_ms)?;
        if target_ms < duration_ms {
            self.flags.lock().ended = false;
        }
        self.emitter.emit(NativeAudioEvent::progress(
            ms_to_secs(target_ms),
            ms_to_secs(duration_ms),
        ));
        Ok(())
    }

    async fn get_total_duration(&self) -> Result<f64> {
        Self::ensure_loaded(&self.flags.lock())?;
        self.player
            .duration_ms()
            .map(ms_to_secs)
            .ok_or_else(|| BridgeError::NotReady("duration is not known yet".to_string()))
    }

    fn add_listener(&self, listener: Arc<dyn AudioEventListener>) -> ListenerId {
        self.emitter.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.emitter.remove_listener(id)
    }

    async fn release(&self) -> Result<()> {
        let pending = {
            let mut flags = self.flags.lock();
            if flags.released {
                return Ok(());
            }
            flags.released = true;
            flags.loaded = false;
            flags.playing = false;
            flags.ticker = None;
            flags.pending_load.take()
        };
        if let Some(reply) = pending {
            let _ = reply.send(Err(BridgeError::NotAvailable(
                "audio module released while loading".to_string(),
            )));
        }

        let listeners = self.emitter.remove_all();
        self.player.release()?;
        info!(listeners, "Android audio module released");
        Ok(())
    }
}

fn ms_to_secs(ms: i64) -> f64 {
    ms as f64 / 1000.0
}
