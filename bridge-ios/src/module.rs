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

use crate::avplayer::{known_duration, AvItemStatus, AvPlayerHandle, AvTimeControlStatus, RemoteCommand};

/// Cadence of `onAudioProgress` while playing, matching the periodic time
/// observer interval.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Default)]
struct ItemFlags {
    loaded: bool,
    playing: bool,
    buffering: bool,
    stopped: bool,
    ended: bool,
    released: bool,
    pending_load: Option<oneshot::Sender<Result<()>>>,
    ticker: Option<ProgressTicker>,
}

/// `AudioModule` backed by AVPlayer.
pub struct IosAudioModule {
    player: Arc<dyn AvPlayerHandle>,
    emitter: EventEmitter,
    flags: Mutex<ItemFlags>,
    progress_interval: Duration,
}

impl IosAudioModule {
    pub fn new(player: Arc<dyn AvPlayerHandle>) -> Self {
        Self::with_progress_interval(player, DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn with_progress_interval(player: Arc<dyn AvPlayerHandle>, interval: Duration) -> Self {
        Self {
            player,
            emitter: EventEmitter::new(),
            flags: Mutex::new(ItemFlags::default()),
            progress_interval: interval,
        }
    }

    /// KVO callback for `AVPlayerItem.status`.
    pub fn on_item_status_changed(&self, status: AvItemStatus) {
        debug!(status = ?status, "Player item status changed");
        match status {
            AvItemStatus::Unknown => {}
            AvItemStatus::ReadyToPlay => {
                let pending = {
                    let mut flags = self.flags.lock();
                    let pending = flags.pending_load.take();
                    if pending.is_some() {
                        flags.loaded = true;
                    }
                    pending
                };
                if let Some(reply) = pending {
                    self.emitter.emit(NativeAudioEvent::state(native_state::LOADED));
                    let _ = reply.send(Ok(()));
                }
            }
            AvItemStatus::Failed(message) => {
                error!(native_message = %message, "Player item failed");
                let pending = {
                    let mut flags = self.flags.lock();
                    flags.loaded = false;
                    flags.playing = false;
                    flags.buffering = false;
                    flags.ticker = None;
                    flags.pending_load.take()
                };
                if let Some(reply) = pending {
                    let _ = reply.send(Err(BridgeError::NativeFailure(message.clone())));
                }
                self.emitter.emit(NativeAudioEvent::error(message));
            }
        }
    }

    /// KVO callback for `AVPlayer.timeControlStatus`.
    ///
    /// Play and pause transitions are emitted by the commands themselves. A
    /// stall during playback is only logged: the item stays loaded and the
    /// player resumes on its own, so `PLAYING` remains the reported state.
    pub fn on_time_control_status_changed(&self, status: AvTimeControlStatus) {
        let mut flags = self.flags.lock();
        match status {
            AvTimeControlStatus::WaitingToPlayAtSpecifiedRate
                if flags.playing && !flags.buffering =>
            {
                flags.buffering = true;
                warn!("Playback stalled, waiting for data");
            }
            AvTimeControlStatus::Playing if flags.buffering => {
                flags.buffering = false;
                info!("Playback resumed after stall");
            }
            _ => {}
        }
    }

    /// `AVPlayerItemDidPlayToEndTime` notification.
    pub fn on_did_play_to_end(&self) {
        {
            let mut flags = self.flags.lock();
            flags.playing = false;
            flags.buffering = false;
            flags.ended = true;
            flags.ticker = None;
        }
        if let Some(total) = known_duration(self.player.item_duration()) {
            self.emitter.emit(NativeAudioEvent::progress(total, total));
        }
        self.emitter
            .emit(NativeAudioEvent::state(native_state::COMPLETED));
    }

    /// Handler for `MPRemoteCommandCenter` commands.
    pub async fn handle_remote_command(&self, command: RemoteCommand) -> Result<()> {
        debug!(command = ?command, "Remote command");
        match command {
            RemoteCommand::Play => self.play_audio().await,
            RemoteCommand::Pause => self.pause_audio().await,
            RemoteCommand::TogglePlayPause => {
                if self.is_playing() {
                    self.pause_audio().await
                } else {
                    self.play_audio().await
                }
            }
            RemoteCommand::ChangePlaybackPosition(position) => self.seek(position).await,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.flags.lock().playing
    }

    /// Playing, but waiting for data.
    pub fn is_stalled(&self) -> bool {
        self.flags.lock().buffering
    }

    fn check_loaded(&self) -> Result<()> {
        let flags = self.flags.lock();
        if flags.released {
            return Err(BridgeError::NotAvailable(
                "audio module has been released".to_string(),
            ));
        }
        if !flags.loaded {
            return Err(BridgeError::NotReady("no player item loaded".to_string()));
        }
        Ok(())
    }

    fn duration(&self) -> Result<f64> {
        known_duration(self.player.item_duration())
            .ok_or_else(|| BridgeError::NotReady("item duration is indefinite".to_string()))
    }
}

#[async_trait]
impl AudioModule for IosAudioModule {
    fn platform(&self) -> HostPlatform {
        HostPlatform::Ios
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
            if flags.released {
                return Err(BridgeError::NotAvailable(
                    "audio module has been released".to_string(),
                ));
            }
            if let Some(previous) = flags.pending_load.take() {
                let _ = previous.send(Err(BridgeError::NativeFailure(
                    "load superseded by a newer request".to_string(),
                )));
            }
            let (reply, ready) = oneshot::channel();
            *flags = ItemFlags {
                pending_load: Some(reply),
                ..ItemFlags::default()
            };
            ready
        };

        if let Err(err) = self.player.replace_current_item(&url) {
            warn!(error = %err, "Failed to replace player item");
            self.flags.lock().pending_load = None;
            return Err(err);
        }

        match ready.await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Unknown(
                "load request dropped before the item became ready".to_string(),
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
        self.player.update_now_playing_info(&info)
    }

    #[instrument(skip(self))]
    async fn play_audio(&self) -> Result<()> {
        self.check_loaded()?;
        let rewind = {
            let flags = self.flags.lock();
            if flags.playing {
                return Ok(());
            }
            flags.ended
        };

        if rewind {
            self.player.seek(0.0)?;
        }
        self.player.play()?;

        let player = Arc::clone(&self.player);
        let ticker = ProgressTicker::start(self.progress_interval, self.emitter.clone(), move || {
            let total = known_duration(player.item_duration())?;
            Some(ProgressSample::new(player.current_time(), total))
        });
        {
            let mut flags = self.flags.lock();
            flags.playing = true;
            flags.stopped = false;
            flags.ended = false;
            flags.ticker = ticker;
        }
        self.emitter.emit(NativeAudioEvent::state(native_state::PLAYING));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn pause_audio(&self) -> Result<()> {
        if !self.is_playing() {
            return Ok(());
        }
        self.player.pause()?;
        {
            let mut flags = self.flags.lock();
            flags.playing = false;
            flags.buffering = false;
            flags.ticker = None;
        }
        self.emitter.emit(NativeAudioEvent::state(native_state::PAUSED));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_audio(&self) -> Result<()> {
        {
            let flags = self.flags.lock();
            if !flags.loaded || flags.stopped {
                return Ok(());
            }
        }

        self.player.pause()?;
        self.player.seek(0.0)?;
        {
            let mut flags = self.flags.lock();
            flags.playing = false;
            flags.buffering = false;
            flags.ended = false;
            flags.stopped = true;
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
        self.check_loaded()?;
        let total = self.duration()?;
        let target = time_in_seconds.clamp(0.0, total);

        self.player.seek(target)?;
        if target < total {
            self.flags.lock().ended = false;
        }
        self.emitter.emit(NativeAudioEvent::progress(target, total));
        Ok(())
    }

    async fn get_total_duration(&self) -> Result<f64> {
        self.check_loaded()?;
        self.duration()
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
            let pending = flags.pending_load.take();
            *flags = ItemFlags {
                released: true,
                ..ItemFlags::default()
            };
            pending
        };
        if let Some(reply) = pending {
            let _ = reply.send(Err(BridgeError::NotAvailable(
                "audio module released while loading".to_string(),
            )));
        }

        let listeners = self.emitter.remove_all();
        self.player.release()?;
        info!(listeners, "iOS audio module released");
        Ok(())
    }
}
