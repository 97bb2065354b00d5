//! # Reconciler
//!
//! Turns native audio events, control commands and native-call results
//! into canonical player state.
//!
//! ## Overview
//!
//! A single task owns the [`StoreWriter`] and drains one ordered inbox:
//!
//! ```text
//!  AudioModule listener ──Native──┐
//!  ControlBundle ───────Command───┤    ┌────────────┐   StoreWriter
//!  spawned native calls ─Completed┼───>│ Reconciler ├──────────────> PlayerStore
//!  PlayerStore::set_track ─(watch)┘    └─────┬──────┘
//!                                            │ PlaybackEvent
//!                                            v
//!                                        EventBus
//! ```
//!
//! Native calls run on their own tasks and report back through the inbox,
//! so a slow native call never holds up event processing and a command's
//! result is applied in the same order as the events it caused. A module
//! that emits `LOADED` before resolving `load_content` is observed as
//! `LOADED` first, then the load result.
//!
//! ## Error policy
//!
//! A failing command is logged at `warn`, published as
//! [`PlaybackEvent::Error`] and returned to the caller. State is left
//! untouched, except that the optimistic `is_playing` flag set by `play`
//! and `pause` is re-synchronised with the canonical state. Nothing is
//! retried.

use bridge_traits::{AudioEventListener, AudioModule, ListenerId, NativeAudioEvent};
use core_async::sync::{mpsc, oneshot, watch};
use core_async::task::{self, JoinHandle};
use core_runtime::events::{CoreEvent, EventBus, LifecycleEvent, PlaybackEvent};
use core_runtime::logging::redact_url;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::controls::ControlBundle;
use crate::error::{PlaybackError, Result};
use crate::state::{PlayerState, SnapshotPatch, Track};
use crate::store::{PlayerStore, StoreWriter};

type Reply = oneshot::Sender<Result<()>>;

// ============================================================================
// Inbox
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    Play,
    Pause,
    Stop,
    Seek(f64),
    LoadContent,
    ToggleRepeat,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Stop => "stop",
            Command::Seek(_) => "seek",
            Command::LoadContent => "loadContent",
            Command::ToggleRepeat => "toggleRepeat",
        }
    }
}

/// Result of a native call made on behalf of a command.
pub(crate) enum Outcome {
    Loaded {
        result: Result<()>,
        /// Duration query, made only after a successful load.
        duration: Option<Result<f64>>,
    },
    Played(Result<()>),
    Paused(Result<()>),
    Stopped(Result<()>),
    Seeked(Result<()>),
}

impl Outcome {
    fn operation(&self) -> &'static str {
        match self {
            Outcome::Loaded { .. } => "loadContent",
            Outcome::Played(_) => "play",
            Outcome::Paused(_) => "pause",
            Outcome::Stopped(_) => "stop",
            Outcome::Seeked(_) => "seek",
        }
    }

    fn into_result(self) -> Result<()> {
        match self {
            Outcome::Loaded { result, .. }
            | Outcome::Played(result)
            | Outcome::Paused(result)
            | Outcome::Stopped(result)
            | Outcome::Seeked(result) => result,
        }
    }
}

pub(crate) enum Message {
    Native(NativeAudioEvent),
    Command {
        generation: u64,
        command: Command,
        reply: Reply,
    },
    Completed {
        generation: u64,
        outcome: Outcome,
        reply: Option<Reply>,
    },
    Shutdown,
}

// ============================================================================
// Reconciler
// ============================================================================

/// Single writer of the player state.
pub struct Reconciler {
    adapter: Arc<dyn AudioModule>,
    writer: StoreWriter,
    bus: EventBus,
    inbox: mpsc::UnboundedSender<Message>,
    /// Bumped on every track change. Commands and completions carrying an
    /// older value belong to a previous track.
    generation: u64,
    load_in_flight: bool,
    /// The native item of the current track is loaded. Cleared by a
    /// canonical `STOPPED`, `ERROR` or `IDLE`, never by unrecognised states.
    content_loaded: bool,
}

impl Reconciler {
    /// Subscribes to `adapter` and starts the reconciler task.
    ///
    /// Taking the [`StoreWriter`] by value guarantees one reconciler, and
    /// one adapter subscription, per store.
    ///
    /// # Panics
    ///
    /// Panics when called outside a runtime.
    pub fn spawn(
        adapter: Arc<dyn AudioModule>,
        writer: StoreWriter,
        store: &PlayerStore,
        bus: EventBus,
    ) -> ReconcilerHandle {
        let (inbox, inbox_rx) = mpsc::unbounded_channel();

        let events = inbox.clone();
        let listener: Arc<dyn AudioEventListener> = Arc::new(move |event: NativeAudioEvent| {
            let _ = events.send(Message::Native(event));
        });
        let listener_id = adapter.add_listener(listener);

        let platform = adapter.platform();
        info!(%platform, "Reconciler bound to audio module");
        let _ = bus.emit(CoreEvent::Lifecycle(LifecycleEvent::AdapterBound {
            platform: platform.to_string(),
        }));

        let reconciler = Reconciler {
            adapter,
            writer,
            bus,
            inbox: inbox.clone(),
            generation: 0,
            load_in_flight: false,
            content_loaded: false,
        };
        let task = task::spawn(reconciler.run(inbox_rx, store.watch_track(), listener_id));

        ReconcilerHandle {
            inbox,
            task: Mutex::new(Some(task)),
        }
    }

    async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<Message>,
        mut tracks: watch::Receiver<Option<Track>>,
        listener_id: ListenerId,
    ) {
        let initial = tracks.borrow_and_update().clone();
        if initial.is_some() {
            self.on_track_changed(initial);
        }

        let mut tracks_open = true;
        loop {
            core_async::select! {
                message = inbox.recv() => match message {
                    Some(Message::Shutdown) | None => break,
                    Some(message) => self.handle(message),
                },
                changed = tracks.changed(), if tracks_open => match changed {
                    Ok(()) => {
                        let track = tracks.borrow_and_update().clone();
                        self.on_track_changed(track);
                    }
                    Err(_) => tracks_open = false,
                },
            }
        }

        self.teardown(listener_id).await;
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Native(event) => self.on_native_event(event),
            Message::Command {
                generation,
                command,
                reply,
            } => {
                if generation != self.generation {
                    let error = self.fail(
                        command.name(),
                        PlaybackError::InvalidArgument(format!(
                            "controls are stale: bound to track generation {}, current is {}",
                            generation, self.generation
                        )),
                    );
                    let _ = reply.send(Err(error));
                    return;
                }
                self.on_command(command, reply);
            }
            Message::Completed {
                generation,
                outcome,
                reply,
            } => self.on_completed(generation, outcome, reply),
            Message::Shutdown => {}
        }
    }

    // ========================================================================
    // Track selection
    // ========================================================================

    fn on_track_changed(&mut self, track: Option<Track>) {
        let was_active = self.load_in_flight || self.writer.snapshot().is_loaded();
        self.generation += 1;
        self.load_in_flight = false;
        self.content_loaded = false;

        match track {
            Some(track) => {
                info!(
                    title = %track.title,
                    url = %redact_url(&track.url),
                    generation = self.generation,
                    "Track selected"
                );
                // Bound before the track becomes visible, so observers
                // that see the track also find its controls.
                self.writer.bind_controls(Some(ControlBundle::new(
                    self.inbox.clone(),
                    self.generation,
                )));
                self.writer.load_track(track.clone());
                self.bus.publish(PlaybackEvent::TrackChanged {
                    title: Some(track.title),
                    url: Some(track.url),
                });
                self.start_load(None);
            }
            None => {
                info!(generation = self.generation, "Track cleared");
                if was_active {
                    let adapter = Arc::clone(&self.adapter);
                    task::spawn(async move {
                        if let Err(err) = adapter.stop_audio().await {
                            warn!(error = %err, "Failed to stop audio after clearing the track");
                        }
                    });
                }
                self.writer.bind_controls(None);
                self.writer.reset();
                self.bus.publish(PlaybackEvent::TrackChanged {
                    title: None,
                    url: None,
                });
            }
        }
    }

    // ========================================================================
    // Native events
    // ========================================================================

    fn on_native_event(&mut self, event: NativeAudioEvent) {
        let snapshot = self.writer.snapshot();
        if !snapshot.has_track() {
            debug!(event = event.name(), "No track selected, ignoring native event");
            return;
        }

        match event {
            NativeAudioEvent::StateChange { state, message } => {
                let next = PlayerState::from_native(&state);
                if unloads_content(&state) {
                    self.content_loaded = false;
                }
                let mut patch = SnapshotPatch::new()
                    .state(next)
                    .is_playing(next == PlayerState::Playing);
                if next == PlayerState::Loaded {
                    patch = patch.elapsed_time(0.0).progress(0.0);
                }
                self.writer.update(&patch);

                if next != snapshot.state {
                    debug!(native = %state, state = %next, previous = %snapshot.state, "Player state changed");
                    self.bus.publish(PlaybackEvent::StateChanged {
                        state: next.to_string(),
                        previous: snapshot.state.to_string(),
                    });
                }

                if next == PlayerState::Error {
                    let message =
                        message.unwrap_or_else(|| "native player reported an error".to_string());
                    warn!(native_message = %message, "Native player entered the error state");
                    self.bus.publish(PlaybackEvent::Error {
                        operation: "native".to_string(),
                        kind: "NativeFailure".to_string(),
                        message,
                    });
                }
            }
            NativeAudioEvent::Progress {
                current_time,
                progress,
                total_duration,
            } => {
                let percent = progress * 100.0;
                let mut patch = SnapshotPatch::new()
                    .elapsed_time(current_time)
                    .progress(percent);
                if total_duration > 0.0 {
                    patch = patch.total_duration(total_duration);
                }

                if self.writer.update(&patch) {
                    let total = self.writer.snapshot().total_duration;
                    self.bus.publish(PlaybackEvent::Progress {
                        elapsed_secs: current_time,
                        total_duration_secs: total,
                        progress_percent: percent,
                    });
                }
            }
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    fn on_command(&mut self, command: Command, reply: Reply) {
        debug!(command = command.name(), generation = self.generation, "Command received");
        let adapter = Arc::clone(&self.adapter);

        match command {
            Command::LoadContent => self.start_load(Some(reply)),
            Command::Play => {
                self.writer.update(&SnapshotPatch::new().is_playing(true));
                let info = self.writer.snapshot().current_track.map(|t| t.media_info());
                self.dispatch(Some(reply), async move {
                    let result = adapter.play_audio().await.map_err(PlaybackError::from);
                    if let (Ok(()), Some(info)) = (&result, info) {
                        if let Err(err) = adapter.set_media_player_info(info).await {
                            warn!(error = %err, "Failed to update media session");
                        }
                    }
                    Outcome::Played(result)
                });
            }
            Command::Pause => {
                self.writer.update(&SnapshotPatch::new().is_playing(false));
                self.dispatch(Some(reply), async move {
                    Outcome::Paused(adapter.pause_audio().await.map_err(PlaybackError::from))
                });
            }
            Command::Stop => {
                self.writer.reset_playback();
                self.dispatch(Some(reply), async move {
                    Outcome::Stopped(adapter.stop_audio().await.map_err(PlaybackError::from))
                });
            }
            Command::Seek(position) => {
                if !position.is_finite() {
                    let error = self.fail(
                        "seek",
                        PlaybackError::InvalidArgument(format!(
                            "seek position must be finite, got {}",
                            position
                        )),
                    );
                    let _ = reply.send(Err(error));
                    return;
                }
                self.dispatch(Some(reply), async move {
                    Outcome::Seeked(adapter.seek(position).await.map_err(PlaybackError::from))
                });
            }
            Command::ToggleRepeat => {
                let repeat = !self.writer.snapshot().repeat;
                self.writer.update(&SnapshotPatch::new().repeat(repeat));
                self.bus.publish(PlaybackEvent::RepeatToggled { repeat });
                let _ = reply.send(Ok(()));
            }
        }
    }

    fn start_load(&mut self, reply: Option<Reply>) {
        let snapshot = self.writer.snapshot();
        let Some(track) = snapshot.current_track else {
            return self.reject(
                reply,
                "loadContent",
                PlaybackError::InvalidArgument("no track selected".to_string()),
            );
        };
        if track.url.trim().is_empty() {
            return self.reject(
                reply,
                "loadContent",
                PlaybackError::InvalidArgument("track url must not be empty".to_string()),
            );
        }
        if self.load_in_flight || self.content_loaded || snapshot.state.is_loaded() {
            debug!(state = %snapshot.state, loading = self.load_in_flight, "Content already loaded");
            if let Some(reply) = reply {
                let _ = reply.send(Ok(()));
            }
            return;
        }

        self.load_in_flight = true;
        debug!(url = %redact_url(&track.url), "Loading content");
        let adapter = Arc::clone(&self.adapter);
        self.dispatch(reply, async move {
            let result = adapter
                .load_content(track.url)
                .await
                .map_err(PlaybackError::from);
            let duration = match result {
                Ok(()) => Some(
                    adapter
                        .get_total_duration()
                        .await
                        .map_err(PlaybackError::from),
                ),
                Err(_) => None,
            };
            Outcome::Loaded { result, duration }
        });
    }

    /// Runs a native call on its own task and posts the outcome back to
    /// the inbox, tagged with the current generation.
    fn dispatch<F>(&self, reply: Option<Reply>, call: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let inbox = self.inbox.clone();
        let generation = self.generation;
        task::spawn(async move {
            let outcome = call.await;
            let _ = inbox.send(Message::Completed {
                generation,
                outcome,
                reply,
            });
        });
    }

    // ========================================================================
    // Completions
    // ========================================================================

    fn on_completed(&mut self, generation: u64, outcome: Outcome, reply: Option<Reply>) {
        let operation = outcome.operation();
        if generation != self.generation {
            debug!(
                operation,
                generation,
                current = self.generation,
                "Ignoring completion for a previous track"
            );
            respond(reply, outcome.into_result());
            return;
        }

        let result = match outcome {
            Outcome::Loaded { result, duration } => {
                self.load_in_flight = false;
                self.on_loaded(result, duration)
            }
            Outcome::Played(result) => {
                match &result {
                    Ok(()) => self.bus.publish(PlaybackEvent::Played),
                    Err(_) => self.resync_is_playing(),
                }
                result
            }
            Outcome::Paused(result) => {
                match &result {
                    Ok(()) => self.bus.publish(PlaybackEvent::Paused),
                    Err(_) => self.resync_is_playing(),
                }
                result
            }
            Outcome::Stopped(result) => {
                if result.is_ok() {
                    self.content_loaded = false;
                    self.bus.publish(PlaybackEvent::Stopped);
                }
                result
            }
            Outcome::Seeked(result) => {
                if result.is_ok() {
                    // The module emits progress at the clamped position
                    // before resolving, so the snapshot already holds it.
                    let position_secs = self.writer.snapshot().elapsed_time;
                    self.bus.publish(PlaybackEvent::Seeked { position_secs });
                }
                result
            }
        };

        let result = result.map_err(|error| self.fail(operation, error));
        respond(reply, result);
    }

    fn on_loaded(&mut self, result: Result<()>, duration: Option<Result<f64>>) -> Result<()> {
        result?;
        self.content_loaded = true;
        match duration {
            Some(Ok(total)) => {
                self.writer
                    .update(&SnapshotPatch::new().total_duration(total));
                let title = self
                    .writer
                    .snapshot()
                    .current_track
                    .map(|track| track.title)
                    .unwrap_or_default();
                info!(%title, total_duration_secs = total, "Track ready");
                self.bus.publish(PlaybackEvent::Ready {
                    title,
                    total_duration_secs: total,
                });
            }
            Some(Err(error)) => {
                self.fail("getTotalDuration", error);
            }
            None => {}
        }
        Ok(())
    }

    fn resync_is_playing(&self) {
        let playing = self.writer.snapshot().state == PlayerState::Playing;
        self.writer.update(&SnapshotPatch::new().is_playing(playing));
    }

    fn reject(&self, reply: Option<Reply>, operation: &str, error: PlaybackError) {
        let error = self.fail(operation, error);
        respond(reply, Err(error));
    }

    fn fail(&self, operation: &str, error: PlaybackError) -> PlaybackError {
        warn!(operation, kind = error.kind(), error = %error, "Playback command failed");
        self.bus.publish(PlaybackEvent::Error {
            operation: operation.to_string(),
            kind: error.kind().to_string(),
            message: error.message().to_string(),
        });
        error
    }

    async fn teardown(self, listener_id: ListenerId) {
        self.adapter.remove_listener(listener_id);
        self.writer.bind_controls(None);
        self.writer.reset_playback();
        if let Err(err) = self.adapter.release().await {
            warn!(error = %err, "Failed to release audio module");
        }
        let _ = self.bus.emit(CoreEvent::Lifecycle(LifecycleEvent::Shutdown));
        info!("Reconciler shut down");
    }
}

/// Native states after which the item has to be loaded again.
fn unloads_content(native: &str) -> bool {
    [PlayerState::Idle, PlayerState::Stopped, PlayerState::Error]
        .iter()
        .any(|state| state.as_str() == native)
}

fn respond(reply: Option<Reply>, result: Result<()>) {
    if let Some(reply) = reply {
        let _ = reply.send(result);
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Owner handle of a running reconciler.
///
/// Dropping the handle stops the reconciler without waiting for it.
pub struct ReconcilerHandle {
    inbox: mpsc::UnboundedSender<Message>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReconcilerHandle {
    /// Stops the loop, unsubscribes from the audio module and releases it.
    ///
    /// Idempotent: later calls return `Ok` immediately. Commands still
    /// waiting for a reply fail with [`PlaybackError::ShutDown`].
    pub async fn shutdown(&self) -> Result<()> {
        let task = self.task.lock().take();
        let Some(task) = task else {
            return Ok(());
        };
        let _ = self.inbox.send(Message::Shutdown);
        task.await
            .map_err(|err| PlaybackError::Unknown(format!("reconciler task failed: {}", err)))
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }
}

impl Drop for ReconcilerHandle {
    fn drop(&mut self) {
        if self.task.get_mut().take().is_some() {
            let _ = self.inbox.send(Message::Shutdown);
        }
    }
}

impl fmt::Debug for ReconcilerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcilerHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
