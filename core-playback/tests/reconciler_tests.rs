//! Reconciler behaviour against a scripted audio module.
//!
//! The scripted module follows the native contract: it emits `LOADED`
//! before resolving `load_content`, clamps seeks, and ignores play/pause
//! requests that would not change anything.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{
    AudioEventListener, AudioModule, EventEmitter, HostPlatform, ListenerId, MediaPlayerInfo,
    NativeAudioEvent,
};
use core_async::time::{timeout, Duration};
use core_playback::{
    ControlBundle, PlaybackError, PlayerState, PlayerStateSnapshot, PlayerStore, Reconciler,
    ReconcilerHandle, Track,
};
use core_runtime::events::{CoreEvent, EventBus, EventStream, LifecycleEvent, PlaybackEvent};
use mockall::mock;
use parking_lot::Mutex;
use std::sync::Arc;

const WAIT: Duration = Duration::from_secs(2);

// ============================================================================
// Scripted module
// ============================================================================

#[derive(Default)]
struct ScriptState {
    loaded: bool,
    playing: bool,
    released: usize,
    calls: Vec<String>,
    media_info: Option<MediaPlayerInfo>,
}

struct ScriptedModule {
    emitter: EventEmitter,
    duration: Mutex<BridgeResult<f64>>,
    load_error: Mutex<Option<String>>,
    state: Mutex<ScriptState>,
}

impl ScriptedModule {
    fn new(duration: f64) -> Arc<Self> {
        Arc::new(Self {
            emitter: EventEmitter::new(),
            duration: Mutex::new(Ok(duration)),
            load_error: Mutex::new(None),
            state: Mutex::new(ScriptState::default()),
        })
    }

    fn failing_load(message: &str) -> Arc<Self> {
        let module = Self::new(60.0);
        *module.load_error.lock() = Some(message.to_string());
        module
    }

    fn unknown_duration() -> Arc<Self> {
        let module = Self::new(0.0);
        *module.duration.lock() = Err(BridgeError::NotReady("duration unknown".to_string()));
        module
    }

    fn emit(&self, event: NativeAudioEvent) {
        self.emitter.emit(event);
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(call)).count()
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl AudioModule for ScriptedModule {
    fn platform(&self) -> HostPlatform {
        HostPlatform::Other
    }

    async fn load_content(&self, url: String) -> BridgeResult<()> {
        self.record(format!("load:{url}"));
        let failure = self.load_error.lock().clone();
        if let Some(message) = failure {
            self.emit(NativeAudioEvent::error(message.clone()));
            return Err(BridgeError::NativeFailure(message));
        }
        {
            let mut state = self.state.lock();
            state.loaded = true;
            state.playing = false;
        }
        self.emit(NativeAudioEvent::state("BUFFERING"));
        self.emit(NativeAudioEvent::state("LOADED"));
        Ok(())
    }

    async fn set_media_player_info(&self, info: MediaPlayerInfo) -> BridgeResult<()> {
        self.state.lock().media_info = Some(info);
        Ok(())
    }

    async fn play_audio(&self) -> BridgeResult<()> {
        self.record("play".to_string());
        {
            let mut state = self.state.lock();
            if !state.loaded {
                return Err(BridgeError::NotReady("no content loaded".to_string()));
            }
            if state.playing {
                return Ok(());
            }
            state.playing = true;
        }
        self.emit(NativeAudioEvent::state("PLAYING"));
        Ok(())
    }

    async fn pause_audio(&self) -> BridgeResult<()> {
        self.record("pause".to_string());
        {
            let mut state = self.state.lock();
            if !state.playing {
                return Ok(());
            }
            state.playing = false;
        }
        self.emit(NativeAudioEvent::state("PAUSED"));
        Ok(())
    }

    async fn stop_audio(&self) -> BridgeResult<()> {
        self.record("stop".to_string());
        {
            let mut state = self.state.lock();
            if !state.loaded {
                return Ok(());
            }
            state.loaded = false;
            state.playing = false;
        }
        self.emit(NativeAudioEvent::state("STOPPED"));
        Ok(())
    }

    async fn seek(&self, time_in_seconds: f64) -> BridgeResult<()> {
        let total = self.get_total_duration().await?;
        let target = time_in_seconds.clamp(0.0, total);
        self.record(format!("seek:{target}"));
        self.emit(NativeAudioEvent::progress(target, total));
        Ok(())
    }

    async fn get_total_duration(&self) -> BridgeResult<f64> {
        if !self.state.lock().loaded {
            return Err(BridgeError::NotReady("no content loaded".to_string()));
        }
        self.duration.lock().clone()
    }

    fn add_listener(&self, listener: Arc<dyn AudioEventListener>) -> ListenerId {
        self.emitter.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.emitter.remove_listener(id)
    }

    async fn release(&self) -> BridgeResult<()> {
        self.state.lock().released += 1;
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: PlayerStore,
    bus: EventBus,
    handle: ReconcilerHandle,
}

fn start(module: Arc<dyn AudioModule>) -> Harness {
    let (store, writer) = PlayerStore::new();
    let bus = EventBus::new(64);
    let handle = Reconciler::spawn(module, writer, &store, bus.clone());
    Harness { store, bus, handle }
}

impl Harness {
    async fn wait_until<F>(&self, mut predicate: F) -> PlayerStateSnapshot
    where
        F: FnMut(&PlayerStateSnapshot) -> bool,
    {
        let mut snapshots = self.store.subscribe();
        let result = timeout(WAIT, snapshots.wait_for(|s| predicate(s))).await;
        let snapshot = result
            .expect("timed out waiting for snapshot")
            .expect("store closed")
            .clone();
        snapshot
    }

    async fn select(&self, track: Track) -> ControlBundle {
        let title = track.title.clone();
        self.store.set_track(Some(track));
        self.wait_until(|s| s.current_track.as_ref().map(|t| t.title.as_str()) == Some(&*title))
            .await;
        self.store.controls().expect("controls bound with the track")
    }

    async fn select_loaded(&self, track: Track) -> ControlBundle {
        let controls = self.select(track).await;
        self.wait_until(|s| s.state == PlayerState::Loaded && s.total_duration > 0.0)
            .await;
        controls
    }
}

async fn next_matching<F>(events: &mut EventStream, mut predicate: F) -> PlaybackEvent
where
    F: FnMut(&PlaybackEvent) -> bool,
{
    timeout(WAIT, async {
        loop {
            if let CoreEvent::Playback(event) = events.recv().await.expect("bus closed") {
                if predicate(&event) {
                    return event;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

fn track_a() -> Track {
    Track::new("A", "http://x/a.mp3")
}

// ============================================================================
// Loading
// ============================================================================

#[core_async::test]
async fn selecting_a_track_loads_it_and_stores_duration() {
    let module = ScriptedModule::new(245.0);
    let harness = start(module.clone());
    let mut events = harness.bus.stream();

    harness.select_loaded(track_a()).await;

    let snapshot = harness.store.snapshot();
    assert_eq!(snapshot.state, PlayerState::Loaded);
    assert_eq!(snapshot.current_track.unwrap().title, "A");
    assert_eq!(snapshot.total_duration, 245.0);
    assert!(!snapshot.is_playing);
    assert_eq!(module.calls(), vec!["load:http://x/a.mp3"]);

    let ready = next_matching(&mut events, |e| matches!(e, PlaybackEvent::Ready { .. })).await;
    assert_eq!(
        ready,
        PlaybackEvent::Ready {
            title: "A".to_string(),
            total_duration_secs: 245.0
        }
    );
}

#[core_async::test]
async fn load_content_is_a_no_op_when_loaded() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;

    controls.load_content().await.unwrap();
    controls.load_content().await.unwrap();

    assert_eq!(module.count("load:"), 1);
}

#[core_async::test]
async fn load_failure_surfaces_native_message() {
    let module = ScriptedModule::failing_load("Source error: 404");
    let harness = start(module.clone());
    let mut errors = harness.bus.stream();

    let controls = harness.select(track_a()).await;
    let snapshot = harness.wait_until(|s| s.state == PlayerState::Error).await;
    assert!(!snapshot.is_playing);

    let native = next_matching(&mut errors, |e| matches!(e, PlaybackEvent::Error { .. })).await;
    assert_eq!(
        native,
        PlaybackEvent::Error {
            operation: "native".to_string(),
            kind: "NativeFailure".to_string(),
            message: "Source error: 404".to_string(),
        }
    );

    // Retrying from ERROR goes back to the module and fails the same way.
    let err = controls.load_content().await.unwrap_err();
    assert_eq!(err, PlaybackError::NativeFailure("Source error: 404".to_string()));
    assert_eq!(module.count("load:"), 2);
}

#[core_async::test]
async fn duration_failure_does_not_fail_the_load() {
    let harness = start(ScriptedModule::unknown_duration());
    let mut errors = harness
        .bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Playback(PlaybackEvent::Error { .. })));

    harness.select(track_a()).await;
    let snapshot = harness.wait_until(|s| s.state == PlayerState::Loaded).await;
    assert_eq!(snapshot.total_duration, 0.0);

    match timeout(WAIT, errors.recv()).await.unwrap().unwrap() {
        CoreEvent::Playback(PlaybackEvent::Error { operation, kind, .. }) => {
            assert_eq!(operation, "getTotalDuration");
            assert_eq!(kind, "NotReady");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[core_async::test]
async fn blank_url_is_rejected_without_native_call() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());

    let controls = harness.select(Track::new("Blank", "   ")).await;
    let err = controls.load_content().await.unwrap_err();

    assert!(matches!(err, PlaybackError::InvalidArgument(_)));
    assert_eq!(module.count("load:"), 0);
    assert_eq!(harness.store.snapshot().state, PlayerState::Idle);
}

// ============================================================================
// Native events
// ============================================================================

#[core_async::test]
async fn progress_event_updates_elapsed_and_percentage() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    harness.select_loaded(track_a()).await;

    module.emit(NativeAudioEvent::Progress {
        current_time: 30.0,
        progress: 0.5,
        total_duration: 60.0,
    });

    let snapshot = harness.wait_until(|s| s.elapsed_time == 30.0).await;
    assert_eq!(snapshot.progress, 50.0);
    assert_eq!(snapshot.total_duration, 60.0);
}

#[core_async::test]
async fn progress_percentage_is_exactly_fraction_times_hundred() {
    let module = ScriptedModule::new(90.0);
    let harness = start(module.clone());
    harness.select_loaded(track_a()).await;

    for (step, fraction) in [0.0, 0.1, 1.0 / 3.0, 0.7, 0.999, 1.0].into_iter().enumerate() {
        let current_time = step as f64 + 1.0;
        module.emit(NativeAudioEvent::Progress {
            current_time,
            progress: fraction,
            total_duration: 90.0,
        });
        let snapshot = harness.wait_until(|s| s.elapsed_time == current_time).await;
        assert_eq!(snapshot.progress, fraction * 100.0);
    }
}

#[core_async::test]
async fn unknown_native_states_fall_back_to_idle() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;
    controls.play().await.unwrap();

    module.emit(NativeAudioEvent::state("BUFFERING"));
    let snapshot = harness.wait_until(|s| s.state == PlayerState::Idle).await;
    assert!(!snapshot.is_playing);

    module.emit(NativeAudioEvent::state("PLAYING"));
    let snapshot = harness.wait_until(|s| s.state == PlayerState::Playing).await;
    assert!(snapshot.is_playing);
}

#[core_async::test]
async fn unrecognised_state_does_not_unload_content() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;
    controls.play().await.unwrap();
    controls.pause().await.unwrap();

    module.emit(NativeAudioEvent::state("BUFFERING"));
    harness.wait_until(|s| s.state == PlayerState::Idle).await;
    controls.load_content().await.unwrap();
    assert_eq!(module.count("load:"), 1);

    module.emit(NativeAudioEvent::state("IDLE"));
    controls.load_content().await.unwrap();
    assert_eq!(module.count("load:"), 2);
}

#[core_async::test]
async fn native_events_without_a_track_are_ignored() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let mut states = harness.bus.stream().filter(|e| {
        matches!(e, CoreEvent::Playback(PlaybackEvent::StateChanged { .. }))
    });

    module.emit(NativeAudioEvent::state("PLAYING"));
    module.emit(NativeAudioEvent::progress(5.0, 10.0));
    core_async::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.store.snapshot(), PlayerStateSnapshot::default());

    harness.select_loaded(track_a()).await;
    match timeout(WAIT, states.recv()).await.unwrap().unwrap() {
        CoreEvent::Playback(PlaybackEvent::StateChanged { state, previous }) => {
            assert_eq!(previous, "IDLE");
            assert_eq!(state, "LOADED");
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Commands
// ============================================================================

#[core_async::test]
async fn play_pushes_media_info_and_publishes() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let mut played = harness
        .bus
        .stream()
        .filter(|e| *e == CoreEvent::Playback(PlaybackEvent::Played));
    let controls = harness
        .select_loaded(track_a().with_artist("Band").with_album("First"))
        .await;

    controls.play().await.unwrap();

    let snapshot = harness.store.snapshot();
    assert_eq!(snapshot.state, PlayerState::Playing);
    assert!(snapshot.is_playing);
    let info = module.state.lock().media_info.clone().unwrap();
    assert_eq!(info, MediaPlayerInfo::new("A").with_artist("Band").with_album("First"));
    assert!(timeout(WAIT, played.recv()).await.is_ok());
}

#[core_async::test]
async fn pausing_twice_stays_paused() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;
    controls.play().await.unwrap();

    controls.pause().await.unwrap();
    assert_eq!(harness.store.snapshot().state, PlayerState::Paused);

    controls.pause().await.unwrap();
    let snapshot = harness.store.snapshot();
    assert_eq!(snapshot.state, PlayerState::Paused);
    assert!(!snapshot.is_playing);
}

#[core_async::test]
async fn play_before_load_is_not_ready_and_rolls_back() {
    let module = ScriptedModule::failing_load("decoder init failed");
    let harness = start(module.clone());
    let controls = harness.select(track_a()).await;
    harness.wait_until(|s| s.state == PlayerState::Error).await;

    let err = controls.play().await.unwrap_err();

    assert!(matches!(err, PlaybackError::NotReady(_)));
    let snapshot = harness.store.snapshot();
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.state, PlayerState::Error);
}

#[core_async::test]
async fn seek_reports_clamped_position() {
    let module = ScriptedModule::new(100.0);
    let harness = start(module.clone());
    let mut seeks = harness
        .bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Playback(PlaybackEvent::Seeked { .. })));
    let controls = harness.select_loaded(track_a()).await;

    controls.seek(140.0).await.unwrap();
    controls.seek(-5.0).await.unwrap();

    assert_eq!(
        timeout(WAIT, seeks.recv()).await.unwrap().unwrap(),
        CoreEvent::Playback(PlaybackEvent::Seeked { position_secs: 100.0 })
    );
    assert_eq!(
        timeout(WAIT, seeks.recv()).await.unwrap().unwrap(),
        CoreEvent::Playback(PlaybackEvent::Seeked { position_secs: 0.0 })
    );
    assert_eq!(module.calls()[1..], ["seek:100", "seek:0"]);
}

#[core_async::test]
async fn non_finite_seek_is_invalid() {
    let module = ScriptedModule::new(100.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;

    for position in [f64::NAN, f64::INFINITY] {
        let err = controls.seek(position).await.unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidArgument(_)));
    }
    assert_eq!(module.count("seek"), 0);
}

#[core_async::test]
async fn stop_resets_playback_but_keeps_track() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;
    controls.play().await.unwrap();
    module.emit(NativeAudioEvent::progress(20.0, 60.0));
    harness.wait_until(|s| s.elapsed_time == 20.0).await;

    controls.stop().await.unwrap();

    let snapshot = harness.store.snapshot();
    assert_eq!(snapshot.state, PlayerState::Stopped);
    assert_eq!(snapshot.elapsed_time, 0.0);
    assert_eq!(snapshot.progress, 0.0);
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.current_track, Some(track_a()));

    // Stopped content can be loaded again.
    controls.load_content().await.unwrap();
    assert_eq!(module.count("load:"), 2);
}

#[core_async::test]
async fn toggle_repeat_flips_and_publishes() {
    let harness = start(ScriptedModule::new(60.0));
    let mut toggles = harness
        .bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Playback(PlaybackEvent::RepeatToggled { .. })));
    let controls = harness.select_loaded(track_a()).await;

    controls.toggle_repeat().await.unwrap();
    assert!(harness.store.snapshot().repeat);
    controls.toggle_repeat().await.unwrap();
    assert!(!harness.store.snapshot().repeat);

    for expected in [true, false] {
        assert_eq!(
            timeout(WAIT, toggles.recv()).await.unwrap().unwrap(),
            CoreEvent::Playback(PlaybackEvent::RepeatToggled { repeat: expected })
        );
    }
}

// ============================================================================
// Track lifecycle
// ============================================================================

#[core_async::test]
async fn clearing_the_track_invalidates_controls() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let controls = harness.select_loaded(track_a()).await;

    harness.store.set_track(None);
    harness.wait_until(|s| s.current_track.is_none()).await;

    assert_eq!(harness.store.snapshot(), PlayerStateSnapshot::default());
    assert!(harness.store.controls().is_none());
    for _ in 0..2 {
        let err = controls.load_content().await.unwrap_err();
        assert!(matches!(err, PlaybackError::InvalidArgument(_)));
    }

    // The loaded content was stopped on the module.
    timeout(WAIT, async {
        while module.count("stop") == 0 {
            core_async::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    let fresh = harness.select_loaded(Track::new("B", "http://x/b.mp3")).await;
    assert!(fresh.generation() > controls.generation());
    fresh.play().await.unwrap();
}

#[core_async::test]
async fn switching_tracks_rebinds_controls_once() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let first = harness.select_loaded(track_a()).await;

    assert!(!harness.store.set_track(Some(track_a())));
    assert_eq!(
        harness.store.controls().map(|c| c.generation()),
        Some(first.generation())
    );

    let second = harness.select_loaded(Track::new("B", "http://x/b.mp3")).await;
    assert_ne!(second.generation(), first.generation());
    assert!(matches!(
        first.play().await,
        Err(PlaybackError::InvalidArgument(_))
    ));
    assert_eq!(module.calls(), vec!["load:http://x/a.mp3", "load:http://x/b.mp3"]);
}

#[core_async::test]
async fn track_selected_before_spawn_is_loaded() {
    let module = ScriptedModule::new(30.0);
    let (store, writer) = PlayerStore::new();
    store.set_track(Some(track_a()));

    let handle = Reconciler::spawn(module.clone(), writer, &store, EventBus::default());
    let mut snapshots = store.subscribe();
    timeout(WAIT, snapshots.wait_for(|s| s.state == PlayerState::Loaded))
        .await
        .unwrap()
        .unwrap();

    handle.shutdown().await.unwrap();
}

#[core_async::test]
async fn shutdown_is_idempotent_and_releases_once() {
    let module = ScriptedModule::new(60.0);
    let harness = start(module.clone());
    let mut lifecycle = harness
        .bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Lifecycle(_)));
    let controls = harness.select_loaded(track_a()).await;

    harness.handle.shutdown().await.unwrap();
    harness.handle.shutdown().await.unwrap();

    assert!(!harness.handle.is_running());
    assert_eq!(module.state.lock().released, 1);
    assert_eq!(module.emitter.listener_count(), 0);
    assert!(harness.store.controls().is_none());
    assert_eq!(controls.play().await, Err(PlaybackError::ShutDown));
    assert_eq!(
        lifecycle.try_recv().unwrap().unwrap(),
        CoreEvent::Lifecycle(LifecycleEvent::Shutdown)
    );
}

// ============================================================================
// Failure paths with mockall
// ============================================================================

mock! {
    Audio {}

    #[async_trait]
    impl AudioModule for Audio {
        fn platform(&self) -> HostPlatform;
        async fn load_content(&self, url: String) -> BridgeResult<()>;
        async fn set_media_player_info(&self, info: MediaPlayerInfo) -> BridgeResult<()>;
        async fn play_audio(&self) -> BridgeResult<()>;
        async fn pause_audio(&self) -> BridgeResult<()>;
        async fn stop_audio(&self) -> BridgeResult<()>;
        async fn seek(&self, time_in_seconds: f64) -> BridgeResult<()>;
        async fn get_total_duration(&self) -> BridgeResult<f64>;
        fn add_listener(&self, listener: Arc<dyn AudioEventListener>) -> ListenerId;
        fn remove_listener(&self, id: ListenerId) -> bool;
        async fn release(&self) -> BridgeResult<()>;
    }
}

/// Mock whose listener slot is captured so the test can emit events.
fn mock_with_listener() -> (MockAudio, Arc<Mutex<Option<Arc<dyn AudioEventListener>>>>) {
    let slot: Arc<Mutex<Option<Arc<dyn AudioEventListener>>>> = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&slot);

    let mut module = MockAudio::new();
    module.expect_platform().return_const(HostPlatform::Android);
    module.expect_add_listener().times(1).returning(move |listener| {
        *captured.lock() = Some(listener);
        ListenerId::new()
    });
    module.expect_remove_listener().returning(|_| true);
    module.expect_release().times(1).returning(|| Ok(()));
    (module, slot)
}

#[core_async::test]
async fn failed_play_rolls_back_optimistic_flag() {
    let (mut module, listener) = mock_with_listener();
    let slot = Arc::clone(&listener);
    module.expect_load_content().times(1).returning(move |_| {
        if let Some(listener) = slot.lock().clone() {
            listener.on_event(NativeAudioEvent::state("LOADED"));
        }
        Ok(())
    });
    module.expect_get_total_duration().returning(|| Ok(42.0));
    module
        .expect_play_audio()
        .times(1)
        .returning(|| Err(BridgeError::NativeFailure("AudioFocus denied".to_string())));
    module.expect_set_media_player_info().never();

    let harness = start(Arc::new(module));
    let mut errors = harness
        .bus
        .stream()
        .filter(|e| matches!(e, CoreEvent::Playback(PlaybackEvent::Error { .. })));
    let controls = harness.select_loaded(track_a()).await;

    let err = controls.play().await.unwrap_err();

    assert_eq!(err, PlaybackError::NativeFailure("AudioFocus denied".to_string()));
    let snapshot = harness.store.snapshot();
    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.state, PlayerState::Loaded);
    assert_eq!(
        timeout(WAIT, errors.recv()).await.unwrap().unwrap(),
        CoreEvent::Playback(PlaybackEvent::Error {
            operation: "play".to_string(),
            kind: "NativeFailure".to_string(),
            message: "AudioFocus denied".to_string(),
        })
    );

    harness.handle.shutdown().await.unwrap();
}

#[core_async::test]
async fn failed_pause_resyncs_with_canonical_state() {
    let (mut module, listener) = mock_with_listener();
    let on_load = Arc::clone(&listener);
    let on_play = Arc::clone(&listener);
    module.expect_load_content().returning(move |_| {
        if let Some(listener) = on_load.lock().clone() {
            listener.on_event(NativeAudioEvent::state("LOADED"));
        }
        Ok(())
    });
    module.expect_get_total_duration().returning(|| Ok(42.0));
    module.expect_play_audio().returning(move || {
        if let Some(listener) = on_play.lock().clone() {
            listener.on_event(NativeAudioEvent::state("PLAYING"));
        }
        Ok(())
    });
    module.expect_set_media_player_info().returning(|_| Ok(()));
    module
        .expect_pause_audio()
        .returning(|| Err(BridgeError::Unknown("binder died".to_string())));

    let harness = start(Arc::new(module));
    let controls = harness.select_loaded(track_a()).await;
    controls.play().await.unwrap();

    let err = controls.pause().await.unwrap_err();

    assert_eq!(err.kind(), "Unknown");
    let snapshot = harness.store.snapshot();
    assert_eq!(snapshot.state, PlayerState::Playing);
    assert!(snapshot.is_playing);

    harness.handle.shutdown().await.unwrap();
}
