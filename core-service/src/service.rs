use bridge_traits::HostPlatform;
use core_playback::{
    ControlBundle, PlayerStateSnapshot, PlayerStore, Reconciler, ReconcilerHandle, SnapshotPatch,
    Track,
};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{EventBus, EventStream};
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::backend::{AudioBackend, NativeModule};
use crate::components::{AudioPlayer, AudioPlayerProps, MiniPlayer, MiniPlayerProps};
use crate::error::Result;

/// Provider of one shared playback session.
///
/// Owns the store, the event bus and the reconciler. Presentation models
/// created from the service all observe the same session. Cloning is
/// cheap and every clone refers to the same session.
#[derive(Clone)]
pub struct PlayerService {
    inner: Arc<Inner>,
}

struct Inner {
    config: PlayerConfig,
    module: NativeModule,
    store: PlayerStore,
    bus: EventBus,
    reconciler: ReconcilerHandle,
}

impl PlayerService {
    /// Validates `config`, builds the audio module for `backend` and
    /// starts the reconciler.
    ///
    /// # Errors
    ///
    /// `Runtime` for an invalid configuration or a host platform without a
    /// native audio module, `CapabilityMissing` when the backend does not
    /// match the host platform.
    ///
    /// # Panics
    ///
    /// Panics when called outside a runtime.
    pub fn new(config: PlayerConfig, backend: AudioBackend) -> Result<Self> {
        config.validate()?;
        let module = backend.into_module(&config)?;

        let (store, writer) = PlayerStore::new();
        if config.repeat {
            writer.update(&SnapshotPatch::new().repeat(true));
        }

        let bus = EventBus::new(config.event_buffer_size);
        let reconciler =
            Reconciler::spawn(module.as_audio_module(), writer, &store, bus.clone());
        info!(platform = %module.platform(), "Player service started");

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                module,
                store,
                bus,
                reconciler,
            }),
        })
    }

    /// Service over a ready-made audio module.
    pub fn with_module(
        config: PlayerConfig,
        module: Arc<dyn bridge_traits::AudioModule>,
    ) -> Result<Self> {
        Self::new(config, AudioBackend::Custom(module))
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.inner.config
    }

    pub fn platform(&self) -> HostPlatform {
        self.inner.module.platform()
    }

    /// Module the session runs on. Hosts forward native player callbacks
    /// to it.
    pub fn native_module(&self) -> &NativeModule {
        &self.inner.module
    }

    pub fn store(&self) -> PlayerStore {
        self.inner.store.clone()
    }

    pub fn event_bus(&self) -> EventBus {
        self.inner.bus.clone()
    }

    /// New stream of playback and lifecycle events.
    pub fn events(&self) -> EventStream {
        self.inner.bus.stream()
    }

    pub fn snapshot(&self) -> PlayerStateSnapshot {
        self.inner.store.snapshot()
    }

    /// Selects a track, or clears the selection with `None`.
    pub fn set_track(&self, track: Option<Track>) -> bool {
        self.inner.store.set_track(track)
    }

    pub fn controls(&self) -> Option<ControlBundle> {
        self.inner.store.controls()
    }

    pub fn audio_player(&self, props: AudioPlayerProps) -> AudioPlayer {
        AudioPlayer::new(self.store(), props)
    }

    pub fn mini_player(&self, props: MiniPlayerProps) -> MiniPlayer {
        MiniPlayer::new(self.store(), props)
    }

    /// Stops the reconciler and releases the native player. Idempotent.
    pub async fn shutdown(&self) -> Result<()> {
        self.inner.reconciler.shutdown().await?;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.inner.reconciler.is_running()
    }
}

impl fmt::Debug for PlayerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerService")
            .field("module", &self.inner.module)
            .field("config", &self.inner.config)
            .field("store", &self.inner.store)
            .finish()
    }
}
