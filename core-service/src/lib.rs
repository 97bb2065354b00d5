//! Player service façade and headless presentation models.
//!
//! [`PlayerService`] is the provider of one playback session. Hosts build
//! it from a [`PlayerConfig`] and the native player they own, then create
//! [`AudioPlayer`] and [`MiniPlayer`] models that all observe the same
//! store.
//!
//! ```no_run
//! # async fn example(module: std::sync::Arc<dyn bridge_traits::AudioModule>) -> core_service::Result<()> {
//! use core_service::{AudioPlayerProps, PlayerAction, PlayerConfig, PlayerService, Track};
//!
//! let service = PlayerService::with_module(PlayerConfig::default(), module)?;
//! let player = service.audio_player(
//!     AudioPlayerProps::new(Track::new("Intro", "https://cdn.example.com/intro.mp3"))
//!         .auto_play(true),
//! );
//! player.mount();
//! player.press(PlayerAction::PlayPause).await?;
//! let view = player.render();
//! println!("{} / {}", view.duration.as_ref().unwrap().elapsed, view.duration.as_ref().unwrap().total);
//! service.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The `android` and `ios` features (both on by default) enable the
//! matching [`AudioBackend`] variants.

pub mod backend;
pub mod components;
pub mod error;
pub mod service;

pub use backend::{AudioBackend, NativeModule};
pub use components::{
    format_time, AudioPlayer, AudioPlayerProps, ButtonView, DurationView, HostCallback,
    IconLayout, IconSet, IconSlot, MiniPlayer, MiniPlayerProps, PlayerAction, PlayerView,
    TrackView,
};
pub use error::{CoreError, Result};
pub use service::PlayerService;

pub use core_playback::{
    ControlBundle, PlaybackError, PlayerState, PlayerStateSnapshot, PlayerStore, Track,
};
pub use core_runtime::config::PlayerConfig;
pub use core_runtime::events::{CoreEvent, EventStream, LifecycleEvent, PlaybackEvent};
