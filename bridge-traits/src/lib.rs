//! # Host Bridge Traits
//!
//! Contract between the player core and the platform audio bridges.
//!
//! ## Overview
//!
//! Each host platform ships a native audio module that drives its media
//! engine and reports back through two event channels:
//!
//! - `onAudioStateChange { state, message? }` for transitions
//! - `onAudioProgress { currentTime, progress, totalDuration }` about once
//!   per second while playing
//!
//! The core never assumes a command's completion implies a state change.
//! State comes from events only.
//!
//! ## Traits
//!
//! - [`AudioModule`](playback::AudioModule): command surface of a native
//!   audio module
//! - [`AudioEventListener`](emitter::AudioEventListener): event receiver
//! - [`LoggerSink`](logging::LoggerSink): forwards structured logs to
//!   Logcat / OSLog
//!
//! ## Shared building blocks
//!
//! - [`EventEmitter`](emitter::EventEmitter): listener registry every
//!   module uses to fan out events
//! - [`ProgressTicker`](progress::ProgressTicker): periodic progress task
//!
//! ## Platform Implementations
//!
//! | Platform | Implementation Crate | Native engine |
//! |----------|---------------------|---------------|
//! | Android  | `bridge-android`    | ExoPlayer     |
//! | iOS      | `bridge-ios`        | AVPlayer      |
//!
//! ## Error Handling
//!
//! Every command returns [`BridgeError`](error::BridgeError). Native error
//! messages are passed through verbatim in `NativeFailure`.

pub mod emitter;
pub mod error;
pub mod logging;
pub mod platform;
pub mod playback;
pub mod progress;

pub use error::BridgeError;

pub use emitter::{AudioEventListener, EventEmitter, ListenerId};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use platform::{HostPlatform, PlatformSend, PlatformSendSync};
pub use playback::{
    native_state, AudioModule, MediaPlayerInfo, NativeAudioEvent, AUDIO_PROGRESS_EVENT,
    AUDIO_STATE_CHANGE_EVENT,
};
pub use progress::{ProgressSample, ProgressTicker};
