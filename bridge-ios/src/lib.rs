//! # iOS Audio Bridge
//!
//! [`IosAudioModule`] implements `bridge_traits::AudioModule` on top of an
//! [`AvPlayerHandle`] supplied by the host's Objective-C/Swift glue.
//!
//! ## Wiring
//!
//! - KVO on `AVPlayerItem.status` → [`IosAudioModule::on_item_status_changed`]
//! - KVO on `AVPlayer.timeControlStatus` →
//!   [`IosAudioModule::on_time_control_status_changed`]
//! - `AVPlayerItemDidPlayToEndTime` → [`IosAudioModule::on_did_play_to_end`]
//! - `MPRemoteCommandCenter` handlers → [`IosAudioModule::handle_remote_command`]
//!
//! AVPlayer has no stop. `stop_audio` pauses and rewinds to zero, and the
//! item stays loaded.

mod avplayer;
mod module;

pub use avplayer::{AvItemStatus, AvPlayerHandle, AvTimeControlStatus, RemoteCommand};
pub use module::{IosAudioModule, DEFAULT_PROGRESS_INTERVAL};
