//! # Player Configuration
//!
//! Settings for the playback core: progress cadence, seek step, event bus
//! capacity and the auto-play / repeat defaults.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//! use std::time::Duration;
//!
//! let config = PlayerConfig::builder()
//!     .progress_interval(Duration::from_millis(500))
//!     .seek_interval_secs(10.0)
//!     .auto_play(true)
//!     .build()
//!     .expect("valid config");
//!
//! assert!(config.auto_play);
//! ```
//!
//! Hosts can also hand over JSON. Missing fields take their defaults:
//!
//! ```
//! use core_runtime::config::PlayerConfig;
//!
//! let config = PlayerConfig::from_json(r#"{ "platform": "ios", "repeat": true }"#).unwrap();
//! assert!(config.repeat);
//! assert_eq!(config.seek_interval_secs, 3.0);
//! ```
//!
//! ## Error Handling
//!
//! Out-of-range values fail validation with [`Error::Config`]. Resolving a
//! platform on a host without a native audio bridge fails with
//! [`Error::CapabilityMissing`]:
//!
//! ```should_panic
//! use bridge_traits::HostPlatform;
//! use core_runtime::config::PlayerConfig;
//!
//! PlayerConfig::builder()
//!     .platform(HostPlatform::Other)
//!     .build()
//!     .unwrap()
//!     .resolve_platform()
//!     .expect("no native audio on this host");
//! ```

use crate::error::{Error, Result};
use bridge_traits::HostPlatform;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_SEEK_INTERVAL_SECS: f64 = 3.0;
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = crate::events::DEFAULT_EVENT_BUFFER_SIZE;

const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);
const MAX_PROGRESS_INTERVAL: Duration = Duration::from_secs(60);

/// Playback core configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Forces a platform instead of detecting the compile target.
    #[serde(default)]
    pub platform: Option<HostPlatform>,

    /// Cadence of native progress events while playing.
    #[serde(
        default = "default_progress_interval",
        rename = "progressIntervalMs",
        with = "duration_millis"
    )]
    pub progress_interval: Duration,

    /// Step used by the seek-forward and seek-back buttons.
    #[serde(default = "default_seek_interval_secs")]
    pub seek_interval_secs: f64,

    /// Per-subscriber buffer of the event bus.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Start playback as soon as a track is loaded.
    #[serde(default)]
    pub auto_play: bool,

    /// Initial repeat flag.
    #[serde(default)]
    pub repeat: bool,
}

fn default_progress_interval() -> Duration {
    DEFAULT_PROGRESS_INTERVAL
}

fn default_seek_interval_secs() -> f64 {
    DEFAULT_SEEK_INTERVAL_SECS
}

fn default_event_buffer_size() -> usize {
    DEFAULT_EVENT_BUFFER_SIZE
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            platform: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seek_interval_secs: DEFAULT_SEEK_INTERVAL_SECS,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            auto_play: false,
            repeat: false,
        }
    }
}

impl PlayerConfig {
    pub fn builder() -> PlayerConfigBuilder {
        PlayerConfigBuilder::default()
    }

    /// Parses and validates a host-supplied JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid player config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Progress interval lies between 100 ms and 60 s
    /// - Seek interval is finite and positive
    /// - Event buffer holds at least one event
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval < MIN_PROGRESS_INTERVAL {
            return Err(Error::Config(format!(
                "Progress interval must be at least {}ms",
                MIN_PROGRESS_INTERVAL.as_millis()
            )));
        }

        if self.progress_interval > MAX_PROGRESS_INTERVAL {
            return Err(Error::Config(
                "Progress interval exceeds maximum of 60 seconds".to_string(),
            ));
        }

        if !self.seek_interval_secs.is_finite() || self.seek_interval_secs <= 0.0 {
            return Err(Error::Config(format!(
                "Seek interval must be a positive number of seconds, got {}",
                self.seek_interval_secs
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Platform whose native audio module should back the player.
    ///
    /// Uses the override when set, otherwise the compile target.
    pub fn resolve_platform(&self) -> Result<HostPlatform> {
        let platform = self.platform.unwrap_or_else(HostPlatform::current);
        if !platform.has_native_audio() {
            return Err(native_audio_missing_error(platform));
        }
        Ok(platform)
    }
}

fn native_audio_missing_error(platform: HostPlatform) -> Error {
    Error::CapabilityMissing {
        capability: "AudioModule".to_string(),
        message: format!(
            "No native audio module exists for platform '{}'. \
             Android: provide an ExoPlayer handle. \
             iOS: provide an AVPlayer handle. \
             Elsewhere: inject a custom AudioModule implementation.",
            platform
        ),
    }
}

/// Builder for [`PlayerConfig`].
#[derive(Debug, Default)]
pub struct PlayerConfigBuilder {
    platform: Option<HostPlatform>,
    progress_interval: Option<Duration>,
    seek_interval_secs: Option<f64>,
    event_buffer_size: Option<usize>,
    auto_play: bool,
    repeat: bool,
}

impl PlayerConfigBuilder {
    pub fn platform(mut self, platform: HostPlatform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the progress cadence.
    ///
    /// Default: 1 second
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    /// Sets the seek-forward / seek-back step.
    ///
    /// Default: 3 seconds
    pub fn seek_interval_secs(mut self, seconds: f64) -> Self {
        self.seek_interval_secs = Some(seconds);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
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

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<PlayerConfig> {
        let config = PlayerConfig {
            platform: self.platform,
            progress_interval: self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL),
            seek_interval_secs: self
                .seek_interval_secs
                .unwrap_or(DEFAULT_SEEK_INTERVAL_SECS),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            auto_play: self.auto_play,
            repeat: self.repeat,
        };
        config.validate()?;
        Ok(config)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
