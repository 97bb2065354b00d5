//! Selection of the native audio module behind a [`PlayerService`].
//!
//! Hosts hand over the native player they own. The service picks the
//! matching [`AudioModule`] implementation once, at construction, based on
//! the host platform capability. The concrete module stays reachable
//! through [`NativeModule`] so the host can forward its player callbacks.
//!
//! [`PlayerService`]: crate::PlayerService

use bridge_traits::{AudioModule, HostPlatform};
use core_runtime::config::PlayerConfig;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "android")]
use bridge_android::{AndroidAudioModule, ExoPlayerHandle};
#[cfg(feature = "ios")]
use bridge_ios::{AvPlayerHandle, IosAudioModule};

use crate::error::{CoreError, Result};

/// Native player supplied by the host.
#[derive(Clone)]
pub enum AudioBackend {
    /// ExoPlayer instance owned by the Android host.
    #[cfg(feature = "android")]
    Android(Arc<dyn ExoPlayerHandle>),

    /// AVPlayer instance owned by the iOS host.
    #[cfg(feature = "ios")]
    Ios(Arc<dyn AvPlayerHandle>),

    /// Ready-made module. Used on hosts without a bundled bridge and in
    /// tests.
    Custom(Arc<dyn AudioModule>),
}

impl AudioBackend {
    /// Platform the backend was built for. `None` for custom modules,
    /// which run anywhere.
    pub fn platform(&self) -> Option<HostPlatform> {
        match self {
            #[cfg(feature = "android")]
            AudioBackend::Android(_) => Some(HostPlatform::Android),
            #[cfg(feature = "ios")]
            AudioBackend::Ios(_) => Some(HostPlatform::Ios),
            AudioBackend::Custom(_) => None,
        }
    }

    /// Builds the audio module for this backend.
    ///
    /// Platform backends must match the platform resolved from `config`.
    /// Custom modules skip platform resolution.
    pub(crate) fn into_module(self, config: &PlayerConfig) -> Result<NativeModule> {
        if let Some(required) = self.platform() {
            let platform = config.resolve_platform()?;
            if platform != required {
                return Err(CoreError::CapabilityMissing {
                    capability: "AudioModule".to_string(),
                    message: format!(
                        "{} backend supplied but the host platform is '{}'",
                        required, platform
                    ),
                });
            }
        }

        let module = match self {
            #[cfg(feature = "android")]
            AudioBackend::Android(player) => NativeModule::Android(Arc::new(
                AndroidAudioModule::with_progress_interval(player, config.progress_interval),
            )),
            #[cfg(feature = "ios")]
            AudioBackend::Ios(player) => NativeModule::Ios(Arc::new(
                IosAudioModule::with_progress_interval(player, config.progress_interval),
            )),
            AudioBackend::Custom(module) => NativeModule::Custom(module),
        };
        Ok(module)
    }
}

impl fmt::Debug for AudioBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.platform() {
            Some(platform) => write!(f, "AudioBackend::{}", platform),
            None => f.write_str("AudioBackend::Custom"),
        }
    }
}

/// Audio module a service was built with.
#[derive(Clone)]
pub enum NativeModule {
    #[cfg(feature = "android")]
    Android(Arc<AndroidAudioModule>),
    #[cfg(feature = "ios")]
    Ios(Arc<IosAudioModule>),
    Custom(Arc<dyn AudioModule>),
}

impl NativeModule {
    pub fn as_audio_module(&self) -> Arc<dyn AudioModule> {
        match self {
            #[cfg(feature = "android")]
            NativeModule::Android(module) => Arc::clone(module) as Arc<dyn AudioModule>,
            #[cfg(feature = "ios")]
            NativeModule::Ios(module) => Arc::clone(module) as Arc<dyn AudioModule>,
            NativeModule::Custom(module) => Arc::clone(module),
        }
    }

    /// Android module, for forwarding ExoPlayer listener callbacks.
    #[cfg(feature = "android")]
    pub fn android(&self) -> Option<&Arc<AndroidAudioModule>> {
        match self {
            NativeModule::Android(module) => Some(module),
            _ => None,
        }
    }

    /// iOS module, for forwarding AVPlayer observations.
    #[cfg(feature = "ios")]
    pub fn ios(&self) -> Option<&Arc<IosAudioModule>> {
        match self {
            NativeModule::Ios(module) => Some(module),
            _ => None,
        }
    }

    pub fn platform(&self) -> HostPlatform {
        self.as_audio_module().platform()
    }
}

impl fmt::Debug for NativeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeModule::{}", self.platform())
    }
}
