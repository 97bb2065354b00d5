//! Host platform detection and the thread-safety marker traits used on
//! every bridge trait.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker trait for types shared across async tasks and host callback
/// threads.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}

/// Marker trait equivalent to `Send`.
pub trait PlatformSend: Send {}

impl<T> PlatformSend for T where T: Send {}

/// Host operating system a native audio module runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Android,
    Ios,
    /// Any host without a native audio bridge (desktop test runs, CI).
    Other,
}

impl HostPlatform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            HostPlatform::Android
        } else if cfg!(target_os = "ios") {
            HostPlatform::Ios
        } else {
            HostPlatform::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPlatform::Android => "android",
            HostPlatform::Ios => "ios",
            HostPlatform::Other => "other",
        }
    }

    /// Whether a native audio bridge exists for this platform.
    pub fn has_native_audio(&self) -> bool {
        !matches!(self, HostPlatform::Other)
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&HostPlatform::Ios).unwrap(),
            "\"ios\""
        );
        let parsed: HostPlatform = serde_json::from_str("\"android\"").unwrap();
        assert_eq!(parsed, HostPlatform::Android);
    }

    #[test]
    fn test_host_is_not_mobile() {
        // Unit tests run on the build host, never on a device.
        assert_eq!(HostPlatform::current(), HostPlatform::Other);
        assert!(!HostPlatform::current().has_native_audio());
    }
}
