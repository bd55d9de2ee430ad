//! Camera permission/capability gate.
//!
//! Decides whether the session may enter Scanning. The gate caches the
//! answer: once the user was prompted, a Denied result is never
//! re-prompted automatically. Recovery requires an out-of-band settings
//! change plus a fresh gate (next screen mount).

use crate::types::CameraCapability;

/// Platform permission surface the gate drives.
pub trait PermissionProbe: Send {
    /// Whether the platform offers a camera API at all.
    fn is_supported(&self) -> bool;

    /// Query current permission state without prompting. An `Err`
    /// means the query API itself is unavailable; the gate falls back
    /// to a direct prompt.
    fn query(&mut self) -> Result<CameraCapability, String>;

    /// Prompt the user. Side effect: acquires and immediately releases
    /// a camera stream on the web platform. Returns true when granted.
    fn request(&mut self) -> bool;
}

pub struct PermissionGate {
    probe: Box<dyn PermissionProbe>,
    cached: Option<CameraCapability>,
}

impl PermissionGate {
    pub fn new(probe: Box<dyn PermissionProbe>) -> Self {
        Self {
            probe,
            cached: None,
        }
    }

    /// Determine camera availability, prompting at most once per gate
    /// lifetime.
    pub fn check(&mut self) -> CameraCapability {
        if let Some(cached) = self.cached {
            return cached;
        }

        if !self.probe.is_supported() {
            log::warn!("No camera API on this platform, scanning disabled");
            self.cached = Some(CameraCapability::Unsupported);
            return CameraCapability::Unsupported;
        }

        let resolved = match self.probe.query() {
            Ok(CameraCapability::Granted) => CameraCapability::Granted,
            Ok(CameraCapability::Denied) => CameraCapability::Denied,
            Ok(_) | Err(_) => {
                // Unknown state or no query API: prompt the user.
                if self.probe.request() {
                    CameraCapability::Granted
                } else {
                    CameraCapability::Denied
                }
            }
        };

        if resolved == CameraCapability::Denied {
            log::info!("Camera permission denied, will not re-prompt");
        }
        self.cached = Some(resolved);
        resolved
    }

    /// The last resolved capability, if any check has run.
    pub fn current(&self) -> Option<CameraCapability> {
        self.cached
    }
}
