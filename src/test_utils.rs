use crate::services::permission::{PermissionGate, PermissionProbe};
use crate::services::redeem::Redeemer;
use crate::types::{CameraCapability, RedemptionOutcome};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Probe with fixed answers, enough for session-level tests.
pub struct FixedProbe {
    pub supported: bool,
    pub capability: CameraCapability,
}

impl PermissionProbe for FixedProbe {
    fn is_supported(&self) -> bool {
        self.supported
    }
    fn query(&mut self) -> Result<CameraCapability, String> {
        Ok(self.capability)
    }
    fn request(&mut self) -> bool {
        self.capability == CameraCapability::Granted
    }
}

pub fn granted_gate() -> PermissionGate {
    PermissionGate::new(Box::new(FixedProbe {
        supported: true,
        capability: CameraCapability::Granted,
    }))
}

pub fn denied_gate() -> PermissionGate {
    PermissionGate::new(Box::new(FixedProbe {
        supported: true,
        capability: CameraCapability::Denied,
    }))
}

pub fn unsupported_gate() -> PermissionGate {
    PermissionGate::new(Box::new(FixedProbe {
        supported: false,
        capability: CameraCapability::Unknown,
    }))
}

/// Redeemer fake that records every code it is asked to redeem and
/// answers with a fixed outcome.
pub struct RecordingRedeemer {
    outcome: RedemptionOutcome,
    calls: Mutex<Vec<String>>,
}

impl RecordingRedeemer {
    pub fn new(outcome: RedemptionOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(points: u32) -> Self {
        Self::new(RedemptionOutcome::Accepted {
            points_awarded: points,
            message: format!("Вы получили {points} баллов"),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Redeemer for RecordingRedeemer {
    async fn redeem(&self, code: &str) -> RedemptionOutcome {
        self.calls.lock().unwrap().push(code.to_string());
        self.outcome.clone()
    }
}
