use bonuscan::services::permission::PermissionProbe;
use bonuscan::services::redeem::Redeemer;
use bonuscan::{
    CameraCapability, DecoderBackend, DecoderConfig, DetectionEmitter, PermissionGate,
    RedemptionOutcome, RejectReason, ScanResult,
};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Probe that always reports a granted camera.
pub struct GrantedProbe;

impl PermissionProbe for GrantedProbe {
    fn is_supported(&self) -> bool {
        true
    }
    fn query(&mut self) -> Result<CameraCapability, String> {
        Ok(CameraCapability::Granted)
    }
    fn request(&mut self) -> bool {
        true
    }
}

pub fn granted_gate() -> PermissionGate {
    PermissionGate::new(Box::new(GrantedProbe))
}

/// Decoder backend fake that hands its emitter back to the test, so
/// the test can play the role of the camera.
pub struct ScriptedBackend {
    emitter_slot: Arc<Mutex<Option<DetectionEmitter>>>,
}

impl ScriptedBackend {
    pub fn new() -> (Self, Arc<Mutex<Option<DetectionEmitter>>>) {
        let slot = Arc::new(Mutex::new(None));
        (
            Self {
                emitter_slot: slot.clone(),
            },
            slot,
        )
    }
}

impl DecoderBackend for ScriptedBackend {
    fn bind(&mut self, _config: &DecoderConfig, emitter: DetectionEmitter) -> ScanResult<()> {
        *self.emitter_slot.lock().unwrap() = Some(emitter);
        Ok(())
    }
    fn release(&mut self) {
        self.emitter_slot.lock().unwrap().take();
    }
}

/// Redeemer fake recording the exact call shape the adapter receives.
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

    pub fn rejecting(reason: RejectReason) -> Self {
        Self::new(RedemptionOutcome::Rejected(reason))
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
