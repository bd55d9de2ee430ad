//! Scan session state machine.
//!
//! Owns the mutually exclusive UI/camera states and the single
//! in-flight redemption guarantee. All candidate acceptance is
//! serialized through `&mut self`: a candidate can only move the
//! machine into `AwaitingServer` from `Scanning` or `ManualEntry`, and
//! both transitions leave those states, so a second redemption call can
//! never start while one is outstanding.
//!
//! Scattered boolean flags (`isProcessing`, `hasRequestedPermission`)
//! from earlier iterations are replaced by the state enum itself; the
//! invariant is structural, not a convention.

use crate::services::debouncer::DetectionDebouncer;
use crate::services::permission::PermissionGate;
use crate::types::{
    CameraCapability, CandidateSource, ConfirmedCandidate, DetectionSample, RedemptionOutcome,
    RejectReason, ScanError, ScanResult, SessionEvent, SessionState,
};
use log::{debug, info};
use tokio::sync::mpsc::UnboundedSender;

/// Proof that a candidate was accepted for redemption. Exactly one
/// ticket exists per accepted candidate; `complete_redemption` consumes
/// it. The generation stamp lets the session discard responses that
/// arrive after the camera was stopped or the screen unmounted.
#[derive(Debug)]
pub struct RedemptionTicket {
    code: String,
    generation: u64,
}

impl RedemptionTicket {
    pub fn code(&self) -> &str {
        &self.code
    }
}

pub struct ScanSession {
    state: SessionState,
    pending_code: Option<String>,
    result_message: Option<String>,
    last_error: Option<RejectReason>,
    debouncer: DetectionDebouncer,
    gate: PermissionGate,
    /// Bumped on stop/unmount; stale tickets are ignored.
    generation: u64,
    /// Where to return on acknowledge: camera resumes only when the
    /// accepted candidate came from the camera.
    resume_to_camera: bool,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl ScanSession {
    pub fn new(gate: PermissionGate) -> Self {
        Self {
            state: SessionState::Idle,
            pending_code: None,
            result_message: None,
            last_error: None,
            debouncer: DetectionDebouncer::new(),
            gate,
            generation: 0,
            resume_to_camera: false,
            events: None,
        }
    }

    /// Attach a streaming event sink for the UI layer.
    pub fn with_events(mut self, events: UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending_code(&self) -> Option<&str> {
        self.pending_code.as_deref()
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn last_error(&self) -> Option<&RejectReason> {
        self.last_error.as_ref()
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn transition(&mut self, next: SessionState) {
        if self.state == next {
            return;
        }
        debug!("Session: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.emit(SessionEvent::StateChanged { state: next });
    }

    // ── Camera lifecycle ───────────────────────────────────────────

    /// User starts scanning. Requires a granted camera permission;
    /// anything else blocks in `PermissionRequired` (or fails outright
    /// on a platform without a camera, where only manual entry remains).
    pub fn start_scanning(&mut self) -> ScanResult<()> {
        if self.state != SessionState::Idle && self.state != SessionState::PermissionRequired {
            return Err(ScanError::InvalidState(format!(
                "cannot start scanning from {:?}",
                self.state
            )));
        }

        match self.gate.check() {
            CameraCapability::Granted => {
                info!("Scan session started");
                self.transition(SessionState::Scanning);
                Ok(())
            }
            CameraCapability::Unsupported => {
                self.emit(SessionEvent::PermissionBlocked {
                    capability: CameraCapability::Unsupported,
                });
                Err(ScanError::CameraUnsupported)
            }
            capability => {
                self.emit(SessionEvent::PermissionBlocked { capability });
                self.transition(SessionState::PermissionRequired);
                Err(ScanError::PermissionDenied)
            }
        }
    }

    /// User stops scanning; also the unmount path. Releases the scan
    /// in progress: any redemption response still in flight is stale
    /// from this point on.
    pub fn stop_scanning(&mut self) {
        self.generation += 1;
        self.debouncer.reset();
        self.pending_code = None;
        self.result_message = None;
        self.last_error = None;
        if self.state != SessionState::Idle {
            info!("Scan session stopped");
            self.transition(SessionState::Idle);
        }
    }

    // ── Candidate flow ─────────────────────────────────────────────

    /// Feed one frame's decode attempt. Only consumed while `Scanning`;
    /// in every other state the decoder output is logically suspended
    /// and the sample is discarded.
    pub fn on_sample(&mut self, sample: &DetectionSample) -> Option<RedemptionTicket> {
        if self.state != SessionState::Scanning {
            return None;
        }
        let candidate = self.debouncer.accept(sample)?;
        self.accept_candidate(candidate)
    }

    /// Accept a confirmed candidate for redemption. The single
    /// in-flight guard: only `Scanning` and `ManualEntry` may enter
    /// `AwaitingServer`; a candidate arriving in any other state is
    /// dropped, not queued.
    pub fn accept_candidate(&mut self, candidate: ConfirmedCandidate) -> Option<RedemptionTicket> {
        match self.state {
            SessionState::Scanning | SessionState::ManualEntry => {}
            _ => {
                debug!(
                    "Dropping candidate {} in state {:?}",
                    candidate.text, self.state
                );
                return None;
            }
        }

        self.resume_to_camera = candidate.source == CandidateSource::Camera;
        self.pending_code = Some(candidate.text.clone());
        self.emit(SessionEvent::CandidateConfirmed {
            code: candidate.text.clone(),
            source: candidate.source,
        });
        self.transition(SessionState::AwaitingServer);

        Some(RedemptionTicket {
            code: candidate.text,
            generation: self.generation,
        })
    }

    /// Apply the outcome of the redemption call for `ticket`. A stale
    /// ticket (session stopped or remounted since acceptance) is
    /// discarded without touching state.
    pub fn complete_redemption(&mut self, ticket: RedemptionTicket, outcome: RedemptionOutcome) {
        if ticket.generation != self.generation {
            debug!("Discarding stale redemption response for {}", ticket.code);
            return;
        }
        if self.state != SessionState::AwaitingServer {
            debug!(
                "Redemption response for {} in unexpected state {:?}",
                ticket.code, self.state
            );
            return;
        }

        match outcome {
            RedemptionOutcome::Accepted {
                points_awarded,
                message,
            } => {
                info!("Code {} redeemed for {points_awarded} points", ticket.code);
                self.result_message = if message.is_empty() {
                    Some(format!("You received {points_awarded} points"))
                } else {
                    Some(message)
                };
                self.emit(SessionEvent::RedeemAccepted {
                    code: ticket.code,
                    points_awarded,
                });
                self.transition(SessionState::Success);
            }
            RedemptionOutcome::Rejected(reason) => {
                info!("Code {} rejected: {reason:?}", ticket.code);
                self.last_error = Some(reason.clone());
                self.emit(SessionEvent::RedeemRejected {
                    code: ticket.code,
                    reason,
                });
                self.transition(SessionState::Error);
            }
        }
    }

    /// User dismisses the success or error modal. Clears the pending
    /// code, message, and error, resets the debounce window, and
    /// resumes the camera when that is where the candidate came from.
    pub fn acknowledge(&mut self) {
        match self.state {
            SessionState::Success | SessionState::Error => {}
            _ => return,
        }

        self.pending_code = None;
        self.result_message = None;
        self.last_error = None;
        self.debouncer.reset();

        if self.resume_to_camera {
            self.transition(SessionState::Scanning);
        } else {
            self.transition(SessionState::Idle);
        }
    }

    // ── Manual entry ───────────────────────────────────────────────

    /// Open the manual-entry form. Exclusive with an active camera
    /// session: allowed only from `Idle`.
    pub fn open_manual_entry(&mut self) -> ScanResult<()> {
        if self.state != SessionState::Idle {
            return Err(ScanError::InvalidState(format!(
                "manual entry unavailable from {:?}",
                self.state
            )));
        }
        self.transition(SessionState::ManualEntry);
        Ok(())
    }

    pub fn cancel_manual_entry(&mut self) {
        if self.state == SessionState::ManualEntry {
            self.transition(SessionState::Idle);
        }
    }

    /// Submit a hand-typed code. Whitespace is stripped (pasted values
    /// often carry spaces); the cleaned code then follows exactly the
    /// same path as a camera-confirmed candidate.
    pub fn submit_manual(&mut self, input: &str) -> ScanResult<RedemptionTicket> {
        if self.state != SessionState::ManualEntry {
            return Err(ScanError::InvalidState(format!(
                "manual submit from {:?}",
                self.state
            )));
        }

        let cleaned: String = input.split_whitespace().collect();
        if cleaned.is_empty() {
            return Err(ScanError::InvalidInput("empty barcode".to_string()));
        }

        let candidate = ConfirmedCandidate {
            text: cleaned,
            source: CandidateSource::Manual,
        };
        self.accept_candidate(candidate)
            .ok_or_else(|| ScanError::InvalidState("manual submit rejected".to_string()))
    }
}
