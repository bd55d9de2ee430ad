//! Scan pipeline contracts.
//!
//! Namespace boundary:
//! - Everything the UI layer consumes crosses this module as serde
//!   camelCase payloads (`SessionEvent` and friends).
//! - Transient frame data (`DetectionSample`) never leaves the core.

use serde::{Deserialize, Serialize};

/// One decode attempt for one analyzed camera frame.
///
/// Produced by the decoder backend, consumed exclusively by the
/// debouncer. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSample {
    /// Decoded text, absent when the frame yielded nothing.
    pub text: Option<String>,
    /// Reading certainty in `[0, 1]` for this frame.
    pub confidence: f32,
}

impl DetectionSample {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: Some(text.into()),
            confidence,
        }
    }

    /// A frame where the decoder found no code at all.
    pub fn empty() -> Self {
        Self {
            text: None,
            confidence: 0.0,
        }
    }
}

/// Where a confirmed candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CandidateSource {
    Camera,
    Manual,
}

/// A code that passed validity filtering and repetition confirmation,
/// eligible for redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedCandidate {
    pub text: String,
    pub source: CandidateSource,
}

/// Why the server (or the adapter, locally) refused a redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "data")]
pub enum RejectReason {
    /// Another user already redeemed this code.
    #[serde(rename_all = "camelCase")]
    AlreadyRedeemed { by_user_id: u64 },
    /// The code does not exist in the database.
    UnknownCode,
    /// Anything else: network failures, missing auth, unexpected payloads.
    /// The message is surfaced verbatim.
    Other(String),
}

/// Result of one redemption call. Consumed immediately by the session
/// state machine; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    Accepted {
        points_awarded: u32,
        message: String,
    },
    Rejected(RejectReason),
}

/// Camera availability as seen by the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraCapability {
    /// The platform offers no camera API at all. Terminal for this
    /// session: only manual entry remains.
    Unsupported,
    /// Permission state not yet determined; a prompt is required.
    Unknown,
    Granted,
    Denied,
}

/// The mutually exclusive states of one scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// Camera off, nothing pending.
    Idle,
    /// Scanning was requested but the camera permission blocks it.
    PermissionRequired,
    /// Camera live, debouncer consuming frames.
    Scanning,
    /// Exactly one redemption call outstanding. Decoder output is
    /// discarded while here.
    AwaitingServer,
    /// Redemption accepted; waiting for user acknowledgment.
    Success,
    /// Redemption rejected; waiting for user acknowledgment.
    Error,
    /// Typing a code by hand. Exclusive with an active camera.
    ManualEntry,
}

/// Streaming event contract for session progress.
///
/// Mirrors the shape the frontend already handles for long-running
/// operations: tagged `{event, data}` with camelCase fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event", content = "data")]
pub enum SessionEvent {
    /// Emitted on every state transition.
    #[serde(rename_all = "camelCase")]
    StateChanged { state: SessionState },
    /// A candidate cleared the debounce window and was accepted.
    #[serde(rename_all = "camelCase")]
    CandidateConfirmed {
        code: String,
        source: CandidateSource,
    },
    /// The server awarded points for the pending code.
    #[serde(rename_all = "camelCase")]
    RedeemAccepted { code: String, points_awarded: u32 },
    /// The server (or the adapter, locally) refused the pending code.
    #[serde(rename_all = "camelCase")]
    RedeemRejected { code: String, reason: RejectReason },
    /// Scanning is blocked by the camera capability.
    #[serde(rename_all = "camelCase")]
    PermissionBlocked { capability: CameraCapability },
}
