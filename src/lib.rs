//! Scan-confirmation core for the EasyBonus loyalty app.
//!
//! Turns the noisy per-frame output of an external barcode decoder into
//! a single confirmed scan, coordinates the idempotent redemption call,
//! and owns the mutually exclusive camera/UI states. Pixel decoding,
//! authentication, and presentation are collaborators behind traits
//! ([`services::decoder::DecoderBackend`],
//! [`auth::TokenProvider`],
//! [`services::permission::PermissionProbe`]).

pub mod auth;
pub mod config;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use auth::TokenProvider;
pub use config::ApiConfig;
pub use services::debouncer::DetectionDebouncer;
pub use services::decoder::{DecoderBackend, DecoderConfig, DecoderHandle, DetectionEmitter};
pub use services::permission::{PermissionGate, PermissionProbe};
pub use services::redeem::{Redeemer, RedemptionClient};
pub use services::session::{RedemptionTicket, ScanSession};
pub use types::{
    CameraCapability, ConfirmedCandidate, DetectionSample, RedemptionOutcome, RejectReason,
    ScanError, ScanResult, SessionEvent, SessionState,
};
