//! Session orchestration: wires the decoder sample stream into the
//! state machine and performs the redemption call for each accepted
//! candidate.
//!
//! One task owns the session, so candidate acceptance and network
//! completion interleave only at await points. Samples that arrive
//! while a redemption is in flight queue up in the channel and are
//! discarded by the session when processed (it is no longer Scanning).

use crate::services::redeem::Redeemer;
use crate::services::session::ScanSession;
use crate::types::DetectionSample;
use tokio::sync::mpsc::UnboundedReceiver;

/// Consume decoder samples until the stream closes (decoder stopped or
/// dropped), redeeming each confirmed candidate in turn.
pub async fn drive_session<R: Redeemer>(
    session: &mut ScanSession,
    mut samples: UnboundedReceiver<DetectionSample>,
    redeemer: &R,
) {
    while let Some(sample) = samples.recv().await {
        if let Some(ticket) = session.on_sample(&sample) {
            let outcome = redeemer.redeem(ticket.code()).await;
            session.complete_redemption(ticket, outcome);
        }
    }
    log::debug!("Sample stream closed, session driver exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{granted_gate, init_logger, RecordingRedeemer};
    use crate::types::{RedemptionOutcome, SessionState};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_drive_redeems_confirmed_candidate() {
        init_logger();
        let mut session = ScanSession::new(granted_gate());
        session.start_scanning().unwrap();

        let redeemer = RecordingRedeemer::accepting(50);
        let (tx, rx) = mpsc::unbounded_channel();
        for _ in 0..3 {
            tx.send(DetectionSample::new("X1-9F", 0.5)).unwrap();
        }
        drop(tx);

        drive_session(&mut session, rx, &redeemer).await;

        assert_eq!(redeemer.calls(), vec!["X1-9F".to_string()]);
        assert_eq!(session.state(), SessionState::Success);
    }

    #[tokio::test]
    async fn test_samples_during_redemption_do_not_start_second_call() {
        init_logger();
        let mut session = ScanSession::new(granted_gate());
        session.start_scanning().unwrap();

        let redeemer = RecordingRedeemer::new(RedemptionOutcome::Accepted {
            points_awarded: 10,
            message: String::new(),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        // First candidate confirms, then a full second burst arrives
        // while its redemption is (logically) in flight.
        for _ in 0..3 {
            tx.send(DetectionSample::new("FIRST-1", 0.5)).unwrap();
        }
        for _ in 0..3 {
            tx.send(DetectionSample::new("SECOND-2", 0.5)).unwrap();
        }
        drop(tx);

        drive_session(&mut session, rx, &redeemer).await;

        // Only the first candidate ever reached the adapter: the burst
        // was drained in Success state and dropped.
        assert_eq!(redeemer.calls(), vec!["FIRST-1".to_string()]);
    }
}
