//! Detection debouncer: turns the noisy per-frame decode stream into
//! confirmed scan candidates.
//!
//! A single frame's decode is unreliable (partial occlusion, motion
//! blur), so a code is only confirmed after `BUFFER_SIZE` consecutive
//! identical valid reads. The buffer is a sliding window: a mismatch at
//! capacity drops the oldest read, while an invalid sample clears the
//! whole window.

use crate::types::{CandidateSource, ConfirmedCandidate, DetectionSample};
use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

/// Consecutive identical reads required to confirm a candidate.
pub const BUFFER_SIZE: usize = 3;

/// Minimum per-frame confidence for a sample to count.
pub const CONFIDENCE_THRESHOLD: f32 = 0.10;

/// Minimum accepted code length.
pub const MIN_CODE_LEN: usize = 4;

/// Compiled regex for the accepted code alphabet.
static RE_CODE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-_]+$").expect("Invalid regex"));

/// Sliding window of recent decode reads. Single-writer: exactly one
/// decode callback stream feeds it, so no interior locking is needed.
#[derive(Debug, Default)]
pub struct DetectionDebouncer {
    buffer: VecDeque<String>,
}

impl DetectionDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's decode attempt.
    ///
    /// Returns a candidate exactly when the window reaches capacity
    /// with all reads identical; the window is cleared on emission so
    /// the same physical scan cannot confirm twice.
    pub fn accept(&mut self, sample: &DetectionSample) -> Option<ConfirmedCandidate> {
        let text = match sample.text.as_deref() {
            Some(text) => text,
            None => {
                self.buffer.clear();
                return None;
            }
        };

        if text.trim().is_empty()
            || text.len() < MIN_CODE_LEN
            || !RE_CODE_SHAPE.is_match(text)
            || sample.confidence < CONFIDENCE_THRESHOLD
        {
            self.buffer.clear();
            return None;
        }

        self.buffer.push_back(text.to_string());

        if self.buffer.len() >= BUFFER_SIZE {
            let all_same = self.buffer.iter().all(|read| read == &self.buffer[0]);
            if all_same {
                log::debug!("Candidate confirmed after {BUFFER_SIZE} identical reads: {text}");
                self.buffer.clear();
                return Some(ConfirmedCandidate {
                    text: text.to_string(),
                    source: CandidateSource::Camera,
                });
            }
            // Window slides: drop the oldest read, keep collecting.
            self.buffer.pop_front();
        }

        None
    }

    /// Drop all buffered reads. Called when a scan result is
    /// acknowledged so a stale half-window cannot leak into the next
    /// physical scan.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(text: &str) -> DetectionSample {
        DetectionSample::new(text, 0.5)
    }

    #[test]
    fn test_three_identical_reads_confirm_once() {
        let mut debouncer = DetectionDebouncer::new();
        assert!(debouncer.accept(&sample("X1-9F")).is_none());
        assert!(debouncer.accept(&sample("X1-9F")).is_none());

        let candidate = debouncer.accept(&sample("X1-9F")).expect("third read confirms");
        assert_eq!(candidate.text, "X1-9F");
        assert_eq!(candidate.source, CandidateSource::Camera);

        // Window cleared on emission: the next read starts over.
        assert!(debouncer.is_empty());
        assert!(debouncer.accept(&sample("X1-9F")).is_none());
    }

    #[test]
    fn test_mismatch_slides_window() {
        let mut debouncer = DetectionDebouncer::new();
        assert!(debouncer.accept(&sample("AAAA")).is_none());
        assert!(debouncer.accept(&sample("AAAA")).is_none());
        // [A, A, B] never confirms either code from this window.
        assert!(debouncer.accept(&sample("BBBB")).is_none());

        // The window slid to [A, B]: two more Bs complete [B, B, B].
        assert!(debouncer.accept(&sample("BBBB")).is_none());
        let candidate = debouncer.accept(&sample("BBBB")).expect("three Bs in a row");
        assert_eq!(candidate.text, "BBBB");
    }

    #[test]
    fn test_low_confidence_clears_window() {
        let mut debouncer = DetectionDebouncer::new();
        debouncer.accept(&sample("AAAA"));
        debouncer.accept(&sample("AAAA"));
        // One weak read destroys the progress made so far.
        debouncer.accept(&DetectionSample::new("AAAA", 0.05));
        assert!(debouncer.accept(&sample("AAAA")).is_none());
        assert!(debouncer.accept(&sample("AAAA")).is_none());
        assert!(debouncer.accept(&sample("AAAA")).is_some());
    }

    #[test]
    fn test_shape_filtering() {
        let mut debouncer = DetectionDebouncer::new();

        // Too short.
        for _ in 0..5 {
            assert!(debouncer.accept(&sample("AB1")).is_none());
        }
        // Disallowed character.
        for _ in 0..5 {
            assert!(debouncer.accept(&sample("AB CD")).is_none());
        }
        for _ in 0..5 {
            assert!(debouncer.accept(&sample("AB#CD")).is_none());
        }
        // Absent / empty text.
        for _ in 0..5 {
            assert!(debouncer.accept(&DetectionSample::empty()).is_none());
        }
    }

    #[test]
    fn test_invalid_sample_between_valid_reads() {
        let mut debouncer = DetectionDebouncer::new();
        debouncer.accept(&sample("CODE-1"));
        debouncer.accept(&sample("CODE-1"));
        debouncer.accept(&DetectionSample::empty());
        // The clear means these two are reads 1 and 2, not 3 and 4.
        assert!(debouncer.accept(&sample("CODE-1")).is_none());
        assert!(debouncer.accept(&sample("CODE-1")).is_none());
    }

    #[test]
    fn test_reset_drops_progress() {
        let mut debouncer = DetectionDebouncer::new();
        debouncer.accept(&sample("CODE-1"));
        debouncer.accept(&sample("CODE-1"));
        debouncer.reset();
        assert!(debouncer.is_empty());
        assert!(debouncer.accept(&sample("CODE-1")).is_none());
    }
}
