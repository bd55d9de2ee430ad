//! Decoder adapter: lifecycle wrapper around the external barcode
//! decoding backend.
//!
//! The backend owns the camera stream and pixel decoding; this module
//! owns start/stop discipline and the frame-sample channel. The handle
//! releases the backend on `stop()` and on every destruction path, so
//! repeated start/stop cycles never leak the underlying stream.

use crate::types::{DetectionSample, ScanResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Decode configuration handed to the backend at bind time.
///
/// Values mirror the production camera profile: environment-facing
/// camera, 1280x720 to 2560x1440 capture window, Code 128 only.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Capture resolution bounds, `(min, ideal, max)` per axis.
    pub width: (u32, u32, u32),
    pub height: (u32, u32, u32),
    /// Accepted aspect ratio range.
    pub aspect_ratio: (f32, f32),
    /// Decode attempts per second.
    pub frequency_hz: u32,
    /// Barcode symbologies the backend should try, in order.
    pub readers: Vec<String>,
    /// Whether the backend should locate the barcode inside the frame.
    pub locate: bool,
    /// Decode worker count.
    pub workers: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            width: (1280, 1920, 2560),
            height: (720, 1080, 1440),
            aspect_ratio: (1.0, 2.0),
            frequency_hz: 10,
            readers: vec!["code_128_reader".to_string()],
            locate: true,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// Per-frame sample sink handed to the backend. Clonable so the backend
/// can move it into its own worker callback.
#[derive(Debug, Clone)]
pub struct DetectionEmitter {
    tx: mpsc::WeakUnboundedSender<DetectionSample>,
    stopped: Arc<AtomicBool>,
}

impl DetectionEmitter {
    /// Push one frame's decode attempt. Returns false once the handle
    /// has stopped; the backend should treat that as a cancel signal.
    /// Callbacks the backend already scheduled before `stop()` land
    /// here and are dropped.
    pub fn emit(&self, sample: DetectionSample) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        match self.tx.upgrade() {
            Some(tx) => tx.send(sample).is_ok(),
            None => false,
        }
    }
}

/// Platform glue the core drives: binds the camera to a capture
/// surface and invokes the emitter once per analyzed frame.
pub trait DecoderBackend: Send {
    /// Acquire the camera stream and start decoding. Fails with
    /// `DecoderInit` when the stream cannot be bound.
    fn bind(&mut self, config: &DecoderConfig, emitter: DetectionEmitter) -> ScanResult<()>;

    /// Release the camera stream. Must be idempotent; called even when
    /// `bind` never succeeded.
    fn release(&mut self);
}

/// Running decoder. Dropping the handle releases the camera.
pub struct DecoderHandle {
    backend: Box<dyn DecoderBackend>,
    stopped: Arc<AtomicBool>,
    // Strong end of the sample channel; dropped on stop so the stream
    // closes even while backend-held emitter clones are still alive.
    tx: Option<mpsc::UnboundedSender<DetectionSample>>,
    running: bool,
}

impl DecoderHandle {
    /// Bind the backend and return the handle plus the sample stream.
    pub fn start(
        mut backend: Box<dyn DecoderBackend>,
        config: &DecoderConfig,
    ) -> ScanResult<(Self, mpsc::UnboundedReceiver<DetectionSample>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let emitter = DetectionEmitter {
            tx: tx.downgrade(),
            stopped: stopped.clone(),
        };

        if let Err(e) = backend.bind(config, emitter) {
            // Never leave a half-acquired stream behind.
            backend.release();
            log::warn!("Decoder failed to start: {e}");
            return Err(e);
        }

        log::info!(
            "Decoder started ({} @ {} Hz)",
            config.readers.join(", "),
            config.frequency_hz
        );
        Ok((
            Self {
                backend,
                stopped,
                tx: Some(tx),
                running: true,
            },
            rx,
        ))
    }

    /// Release the camera. Idempotent: safe to call when already
    /// stopped. Suppresses the emitter first, so any decode callback
    /// still scheduled in the backend is discarded.
    pub fn stop(&mut self) {
        if self.running {
            self.stopped.store(true, Ordering::SeqCst);
            self.tx.take();
            self.backend.release();
            self.running = false;
            log::info!("Decoder stopped, camera released");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Drop for DecoderHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
