//! # Frame-Pump Backend (Backend B)
//!
//! Portable fallback capture: delegates frame pumping and decoding to the
//! third-party scanner library behind [`FramePump`].
//!
//! The library invokes its decode callback without awaiting consumer
//! completion, so a burst of callbacks can overlap while the first decode is
//! still being processed. A boolean latch ensures only the first decode in a
//! burst is acted upon; the rest are dropped until the session is closed and
//! reopened (each open installs a fresh latch).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::capture::{
    BackendKind, CaptureBackend, CaptureEvent, CapturePlatform, CaptureSession, SessionInner,
};
use crate::error::CaptureError;

/// Backend B: library-owned pump with callback-driven decode.
pub struct FramePumpBackend {
    platform: Arc<dyn CapturePlatform>,
}

impl FramePumpBackend {
    pub fn new(platform: Arc<dyn CapturePlatform>) -> Self {
        FramePumpBackend { platform }
    }
}

#[async_trait]
impl CaptureBackend for FramePumpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::FramePump
    }

    /// Needs only the camera; the library brings its own decoder.
    fn is_supported(&self) -> bool {
        self.platform.has_camera()
    }

    async fn open(
        &self,
        events: mpsc::Sender<CaptureEvent>,
    ) -> Result<CaptureSession, CaptureError> {
        let mut pump = self.platform.new_frame_pump()?;

        // Re-entrancy latch, fresh per open session.
        let latch = Arc::new(AtomicBool::new(false));

        let on_decoded: Box<dyn FnMut(String) + Send> = Box::new(move |decoded| {
            let value = decoded.trim().to_string();
            if value.is_empty() {
                return;
            }
            // Only the first decode in a burst gets through.
            if latch.swap(true, Ordering::SeqCst) {
                return;
            }
            if events.try_send(CaptureEvent::Decoded(value)).is_err() {
                warn!("Engine gone; dropping decoded symbol");
            }
        });

        // Scan misses are best-effort noise; ignored entirely.
        let on_miss: Box<dyn FnMut() + Send> = Box::new(|| {});

        pump.start(on_decoded, on_miss)?;

        info!("Frame pump session opened");
        Ok(CaptureSession::new(
            BackendKind::FramePump,
            SessionInner::Pump { pump },
        ))
    }
}
