//! # Native Detector Backend (Backend A)
//!
//! Low-latency capture: grabs frames off the live stream and runs the
//! platform's symbol detector in a continuous analysis loop.
//!
//! ## Analysis Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  every frame_interval:                                                 │
//! │    stop requested? ──► release stream, exit                            │
//! │    grab frame                                                          │
//! │    no dimensions yet? ──► skip cycle (stream warming up)               │
//! │    detect(frame)                                                       │
//! │      hit  ──► stop stream FIRST, then emit Decoded, exit               │
//! │      miss ──► next cycle                                               │
//! │      err  ──► emit aim hint, keep looping (non-fatal)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stopping before the decoded value is emitted is what prevents duplicate
//! reads of the same label.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::capture::{
    BackendKind, CaptureBackend, CaptureEvent, CapturePlatform, CaptureSession, SessionInner,
    SymbolDetector, Symbology, VideoSource,
};
use crate::error::CaptureError;

/// Message shown when a cycle's detection fails transiently.
const AIM_HINT: &str = "Could not read yet. Adjust your aim.";

/// Backend A: native detector over a live video stream.
pub struct NativeDetectorBackend {
    platform: Arc<dyn CapturePlatform>,
    frame_interval: Duration,
}

impl NativeDetectorBackend {
    pub fn new(platform: Arc<dyn CapturePlatform>, frame_interval: Duration) -> Self {
        NativeDetectorBackend {
            platform,
            frame_interval,
        }
    }
}

#[async_trait]
impl CaptureBackend for NativeDetectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::NativeDetector
    }

    /// Needs both platform capabilities: a camera and a native detector.
    fn is_supported(&self) -> bool {
        self.platform.has_camera() && self.platform.has_symbol_detector()
    }

    async fn open(
        &self,
        events: mpsc::Sender<CaptureEvent>,
    ) -> Result<CaptureSession, CaptureError> {
        let detector = self.platform.new_detector(Symbology::PRINTED)?;
        let video = self.platform.open_video()?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let interval = self.frame_interval;
        let task = tokio::spawn(analysis_loop(video, detector, events, stop_rx, interval));

        info!("Native detector session opened");
        Ok(CaptureSession::new(
            BackendKind::NativeDetector,
            SessionInner::Loop { stop_tx, task },
        ))
    }
}

/// The continuous frame-analysis loop.
async fn analysis_loop(
    mut video: Box<dyn VideoSource>,
    mut detector: Box<dyn SymbolDetector>,
    events: mpsc::Sender<CaptureEvent>,
    stop_rx: watch::Receiver<bool>,
    interval: Duration,
) {
    loop {
        if *stop_rx.borrow() {
            video.stop();
            debug!("Analysis loop stopped by close");
            return;
        }

        match video.grab_frame() {
            Ok(Some(frame)) if frame.has_dimensions() => {
                match detector.detect(&frame) {
                    Ok(Some(value)) => {
                        // Stop the stream before handing the value on, so a
                        // still-visible label cannot be read twice.
                        video.stop();
                        debug!(code = %value, "Symbol decoded");
                        if events.send(CaptureEvent::Decoded(value)).await.is_err() {
                            warn!("Engine gone; dropping decoded symbol");
                        }
                        return;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        debug!(error = %e, "Transient detect failure");
                        let _ = events.try_send(CaptureEvent::Hint(AIM_HINT.to_string()));
                    }
                }
            }
            // Stream not delivering sized frames yet; just wait a cycle.
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Frame grab failed");
                let _ = events.try_send(CaptureEvent::Hint(AIM_HINT.to_string()));
            }
        }

        tokio::time::sleep(interval).await;
    }
}
