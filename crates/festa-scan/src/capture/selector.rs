//! # Capture Backend Selector
//!
//! Tries the ranked backend strategies in order and returns the first live
//! session. Probing and opening happen fresh on every request - backend
//! availability can change between attempts (permission revoked, device
//! unplugged), so nothing here is cached.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::capture::fallback::FramePumpBackend;
use crate::capture::native::NativeDetectorBackend;
use crate::capture::{CaptureBackend, CaptureEvent, CapturePlatform, CaptureSession};
use crate::error::CaptureError;

/// Ranked list of capture strategies behind one open contract.
pub struct BackendSelector {
    backends: Vec<Box<dyn CaptureBackend>>,
}

impl BackendSelector {
    /// The standard ranking: native detector first, frame pump as fallback.
    pub fn standard(platform: Arc<dyn CapturePlatform>, frame_interval: Duration) -> Self {
        BackendSelector {
            backends: vec![
                Box::new(NativeDetectorBackend::new(platform.clone(), frame_interval)),
                Box::new(FramePumpBackend::new(platform)),
            ],
        }
    }

    /// A custom ranking, mainly for tests.
    pub fn with_backends(backends: Vec<Box<dyn CaptureBackend>>) -> Self {
        BackendSelector { backends }
    }

    /// Attempts each supported backend in rank order.
    ///
    /// Any open error (permission denial, hardware absence, unsupported
    /// format) falls through to the next backend; if none succeeds the
    /// result is [`CaptureError::Unavailable`].
    pub async fn try_open(
        &self,
        events: mpsc::Sender<CaptureEvent>,
    ) -> Result<CaptureSession, CaptureError> {
        for backend in &self.backends {
            if !backend.is_supported() {
                debug!(kind = %backend.kind(), "Backend not supported, skipping");
                continue;
            }
            match backend.open(events.clone()).await {
                Ok(session) => return Ok(session),
                Err(e) => {
                    warn!(kind = %backend.kind(), error = %e, "Backend open failed, falling back");
                }
            }
        }
        Err(CaptureError::Unavailable)
    }
}
