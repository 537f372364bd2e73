//! # Camera Session Manager
//!
//! Owns the single live [`CaptureSession`] for whichever backend is running.
//!
//! ## Invariants
//! - Never more than one session open concurrently: opening a new one
//!   implies the old one is fully stopped first.
//! - `close()` is idempotent and always safe, including when nothing is
//!   open - it releases hardware and halts polling loops before returning.
//! - The same close runs best-effort on process shutdown; failures are
//!   swallowed there.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::capture::selector::BackendSelector;
use crate::capture::{BackendKind, CaptureEvent, CaptureSession};
use crate::error::CaptureError;

/// Lifecycle owner for the active camera resource.
pub struct CameraManager {
    selector: BackendSelector,
    active: Option<CaptureSession>,
}

impl CameraManager {
    pub fn new(selector: BackendSelector) -> Self {
        CameraManager {
            selector,
            active: None,
        }
    }

    /// True while a capture session is live.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Kind of the active backend, if any.
    pub fn active_kind(&self) -> Option<BackendKind> {
        self.active.as_ref().map(|s| s.kind())
    }

    /// Opens a capture session, unconditionally closing any previous one
    /// first. Returns which backend ended up active.
    pub async fn open(
        &mut self,
        events: mpsc::Sender<CaptureEvent>,
    ) -> Result<BackendKind, CaptureError> {
        self.close().await;

        let session = self.selector.try_open(events).await?;
        let kind = session.kind();
        info!(session = %session.id(), backend = %kind, "Capture session open");
        self.active = Some(session);
        Ok(kind)
    }

    /// Stops the active session, if any. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(session) = self.active.take() {
            debug!(session = %session.id(), "Closing capture session");
            session.close().await;
        }
    }
}
