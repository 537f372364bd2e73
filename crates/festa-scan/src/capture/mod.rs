//! # Code Capture
//!
//! Camera-based code acquisition across two incompatible backends with
//! automatic fallback.
//!
//! ## Backend Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Capture Backend Selection                           │
//! │                                                                         │
//! │  open request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐   probe fails or open errors                 │
//! │  │ A: NativeDetector    │ ─────────────────────────────┐               │
//! │  │ needs camera +       │                              ▼               │
//! │  │ symbol detector      │                   ┌──────────────────────┐   │
//! │  │ (QR + 1-D formats)   │                   │ B: FramePump         │   │
//! │  └──────────────────────┘                   │ needs camera only    │   │
//! │                                             │ (callback decode)    │   │
//! │                                             └──────────┬───────────┘   │
//! │                                                        │ fails too     │
//! │                                                        ▼               │
//! │                                             CaptureError::Unavailable  │
//! │                                                                         │
//! │  Probing is fresh on EVERY open request - availability can change      │
//! │  (e.g. camera permission revoked between attempts).                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hardware and the third-party decode library sit behind the
//! [`CapturePlatform`] trait, so every piece of selection and session logic
//! is testable without a camera.

pub mod fallback;
pub mod headless;
pub mod native;
pub mod selector;
pub mod session;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::error::CaptureError;

// =============================================================================
// Backend Kind
// =============================================================================

/// Which capture mechanism is (or was) active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Backend A: native low-latency detector, multi-symbology.
    NativeDetector,
    /// Backend B: portable frame-pump library, callback-driven.
    FramePump,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::NativeDetector => write!(f, "native detector"),
            BackendKind::FramePump => write!(f, "frame pump"),
        }
    }
}

// =============================================================================
// Capture Events
// =============================================================================

/// Events a live capture session hands to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A symbol was decoded. The session has already stopped itself, so a
    /// single scan never produces duplicate reads.
    Decoded(String),

    /// A non-fatal mid-session decode failure; the loop keeps running.
    Hint(String),
}

// =============================================================================
// Symbologies
// =============================================================================

/// Symbol formats the native detector is asked to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    QrCode,
    Code128,
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code39,
}

impl Symbology {
    /// The formats printed on festival labels: QR plus the common 1-D codes.
    pub const PRINTED: &'static [Symbology] = &[
        Symbology::QrCode,
        Symbology::Code128,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Code39,
    ];
}

// =============================================================================
// Hardware Seams
// =============================================================================

/// One grabbed video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Raw pixel buffer, copied off the live stream before analysis.
    pub data: Vec<u8>,
}

impl Frame {
    /// Frames with no dimensions yet (stream warming up) are skipped.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Live video stream for the native backend's analysis loop.
pub trait VideoSource: Send {
    /// Grabs the current frame. `Ok(None)` means no frame is ready yet.
    fn grab_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Releases the underlying hardware tracks. Safe to call repeatedly.
    fn stop(&mut self);
}

/// Symbol detector run against grabbed frames.
pub trait SymbolDetector: Send {
    /// Attempts a decode. `Ok(None)` is a miss; `Err` is a transient
    /// per-cycle failure surfaced as an aim hint.
    fn detect(&mut self, frame: &Frame) -> Result<Option<String>, CaptureError>;
}

/// The fallback library's encapsulated scanner instance.
///
/// The library owns its own frame pump and invokes `on_decoded` without
/// awaiting consumer completion, so callbacks can overlap; the fallback
/// backend guards resolution with a re-entrancy latch.
pub trait FramePump: Send {
    /// Starts the pump with a decode callback and a best-effort miss
    /// callback (which the station ignores).
    fn start(
        &mut self,
        on_decoded: Box<dyn FnMut(String) + Send>,
        on_miss: Box<dyn FnMut() + Send>,
    ) -> Result<(), CaptureError>;

    /// Stops the pump.
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Clears the library's internal state after stop.
    fn clear(&mut self);
}

/// Platform capability probe and device factory.
///
/// Backend A needs both capabilities; backend B needs only the camera.
pub trait CapturePlatform: Send + Sync {
    /// A camera device is present and may be opened.
    fn has_camera(&self) -> bool;

    /// A native symbol detector is available.
    fn has_symbol_detector(&self) -> bool;

    /// Opens the live video stream (may prompt for permission).
    fn open_video(&self) -> Result<Box<dyn VideoSource>, CaptureError>;

    /// Builds a native detector for the given formats.
    fn new_detector(
        &self,
        formats: &[Symbology],
    ) -> Result<Box<dyn SymbolDetector>, CaptureError>;

    /// Builds the fallback library's scanner instance.
    fn new_frame_pump(&self) -> Result<Box<dyn FramePump>, CaptureError>;
}

// =============================================================================
// Capture Backend Trait
// =============================================================================

/// One ranked capture strategy with a uniform open contract.
///
/// The selector iterates strategies generically rather than branching on
/// concrete backend identity.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Which mechanism this strategy drives.
    fn kind(&self) -> BackendKind;

    /// Fresh capability probe. Called on every open request, never cached.
    fn is_supported(&self) -> bool;

    /// Opens a live session. Decoded symbols and aim hints flow into
    /// `events`. Any error here makes the selector fall through to the
    /// next ranked backend.
    async fn open(
        &self,
        events: mpsc::Sender<CaptureEvent>,
    ) -> Result<CaptureSession, CaptureError>;
}

// =============================================================================
// Capture Session
// =============================================================================

pub(crate) enum SessionInner {
    /// Native analysis loop running in a spawned task.
    Loop {
        stop_tx: watch::Sender<bool>,
        task: JoinHandle<()>,
    },
    /// Library-owned pump; closed via its stop/clear pair.
    Pump { pump: Box<dyn FramePump> },
}

/// The live hardware/resource handle for the single active backend.
///
/// Invariant: never more than one session open concurrently - the session
/// manager closes the previous one before opening a new one.
pub struct CaptureSession {
    id: Uuid,
    kind: BackendKind,
    inner: SessionInner,
}

impl CaptureSession {
    pub(crate) fn new(kind: BackendKind, inner: SessionInner) -> Self {
        CaptureSession {
            id: Uuid::new_v4(),
            kind,
            inner,
        }
    }

    /// Session identifier, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Which backend this session is running on.
    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Releases hardware and halts any polling loop before returning.
    ///
    /// Failures are swallowed: close must always leave the station in the
    /// closed/idle state, including on the best-effort shutdown path.
    pub async fn close(self) {
        match self.inner {
            SessionInner::Loop { stop_tx, task } => {
                let _ = stop_tx.send(true);
                if let Err(e) = task.await {
                    debug!(session = %self.id, error = %e, "Capture loop join failed");
                }
            }
            SessionInner::Pump { mut pump } => {
                if let Err(e) = pump.stop() {
                    debug!(session = %self.id, error = %e, "Frame pump stop failed");
                }
                pump.clear();
            }
        }
    }
}

impl std::fmt::Debug for CaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
