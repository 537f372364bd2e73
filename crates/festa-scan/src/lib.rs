//! # Festa Scan - Station Engine and Adapters
//!
//! Everything a scan station does beyond the pure scan logic: camera
//! capture with backend fallback, the HTTP submission pipeline, station
//! configuration, and the event loop that ties them to the state machine
//! in `festa-core`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            festa-scan                                   │
//! │                                                                         │
//! │  ┌──────────────┐      ┌───────────────────────────────────────────┐   │
//! │  │   config     │      │               engine                      │   │
//! │  │ TOML + env   │─────►│  select! over operator / capture / timer  │   │
//! │  └──────────────┘      │  events; drives festa-core::ScanSession   │   │
//! │                        └───────┬───────────────────┬───────────────┘   │
//! │                                │                   │                   │
//! │                  ┌─────────────▼──────┐   ┌────────▼───────────────┐   │
//! │                  │      capture       │   │        submit          │   │
//! │                  │ backend selector,  │   │ POST /api/scan         │   │
//! │                  │ native + fallback, │   │ GET  /api/waiters      │   │
//! │                  │ session manager    │   │ (reqwest)              │   │
//! │                  └────────────────────┘   └────────────────────────┘   │
//! │                                                                         │
//! │  feedback: trait seam to whatever renders tones, haptics, and text     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate does no rendering of its own. The station binary supplies a
//! [`FeedbackSink`] and a [`capture::CapturePlatform`] and feeds operator
//! input through a [`StationHandle`].

pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod submit;

// Re-export the main public API
pub use capture::selector::BackendSelector;
pub use capture::session::CameraManager;
pub use capture::{BackendKind, CaptureEvent};
pub use config::StationConfig;
pub use engine::{StationEngine, StationEvent, StationHandle};
pub use error::{CaptureError, ScanError, ScanResult};
pub use feedback::{FeedbackSink, NoOpFeedback};
pub use submit::ScanClient;
