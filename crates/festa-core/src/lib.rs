//! # festa-core: Pure Scan-Station Logic
//!
//! This crate is the **heart** of the festival scan station. It decides what
//! a scanned code means, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Festa Scan Station Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Station Input Surface                          │   │
//! │  │    Scanner/keyboard entry ──► Camera capture ──► Buttons        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ StationEvents                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                festa-scan (engine + adapters)                   │   │
//! │  │    capture backends, HTTP submission, expiry timers             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ festa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ normalize │  │  session  │  │ directory │  │   types   │  │   │
//! │  │   │ trim+upper│  │ pending/  │  │ waiters   │  │   wire    │  │   │
//! │  │   │           │  │ waiter SM │  │ by code   │  │  contract │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO CAMERA • PURE TRANSITIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (StationMode, Waiter, ScanRequest, SubmissionResult)
//! - [`normalize`] - Canonicalization of raw scanner/keyboard input
//! - [`session`] - Pending-confirmation state machine (pure transitions)
//! - [`directory`] - In-memory waiter index keyed by uppercase code
//! - [`error`] - Reject reasons surfaced to the operator
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `ScanSession` consumes codes and events, returns
//!    [`session::ScanDecision`] values - the engine executes them
//! 2. **No I/O**: network, camera, and real timers are FORBIDDEN here
//! 3. **Explicit Errors**: rejects are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod directory;
pub mod error;
pub mod normalize;
pub mod session;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use festa_core::ScanSession` instead of
// `use festa_core::session::ScanSession`

pub use directory::WaiterDirectory;
pub use error::ScanReject;
pub use session::{ScanDecision, ScanSession};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How long a pending sale item waits for a waiter badge before expiring.
///
/// ## Business Reason
/// A scanned pizza that never gets its waiter confirmation is almost always
/// an abandoned or mis-scanned sale. 45 seconds gives the operator time to
/// flag down the waiter without letting stale state linger on the station.
pub const PENDING_TIMEOUT_MS: u64 = 45_000;

/// Prefix that marks a code as a waiter badge rather than a food item.
///
/// Waiter badges are printed as `W-<suffix>` (e.g. `W-7`); everything else
/// is treated as an item code.
pub const WAITER_CODE_PREFIX: &str = "W-";
