//! # Reject Reasons
//!
//! Typed reasons a scan is rejected before any network call is made.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  festa-core rejects (this file)                                        │
//! │  └── ScanReject       - Input/resolution failures, no round trip       │
//! │                                                                         │
//! │  festa-scan errors (separate crate)                                    │
//! │  ├── CaptureError     - Camera backend failures                        │
//! │  └── ScanError        - Config/submission plumbing failures            │
//! │                                                                         │
//! │  Server-reported failures travel inside SubmissionResult, not here.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Reasons a scanned code is rejected locally, before submission.
///
/// These map directly to operator-facing messages; nothing here is fatal.
/// The station returns to input-ready state after rendering the reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanReject {
    /// The finalized input was empty after normalization.
    ///
    /// ## When This Occurs
    /// - Operator presses Enter on an empty field
    /// - Scanner fires a stray terminator
    #[error("Code is required")]
    EmptyCode,

    /// A waiter-shaped code (`W-` prefix) was scanned but the directory
    /// has no matching entry.
    ///
    /// ## When This Occurs
    /// - Badge belongs to a deactivated waiter
    /// - The directory preload silently failed and the cache is stale
    ///
    /// Active waiter and pending item are left untouched.
    #[error("Waiter not found: {code}")]
    UnknownWaiter { code: String },
}
