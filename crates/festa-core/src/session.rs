//! # Scan Session State Machine
//!
//! Owns the station-session state the scan flow mutates: the active waiter
//! and the single pending sale item. All UI-bound state is held here
//! explicitly rather than in ambient globals, and every transition is a pure
//! function from (state, event) to (state, decision).
//!
//! ## Session State Transitions (SALE mode)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Pending/Waiter Confirmation Protocol                   │
//! │                                                                         │
//! │  item code, no waiter ──► AwaitingWaiter(code)  [45s expiry armed]     │
//! │                               │                                         │
//! │        ┌──────────────────────┼──────────────────────┐                  │
//! │        ▼                      ▼                      ▼                   │
//! │  waiter badge           expiry fires           operator clears          │
//! │  (found in dir)         (generation match)                              │
//! │        │                      │                      │                   │
//! │        ▼                      ▼                      ▼                   │
//! │  Submit(code +          pending cleared,       pending cleared,         │
//! │  waiter), pending       "expired, rescan"      confirmation msg         │
//! │  cleared                                                                │
//! │                                                                         │
//! │  item code, waiter active ──► Submit(code + waiter) immediately         │
//! │  waiter badge, no pending ──► waiter activated, nothing submitted       │
//! │                                                                         │
//! │  Other modes bypass this machine entirely: every code submits.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one pending item exists; storing a new one replaces the old
//!   (cancel-then-set), it never queues.
//! - Expiry is generation-guarded: every (re)arm bumps a counter, so a timer
//!   armed for a replaced or cleared pending item is a no-op when it fires.
//! - Waiter activation is orthogonal to pending state; clearing the waiter
//!   never touches the pending item.

use crate::directory::WaiterDirectory;
use crate::error::ScanReject;
use crate::normalize::{is_waiter_code, normalize};
use crate::types::{StationMode, Waiter};

// =============================================================================
// Pending Item
// =============================================================================

/// The single item awaiting waiter confirmation, plus the generation its
/// expiry timer was armed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingItem {
    /// Normalized item code.
    pub code: String,

    /// Generation the expiry timer for this pending item carries.
    pub generation: u64,
}

// =============================================================================
// Scan Decision
// =============================================================================

/// What the engine should do with one finalized code.
///
/// The session decides; the engine executes (network call, timer arming,
/// feedback). Keeping the decision a value makes the whole protocol testable
/// without timers or HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// Rejected locally; no network call is made.
    Rejected(ScanReject),

    /// SALE mode, no active waiter: the code is now pending and an expiry
    /// timer must be armed with this generation.
    PendingStored { code: String, generation: u64 },

    /// A waiter badge resolved. If `resolved` carries a code, the pending
    /// item it names must be submitted with the new waiter, and its timer
    /// is already invalidated.
    WaiterActivated {
        waiter: Waiter,
        resolved: Option<String>,
    },

    /// Submit immediately. `waiter_code` is set only in SALE mode with an
    /// active waiter.
    Submit {
        code: String,
        waiter_code: Option<String>,
    },
}

// =============================================================================
// Scan Session
// =============================================================================

/// Per-station session state and its transition operations.
///
/// One instance exists per open station; nothing here crosses sessions or
/// persists.
#[derive(Debug, Clone)]
pub struct ScanSession {
    /// Station mode, fixed at session start.
    mode: StationMode,

    /// At most one active waiter. A relation, not ownership - the directory
    /// cache owns waiter lifetime. Never expires automatically.
    active_waiter: Option<Waiter>,

    /// At most one pending sale item.
    pending: Option<PendingItem>,

    /// Monotonic counter stamped onto each armed pending item.
    generation: u64,
}

impl ScanSession {
    /// Creates an idle session for the given station mode.
    pub fn new(mode: StationMode) -> Self {
        ScanSession {
            mode,
            active_waiter: None,
            pending: None,
            generation: 0,
        }
    }

    /// Station mode this session was opened in.
    pub fn mode(&self) -> StationMode {
        self.mode
    }

    /// Currently active waiter, if any.
    pub fn active_waiter(&self) -> Option<&Waiter> {
        self.active_waiter.as_ref()
    }

    /// Code of the pending sale item, if any.
    pub fn pending_code(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.code.as_str())
    }

    /// Processes one finalized raw code.
    ///
    /// ## Behavior
    /// 1. Normalizes; empty input is rejected without touching state.
    /// 2. In SALE mode a `W-` shaped code is resolved against the directory:
    ///    a miss rejects (state untouched), a hit activates the waiter and
    ///    hands back any pending code for immediate submission.
    /// 3. In SALE mode with no active waiter, an item code replaces the
    ///    pending item and re-arms its expiry.
    /// 4. Everything else submits immediately, carrying the active waiter's
    ///    code only in SALE mode.
    pub fn on_code(&mut self, raw: &str, directory: &WaiterDirectory) -> ScanDecision {
        let code = normalize(raw);
        if code.is_empty() {
            return ScanDecision::Rejected(ScanReject::EmptyCode);
        }

        if self.mode.uses_waiter_protocol() && is_waiter_code(&code) {
            return match directory.lookup(&code) {
                None => ScanDecision::Rejected(ScanReject::UnknownWaiter { code }),
                Some(waiter) => {
                    self.active_waiter = Some(waiter.clone());
                    let resolved = self.take_pending();
                    ScanDecision::WaiterActivated {
                        waiter: waiter.clone(),
                        resolved,
                    }
                }
            };
        }

        if self.mode.uses_waiter_protocol() && self.active_waiter.is_none() {
            let generation = self.arm_pending(code.clone());
            return ScanDecision::PendingStored { code, generation };
        }

        let waiter_code = if self.mode.uses_waiter_protocol() {
            self.active_waiter.as_ref().map(|w| w.code.clone())
        } else {
            None
        };

        ScanDecision::Submit { code, waiter_code }
    }

    /// Handles an expiry timer firing for the given generation.
    ///
    /// Returns true if a pending item was actually cleared. Firing against a
    /// replaced or already-cleared pending item is a no-op, which makes the
    /// expiry idempotent however late the timer lands.
    pub fn on_pending_expired(&mut self, generation: u64) -> bool {
        match &self.pending {
            Some(p) if p.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Explicit operator action: clears the pending item and invalidates its
    /// timer. Returns true if there was one to clear.
    pub fn clear_pending(&mut self) -> bool {
        self.take_pending().is_some()
    }

    /// Explicit operator action: clears the active waiter. The pending item
    /// is deliberately left untouched.
    pub fn clear_waiter(&mut self) -> Option<Waiter> {
        self.active_waiter.take()
    }

    /// Arms (or replaces) the pending item under a fresh generation.
    fn arm_pending(&mut self, code: String) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingItem {
            code,
            generation: self.generation,
        });
        self.generation
    }

    /// Removes the pending item, handing back its code. Any timer armed for
    /// it will miss the generation check and no-op.
    fn take_pending(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.code)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
