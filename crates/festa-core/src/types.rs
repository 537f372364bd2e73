//! # Wire Types
//!
//! Domain and wire-contract types shared by the scan engine and the
//! back-office server collaborator.
//!
//! ## Contract Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scan Station Wire Contract                         │
//! │                                                                         │
//! │  POST /api/scan                                                        │
//! │  ──────────────                                                        │
//! │  request:  { code, mode, operatorName, overrideCredential,             │
//! │              waiterCode?, flavorIfEmpty? }                             │
//! │  response: { ok, message | error, item?: { id, status, flavor,         │
//! │              price } }                                                 │
//! │                                                                         │
//! │  GET /api/waiters                                                      │
//! │  ────────────────                                                      │
//! │  response: { ok, waiters: [ { code, name }, ... ] }                    │
//! │                                                                         │
//! │  Non-2xx or ok=false is a submission failure; transport failure is     │
//! │  reported as a generic network error result.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Station Mode
// =============================================================================

/// The operational mode a scan station is opened in.
///
/// The mode controls which state transition the server applies and whether
/// the two-step pending/waiter confirmation protocol is engaged.
///
/// ## Mode Behavior
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  PREP / READY / CANCEL / WASTE                                         │
/// │  ─────────────────────────────                                         │
/// │  • Every scan submits immediately                                      │
/// │  • Waiter badges and the pending machine are never engaged             │
/// │                                                                         │
/// │  SALE                                                                  │
/// │  ────                                                                  │
/// │  • Item scans require waiter confirmation (pending protocol)           │
/// │  • Waiter badges (`W-` codes) activate/replace the active waiter       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationMode {
    /// Item enters preparation.
    Prep,
    /// Item is ready for pickup.
    Ready,
    /// Item is sold (engages the pending/waiter protocol).
    Sale,
    /// Item is canceled.
    Cancel,
    /// Item is written off as waste.
    Waste,
}

impl StationMode {
    /// Returns true if this mode engages the pending/waiter protocol.
    pub fn uses_waiter_protocol(&self) -> bool {
        matches!(self, StationMode::Sale)
    }
}

impl std::fmt::Display for StationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationMode::Prep => write!(f, "PREP"),
            StationMode::Ready => write!(f, "READY"),
            StationMode::Sale => write!(f, "SALE"),
            StationMode::Cancel => write!(f, "CANCEL"),
            StationMode::Waste => write!(f, "WASTE"),
        }
    }
}

impl std::str::FromStr for StationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PREP" | "KITCHEN" => Ok(StationMode::Prep),
            "READY" => Ok(StationMode::Ready),
            "SALE" | "SALES" => Ok(StationMode::Sale),
            "CANCEL" => Ok(StationMode::Cancel),
            "WASTE" => Ok(StationMode::Waste),
            other => Err(format!(
                "Unknown station mode: '{}'. Valid options: prep, ready, sale, cancel, waste",
                other
            )),
        }
    }
}

// =============================================================================
// Waiter
// =============================================================================

/// A waiter known to the back office.
///
/// Immutable once fetched; the directory cache owns waiter lifetime and the
/// session only holds a clone of the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waiter {
    /// Canonical uppercase badge code, pattern `W-<suffix>`.
    pub code: String,

    /// Display name shown in the waiter status readout.
    pub name: String,
}

// =============================================================================
// Scan Request
// =============================================================================

/// The single outbound transition request for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Normalized (trimmed, uppercased) item or badge code.
    pub code: String,

    /// Station mode the scan was made in.
    pub mode: StationMode,

    /// Operator name, fixed at station start.
    pub operator_name: String,

    /// Override credential, read fresh at submission time.
    /// Empty string when not supplied.
    #[serde(default)]
    pub override_credential: String,

    /// Confirming waiter's badge code.
    /// Present only in SALE mode with an active waiter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiter_code: Option<String>,

    /// Optional flavor applied on first scan of an unlabeled item.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flavor_if_empty: String,
}

// =============================================================================
// Submission Result
// =============================================================================

/// Item details echoed back on a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    /// Printed item identifier (e.g. `PZ-001`).
    pub id: String,

    /// Resulting status after the transition.
    pub status: String,

    /// Flavor label, if the item has one.
    #[serde(default)]
    pub flavor: String,

    /// Display price, as formatted by the server.
    #[serde(default)]
    pub price: String,
}

/// Outcome of one submission round trip, success or failure.
///
/// Transient: exists only for the duration of feedback rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    /// Whether the transition was applied.
    pub ok: bool,

    /// Human-readable confirmation or failure reason.
    pub message: String,

    /// Item payload on success.
    pub item: Option<ItemSummary>,
}

impl SubmissionResult {
    /// A successful transition with its item payload.
    pub fn success(message: impl Into<String>, item: ItemSummary) -> Self {
        SubmissionResult {
            ok: true,
            message: message.into(),
            item: Some(item),
        }
    }

    /// A server-reported rejection (business-rule failure).
    pub fn failure(message: impl Into<String>) -> Self {
        SubmissionResult {
            ok: false,
            message: message.into(),
            item: None,
        }
    }

    /// The distinct no-response path: the request never completed.
    pub fn network_error() -> Self {
        SubmissionResult::failure("Network error")
    }
}

// =============================================================================
// Server Response Bodies
// =============================================================================

/// Raw body of the scan-submission endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponseBody {
    pub ok: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub item: Option<ItemSummary>,
}

/// Raw body of the waiter-directory endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WaiterListBody {
    pub ok: bool,

    #[serde(default)]
    pub waiters: Vec<Waiter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parses_aliases() {
        assert_eq!("sale".parse::<StationMode>().unwrap(), StationMode::Sale);
        assert_eq!("SALES".parse::<StationMode>().unwrap(), StationMode::Sale);
        assert_eq!("kitchen".parse::<StationMode>().unwrap(), StationMode::Prep);
        assert!("checkout".parse::<StationMode>().is_err());
    }

    #[test]
    fn test_scan_request_wire_shape() {
        let request = ScanRequest {
            code: "PZ-001".to_string(),
            mode: StationMode::Sale,
            operator_name: "Ana".to_string(),
            override_credential: String::new(),
            waiter_code: Some("W-7".to_string()),
            flavor_if_empty: String::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["code"], "PZ-001");
        assert_eq!(json["mode"], "SALE");
        assert_eq!(json["operatorName"], "Ana");
        assert_eq!(json["overrideCredential"], "");
        assert_eq!(json["waiterCode"], "W-7");
        // Empty flavor is omitted entirely
        assert!(json.get("flavorIfEmpty").is_none());
    }

    #[test]
    fn test_scan_request_omits_waiter_outside_sale() {
        let request = ScanRequest {
            code: "PZ-003".to_string(),
            mode: StationMode::Prep,
            operator_name: "Luis".to_string(),
            override_credential: String::new(),
            waiter_code: None,
            flavor_if_empty: "PEPPERONI".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("waiterCode").is_none());
        assert_eq!(json["flavorIfEmpty"], "PEPPERONI");
    }

    #[test]
    fn test_response_body_accepts_error_shape() {
        let body: ScanResponseBody =
            serde_json::from_str(r#"{"ok": false, "error": "Invalid transition"}"#).unwrap();
        assert!(!body.ok);
        assert_eq!(body.error.as_deref(), Some("Invalid transition"));
        assert!(body.item.is_none());
    }
}
