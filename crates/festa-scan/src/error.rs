//! # Scan Engine Error Types
//!
//! Error types for the capture, submission, and configuration adapters.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Scan Engine Error Categories                        │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │    Capture      │  │     Submission          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Unavailable    │  │  server rejects and     │ │
//! │  │  ConfigLoad     │  │  PermissionDenied│ │  network failures are   │ │
//! │  │  InvalidUrl     │  │  OpenFailed     │  │  NOT errors here: they  │ │
//! │  └─────────────────┘  │  DetectFailed   │  │  travel as failure      │ │
//! │                       └─────────────────┘  │  SubmissionResults      │ │
//! │                                            └─────────────────────────┘ │
//! │                                                                         │
//! │  Nothing in this crate is fatal to the process: every error path        │
//! │  ends with the station back in an idle, input-ready state.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for scan engine operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Plumbing errors for the scan engine (config, directory fetch, channels).
#[derive(Debug, Error)]
pub enum ScanError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid station configuration.
    #[error("Invalid station configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Invalid server URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Directory Errors
    // =========================================================================
    /// The waiter-directory fetch failed. Best-effort callers log and keep
    /// the prior cache contents.
    #[error("Waiter directory fetch failed: {0}")]
    DirectoryFetchFailed(String),

    /// The waiter-directory endpoint answered but reported a failure.
    #[error("Waiter directory rejected: {0}")]
    DirectoryRejected(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A channel to the engine closed unexpectedly.
    #[error("Channel error: {0}")]
    ChannelClosed(String),
}

/// Capture backend failures.
///
/// Selector-level failures trigger fallback to the next ranked backend;
/// only [`CaptureError::Unavailable`] surfaces to the operator, as a
/// "capture unavailable" message with the UI left closed.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No backend could be opened. Probing happens fresh on every open
    /// request, so a later attempt may still succeed.
    #[error("Camera capture is unavailable on this station")]
    Unavailable,

    /// The platform refused camera access.
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// Required hardware is missing or already claimed.
    #[error("Camera hardware unavailable: {0}")]
    HardwareAbsent(String),

    /// The backend started but could not be configured (e.g. unsupported
    /// symbology set).
    #[error("Capture backend failed to open: {0}")]
    OpenFailed(String),

    /// The fallback library's pump failed to start or stop.
    #[error("Frame pump error: {0}")]
    PumpFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ScanError {
    fn from(err: url::ParseError) -> Self {
        ScanError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::ConfigLoadFailed(err.to_string())
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::DirectoryFetchFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CaptureError::Unavailable.to_string(),
            "Camera capture is unavailable on this station"
        );

        let err = ScanError::InvalidConfig("operator name is required".into());
        assert!(err.to_string().contains("operator name is required"));
    }
}
