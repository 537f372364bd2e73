//! # Station Configuration
//!
//! Configuration management for one scan station.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FESTA_MODE=sale                                                    │
//! │     FESTA_OPERATOR="Ana"                                               │
//! │     FESTA_SERVER_URL=http://192.168.1.50:8000                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/festa-scan/station.toml (Linux)                          │
//! │     ~/Library/Application Support/com.festa.scan/station.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     mode=sale, 45s pending timeout, localhost server                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # station.toml
//! [station]
//! mode = "sale"          # prep | ready | sale | cancel | waste
//! operator = "Ana"
//!
//! [server]
//! url = "http://127.0.0.1:8000"
//! request_timeout_secs = 10
//!
//! [pending]
//! timeout_ms = 45000
//!
//! [camera]
//! frame_interval_ms = 100   # native analysis loop cadence (~10 fps)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use festa_core::{StationMode, PENDING_TIMEOUT_MS};

use crate::error::{ScanError, ScanResult};

// =============================================================================
// Config Sections
// =============================================================================

/// Station identity and mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSection {
    /// Station mode. Fixed for the lifetime of the session.
    pub mode: String,

    /// Operator name carried on every submission.
    pub operator: String,
}

impl Default for StationSection {
    fn default() -> Self {
        StationSection {
            mode: "sale".to_string(),
            operator: "Operator".to_string(),
        }
    }
}

/// Back-office server endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Base URL of the server collaborator.
    pub url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        ServerSection {
            url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Pending-item expiry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSection {
    /// How long a pending sale item waits for a waiter badge.
    pub timeout_ms: u64,
}

impl Default for PendingSection {
    fn default() -> Self {
        PendingSection {
            timeout_ms: PENDING_TIMEOUT_MS,
        }
    }
}

/// Camera capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSection {
    /// Cadence of the native frame-analysis loop.
    pub frame_interval_ms: u64,
}

impl Default for CameraSection {
    fn default() -> Self {
        CameraSection {
            frame_interval_ms: 100,
        }
    }
}

// =============================================================================
// Station Config
// =============================================================================

/// Full configuration for one scan station.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub station: StationSection,
    pub server: ServerSection,
    pub pending: PendingSection,
    pub camera: CameraSection,
}

impl StationConfig {
    /// Loads configuration: file (if present) then environment overrides.
    pub fn load() -> ScanResult<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading station config");
                let raw = std::fs::read_to_string(&path)?;
                toml::from_str(&raw)?
            }
            _ => {
                debug!("No config file found, using defaults");
                StationConfig::default()
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Default config file location for this platform.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "festa", "festa-scan")
            .map(|dirs| dirs.config_dir().join("station.toml"))
    }

    /// Applies `FESTA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(mode) = std::env::var("FESTA_MODE") {
            self.station.mode = mode;
        }
        if let Ok(operator) = std::env::var("FESTA_OPERATOR") {
            self.station.operator = operator;
        }
        if let Ok(url) = std::env::var("FESTA_SERVER_URL") {
            self.server.url = url;
        }
    }

    /// Validates the configuration, returning typed errors.
    pub fn validate(&self) -> ScanResult<()> {
        if self.station.operator.trim().is_empty() {
            return Err(ScanError::InvalidConfig(
                "operator name is required".into(),
            ));
        }
        self.mode()?;
        self.server_url()?;
        if self.pending.timeout_ms == 0 {
            return Err(ScanError::InvalidConfig(
                "pending timeout must be positive".into(),
            ));
        }
        if self.camera.frame_interval_ms == 0 {
            return Err(ScanError::InvalidConfig(
                "camera frame interval must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Parsed station mode.
    pub fn mode(&self) -> ScanResult<StationMode> {
        self.station
            .mode
            .parse::<StationMode>()
            .map_err(ScanError::InvalidConfig)
    }

    /// Parsed server base URL.
    pub fn server_url(&self) -> ScanResult<Url> {
        Ok(Url::parse(&self.server.url)?)
    }

    /// Pending expiry as a [`Duration`].
    pub fn pending_timeout(&self) -> Duration {
        Duration::from_millis(self.pending.timeout_ms)
    }

    /// Frame-analysis cadence as a [`Duration`].
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.camera.frame_interval_ms)
    }

    /// Per-request HTTP timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}
