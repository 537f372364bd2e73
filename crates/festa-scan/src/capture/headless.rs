//! # Headless Platform
//!
//! A [`CapturePlatform`] for stations without camera hardware (terminal
//! deployments, CI). Every probe reports no capability, so an open request
//! cleanly yields "capture unavailable" and the station stays keyboard-only.

use crate::capture::{CapturePlatform, FramePump, SymbolDetector, Symbology, VideoSource};
use crate::error::CaptureError;

/// Platform with no camera and no detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPlatform;

impl CapturePlatform for HeadlessPlatform {
    fn has_camera(&self) -> bool {
        false
    }

    fn has_symbol_detector(&self) -> bool {
        false
    }

    fn open_video(&self) -> Result<Box<dyn VideoSource>, CaptureError> {
        Err(CaptureError::HardwareAbsent("headless station".into()))
    }

    fn new_detector(
        &self,
        _formats: &[Symbology],
    ) -> Result<Box<dyn SymbolDetector>, CaptureError> {
        Err(CaptureError::HardwareAbsent("headless station".into()))
    }

    fn new_frame_pump(&self) -> Result<Box<dyn FramePump>, CaptureError> {
        Err(CaptureError::HardwareAbsent("headless station".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::selector::BackendSelector;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_headless_station_reports_capture_unavailable() {
        let selector =
            BackendSelector::standard(Arc::new(HeadlessPlatform), Duration::from_millis(100));
        let (events_tx, _events_rx) = mpsc::channel(8);

        let result = selector.try_open(events_tx).await;
        assert!(matches!(result, Err(CaptureError::Unavailable)));
    }
}
