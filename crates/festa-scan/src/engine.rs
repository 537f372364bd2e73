//! # Station Engine
//!
//! The single-threaded, cooperative event loop of one scan station. All
//! work is triggered by operator input, timer firings, or capture/network
//! completions; there is no parallel execution inside the engine.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StationEngine Event Loop                         │
//! │                                                                         │
//! │  operator ──► StationEvent ──┐                                         │
//! │  camera   ──► CaptureEvent ──┼──► select! ──► ScanSession.on_code()    │
//! │  timers   ──► generation   ──┘                  │                       │
//! │                                                 ▼                       │
//! │                                          ScanDecision                   │
//! │                 ┌───────────────┬───────────────┬─────────────────┐    │
//! │                 ▼               ▼               ▼                 ▼    │
//! │             Rejected       PendingStored   WaiterActivated     Submit  │
//! │             (feedback)     (arm 45s timer) (maybe submit       (HTTP + │
//! │                                             pending)           feedback)│
//! │                                                                         │
//! │  ORDERING GUARANTEES                                                   │
//! │  ───────────────────                                                   │
//! │  • Feedback renders only AFTER the network call resolves               │
//! │  • Waiter resolution clears the pending timer synchronously BEFORE     │
//! │    the submission call is issued (no timer/submission race)            │
//! │  • Every error path ends input-ready; nothing is retried               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use festa_core::{
    ScanDecision, ScanRequest, ScanSession, StationMode, SubmissionResult, WaiterDirectory,
};

use crate::capture::session::CameraManager;
use crate::capture::CaptureEvent;
use crate::error::{ScanError, ScanResult};
use crate::feedback::FeedbackSink;
use crate::submit::ScanClient;

// =============================================================================
// Station Events
// =============================================================================

/// Operator-facing commands consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationEvent {
    /// A code was finalized in the input field (Enter key or scanner
    /// terminator).
    CodeEntered(String),

    /// Operator action: drop the pending sale item.
    ClearPending,

    /// Operator action: drop the active waiter. Pending state is untouched.
    ClearWaiter,

    /// Open camera capture (ranked backend selection, fresh probe).
    OpenCamera,

    /// Close camera capture.
    CloseCamera,

    /// Override credential for the next submissions; read fresh each time.
    SetOverrideCredential(String),

    /// Flavor to apply when the server sees an unlabeled item.
    SetFlavorIfEmpty(String),

    /// Re-fetch the waiter directory (best effort).
    RefreshWaiters,

    /// Stop the engine, closing any capture session first.
    Shutdown,
}

// =============================================================================
// Station Handle
// =============================================================================

/// Cheap clonable handle for feeding events to a running engine.
#[derive(Clone)]
pub struct StationHandle {
    tx: mpsc::Sender<StationEvent>,
}

impl StationHandle {
    /// Sends one event to the engine.
    pub async fn send(&self, event: StationEvent) -> ScanResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|e| ScanError::ChannelClosed(e.to_string()))
    }
}

// =============================================================================
// Station Engine
// =============================================================================

/// The scan-station processing engine.
pub struct StationEngine<F: FeedbackSink> {
    /// Pending/waiter state machine (pure; owns all session state).
    session: ScanSession,

    /// Best-effort waiter cache, SALE mode only.
    directory: WaiterDirectory,

    /// HTTP submission pipeline.
    client: ScanClient,

    /// Camera capture lifecycle owner.
    camera: CameraManager,

    /// Where all operator feedback goes.
    feedback: F,

    /// Operator name, fixed at station start.
    operator_name: String,

    /// Override credential, read fresh at submission time.
    override_credential: String,

    /// Optional flavor for first-scan labeling.
    flavor_if_empty: String,

    /// Pending-item expiry duration.
    pending_timeout: Duration,

    commands_rx: mpsc::Receiver<StationEvent>,
    capture_tx: mpsc::Sender<CaptureEvent>,
    capture_rx: mpsc::Receiver<CaptureEvent>,
    expiry_tx: mpsc::Sender<u64>,
    expiry_rx: mpsc::Receiver<u64>,
}

impl<F: FeedbackSink> StationEngine<F> {
    /// Creates an engine and the handle used to drive it.
    pub fn new(
        mode: StationMode,
        operator_name: impl Into<String>,
        client: ScanClient,
        camera: CameraManager,
        feedback: F,
        pending_timeout: Duration,
    ) -> (Self, StationHandle) {
        let (commands_tx, commands_rx) = mpsc::channel(32);
        let (capture_tx, capture_rx) = mpsc::channel(8);
        let (expiry_tx, expiry_rx) = mpsc::channel(8);

        let engine = StationEngine {
            session: ScanSession::new(mode),
            directory: WaiterDirectory::new(),
            client,
            camera,
            feedback,
            operator_name: operator_name.into(),
            override_credential: String::new(),
            flavor_if_empty: String::new(),
            pending_timeout,
            commands_rx,
            capture_tx,
            capture_rx,
            expiry_tx,
            expiry_rx,
        };

        (engine, StationHandle { tx: commands_tx })
    }

    /// Runs the engine until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!(
            mode = %self.session.mode(),
            operator = %self.operator_name,
            "Station engine started"
        );

        // Preload the waiter directory; other modes never populate it
        if self.session.mode().uses_waiter_protocol() {
            self.refresh_waiters().await;
        }

        loop {
            tokio::select! {
                Some(event) = self.commands_rx.recv() => {
                    if !self.handle_command(event).await {
                        break;
                    }
                }

                Some(event) = self.capture_rx.recv() => match event {
                    CaptureEvent::Decoded(value) => {
                        // The backend already stopped itself; drop the
                        // session handle so the UI is back to closed state
                        self.camera.close().await;
                        self.handle_code(&value).await;
                    }
                    CaptureEvent::Hint(message) => self.feedback.hint(&message),
                },

                Some(generation) = self.expiry_rx.recv() => {
                    if self.session.on_pending_expired(generation) {
                        debug!(generation, "Pending item expired");
                        self.feedback.neutral("Pending item expired. Scan again.");
                    }
                }

                else => break,
            }
        }

        // Best-effort hardware release on the way out
        self.camera.close().await;
        info!("Station engine stopped");
    }

    /// Handles one operator command. Returns false on shutdown.
    async fn handle_command(&mut self, event: StationEvent) -> bool {
        match event {
            StationEvent::CodeEntered(raw) => self.handle_code(&raw).await,

            StationEvent::ClearPending => {
                self.session.clear_pending();
                self.feedback.neutral("Pending item cleared.");
                self.feedback.input_reset();
            }

            StationEvent::ClearWaiter => {
                self.session.clear_waiter();
                self.feedback.neutral("Active waiter cleared.");
                self.feedback.input_reset();
            }

            StationEvent::OpenCamera => self.open_camera().await,

            StationEvent::CloseCamera => {
                self.camera.close().await;
                self.feedback.input_reset();
            }

            StationEvent::SetOverrideCredential(value) => {
                self.override_credential = value;
            }

            StationEvent::SetFlavorIfEmpty(value) => {
                self.flavor_if_empty = value;
            }

            StationEvent::RefreshWaiters => self.refresh_waiters().await,

            StationEvent::Shutdown => {
                self.camera.close().await;
                return false;
            }
        }
        true
    }

    /// Routes one finalized code through the session machine and executes
    /// the resulting decision.
    async fn handle_code(&mut self, raw: &str) {
        match self.session.on_code(raw, &self.directory) {
            ScanDecision::Rejected(reject) => {
                debug!(reason = %reject, "Scan rejected locally");
                self.render(&SubmissionResult::failure(reject.to_string()));
            }

            ScanDecision::PendingStored { code, generation } => {
                self.arm_expiry(generation);
                self.feedback.neutral(&format!(
                    "Pending item {}. Scan a waiter badge to confirm the sale.",
                    code
                ));
                self.feedback.tone(true);
                self.feedback.haptic(true);
                self.feedback.input_reset();
            }

            ScanDecision::WaiterActivated { waiter, resolved } => {
                self.feedback.neutral(&format!(
                    "Active waiter: {} ({})",
                    waiter.name, waiter.code
                ));
                match resolved {
                    // The pending timer is already invalidated at this
                    // point, so it cannot race the submission
                    Some(code) => self.submit(code, Some(waiter.code)).await,
                    None => {
                        self.feedback.tone(true);
                        self.feedback.haptic(true);
                        self.feedback.input_reset();
                    }
                }
            }

            ScanDecision::Submit { code, waiter_code } => {
                self.submit(code, waiter_code).await;
            }
        }
    }

    /// One outbound transition request plus post-resolution feedback.
    async fn submit(&mut self, code: String, waiter_code: Option<String>) {
        let request = ScanRequest {
            code,
            mode: self.session.mode(),
            operator_name: self.operator_name.clone(),
            override_credential: self.override_credential.clone(),
            waiter_code,
            flavor_if_empty: self.flavor_if_empty.clone(),
        };

        let result = self.client.submit(&request).await;
        self.render(&result);
    }

    /// Renders one submission outcome: visual, tone, haptic, input reset.
    fn render(&self, result: &SubmissionResult) {
        self.feedback.result(result);
        self.feedback.tone(result.ok);
        self.feedback.haptic(result.ok);
        self.feedback.input_reset();
    }

    /// Arms the expiry timer for a freshly stored pending item.
    fn arm_expiry(&self, generation: u64) {
        let tx = self.expiry_tx.clone();
        let timeout = self.pending_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // A stale generation is filtered by the session machine
            let _ = tx.send(generation).await;
        });
    }

    /// Opens camera capture via the ranked backends.
    async fn open_camera(&mut self) {
        match self.camera.open(self.capture_tx.clone()).await {
            Ok(kind) => {
                self.feedback
                    .neutral(&format!("Camera active ({}). Aim at the code.", kind));
            }
            Err(e) => {
                warn!(error = %e, "Camera capture unavailable");
                self.feedback.neutral(&e.to_string());
                self.camera.close().await;
            }
        }
    }

    /// Best-effort waiter-directory refresh; failures keep prior contents.
    async fn refresh_waiters(&mut self) {
        if !self.session.mode().uses_waiter_protocol() {
            return;
        }
        match self.client.fetch_waiters().await {
            Ok(waiters) => {
                debug!(count = waiters.len(), "Waiter directory refreshed");
                self.directory.replace_all(waiters);
            }
            Err(e) => {
                debug!(error = %e, "Waiter preload failed, keeping prior cache");
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::selector::BackendSelector;
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Records every feedback call in order.
    #[derive(Clone, Default)]
    struct RecordingFeedback {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingFeedback {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn push(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl FeedbackSink for RecordingFeedback {
        fn result(&self, result: &SubmissionResult) {
            self.push(format!("result:{}:{}", result.ok, result.message));
        }

        fn neutral(&self, message: &str) {
            self.push(format!("neutral:{}", message));
        }

        fn hint(&self, message: &str) {
            self.push(format!("hint:{}", message));
        }

        fn tone(&self, ok: bool) {
            self.push(format!("tone:{}", ok));
        }

        fn haptic(&self, ok: bool) {
            self.push(format!("haptic:{}", ok));
        }

        fn input_reset(&self) {
            self.push("reset".to_string());
        }
    }

    fn empty_camera() -> CameraManager {
        CameraManager::new(BackendSelector::with_backends(Vec::new()))
    }

    fn client_to(url: &str) -> ScanClient {
        ScanClient::new(Url::parse(url).unwrap(), Duration::from_secs(2)).unwrap()
    }

    async fn mock_waiters(server: &mut mockito::ServerGuard) {
        server
            .mock("GET", "/api/waiters")
            .with_status(200)
            .with_body(r#"{"ok": true, "waiters": [{"code": "W-7", "name": "Ana"}]}"#)
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_sale_scenario_pending_then_waiter_resolves() {
        let mut server = mockito::Server::new_async().await;
        mock_waiters(&mut server).await;
        let scan_mock = server
            .mock("POST", "/api/scan")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "code": "PZ-001",
                "mode": "SALE",
                "waiterCode": "W-7",
            })))
            .with_status(200)
            .with_body(
                r#"{"ok": true, "message": "OK PZ-001 => SOLD",
                    "item": {"id": "PZ-001", "status": "SOLD"}}"#,
            )
            .create_async()
            .await;

        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Sale,
            "Ana",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("PZ-001".to_string()))
            .await
            .unwrap();
        // Lowercase badge scan resolves the pending item
        handle
            .send(StationEvent::CodeEntered("w-7".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        scan_mock.assert_async().await;

        let calls = feedback.calls();
        assert!(calls
            .iter()
            .any(|c| c == "neutral:Pending item PZ-001. Scan a waiter badge to confirm the sale."));
        assert!(calls.iter().any(|c| c == "neutral:Active waiter: Ana (W-7)"));
        assert!(calls.iter().any(|c| c == "result:true:OK PZ-001 => SOLD"));
        // Feedback for the submission rendered after the round trip, with
        // the success tone
        assert!(calls.iter().any(|c| c == "tone:true"));
    }

    #[tokio::test]
    async fn test_active_waiter_makes_submissions_immediate() {
        let mut server = mockito::Server::new_async().await;
        mock_waiters(&mut server).await;
        let scan_mock = server
            .mock("POST", "/api/scan")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "code": "PZ-002",
                "waiterCode": "W-7",
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "item": {"id": "PZ-002", "status": "SOLD"}}"#)
            .create_async()
            .await;

        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Sale,
            "Ana",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("W-7".to_string()))
            .await
            .unwrap();
        handle
            .send(StationEvent::CodeEntered("PZ-002".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        scan_mock.assert_async().await;
        let calls = feedback.calls();
        // No pending message: the scan submitted immediately
        assert!(!calls.iter().any(|c| c.starts_with("neutral:Pending item")));
        // Default message derived from the item payload
        assert!(calls.iter().any(|c| c == "result:true:OK PZ-002 => SOLD"));
    }

    #[tokio::test]
    async fn test_prep_mode_bypasses_waiter_machine() {
        let mut server = mockito::Server::new_async().await;
        let scan_mock = server
            .mock("POST", "/api/scan")
            // Exact body: no waiter field outside SALE mode
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "code": "PZ-003",
                "mode": "PREP",
                "operatorName": "Luis",
                "overrideCredential": "",
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "item": {"id": "PZ-003", "status": "PREP"}}"#)
            .create_async()
            .await;

        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Prep,
            "Luis",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("PZ-003".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        scan_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_each_submission_reads_the_current_override_credential() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/api/scan")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "code": "PZ-010",
                "overrideCredential": "1234",
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "item": {"id": "PZ-010", "status": "PREP"}}"#)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/api/scan")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "code": "PZ-011",
                "overrideCredential": "9999",
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "item": {"id": "PZ-011", "status": "PREP"}}"#)
            .create_async()
            .await;

        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Prep,
            "Luis",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::SetOverrideCredential("1234".to_string()))
            .await
            .unwrap();
        handle
            .send(StationEvent::CodeEntered("PZ-010".to_string()))
            .await
            .unwrap();
        // Credential changed between scans: the next submission must carry
        // the new value, not the one in effect when the station started
        handle
            .send(StationEvent::SetOverrideCredential("9999".to_string()))
            .await
            .unwrap();
        handle
            .send(StationEvent::CodeEntered("PZ-011".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_waiter_renders_failure_naming_the_code() {
        let mut server = mockito::Server::new_async().await;
        mock_waiters(&mut server).await;
        // No POST mock: no submission may happen
        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Sale,
            "Ana",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("W-99".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        let calls = feedback.calls();
        assert!(calls
            .iter()
            .any(|c| c == "result:false:Waiter not found: W-99"));
        assert!(calls.iter().any(|c| c == "tone:false"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_expires_exactly_once_after_timeout() {
        // Unreachable server: the preload fails (best effort) and the
        // pending item never submits
        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Sale,
            "Ana",
            client_to("http://127.0.0.1:9"),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("PZ-001".to_string()))
            .await
            .unwrap();
        // Replace it; the first timer must be invalidated
        handle
            .send(StationEvent::CodeEntered("PZ-002".to_string()))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50_000)).await;

        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        let calls = feedback.calls();
        let expiries = calls
            .iter()
            .filter(|c| *c == "neutral:Pending item expired. Scan again.")
            .count();
        // Two timers fired, but only the live generation cleared anything
        assert_eq!(expiries, 1);
    }

    #[tokio::test]
    async fn test_clear_actions_are_confirmed() {
        let mut server = mockito::Server::new_async().await;
        mock_waiters(&mut server).await;
        let feedback = RecordingFeedback::default();
        let (engine, handle) = StationEngine::new(
            StationMode::Sale,
            "Ana",
            client_to(&server.url()),
            empty_camera(),
            feedback.clone(),
            Duration::from_millis(45_000),
        );
        let task = tokio::spawn(engine.run());

        handle
            .send(StationEvent::CodeEntered("PZ-001".to_string()))
            .await
            .unwrap();
        handle.send(StationEvent::ClearPending).await.unwrap();
        handle.send(StationEvent::ClearWaiter).await.unwrap();
        handle.send(StationEvent::Shutdown).await.unwrap();
        task.await.unwrap();

        let calls = feedback.calls();
        assert!(calls.iter().any(|c| c == "neutral:Pending item cleared."));
        assert!(calls.iter().any(|c| c == "neutral:Active waiter cleared."));
    }
}
