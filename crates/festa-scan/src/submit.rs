//! # Scan Submission Pipeline
//!
//! One network round trip per finalized scan, plus the best-effort waiter
//! directory fetch.
//!
//! ## Failure Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  server answers, 2xx, ok=true    ──► success result + item payload     │
//! │  server answers, ok=false/non-2xx──► failure result, server's reason   │
//! │  no response (transport failure) ──► failure result, "Network error"   │
//! │                                                                         │
//! │  Submission NEVER returns Err and never panics: every outcome is a     │
//! │  SubmissionResult so the station always renders feedback and returns   │
//! │  to input-ready state. Errors are never retried automatically.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use festa_core::{ScanRequest, ScanResponseBody, SubmissionResult, Waiter, WaiterListBody};

use crate::error::{ScanError, ScanResult};

/// HTTP client for the back-office scan endpoints.
pub struct ScanClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ScanClient {
    /// Builds a client with a per-request timeout.
    pub fn new(base_url: Url, request_timeout: Duration) -> ScanResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ScanError::HttpClientBuild(e.to_string()))?;

        Ok(ScanClient { http, base_url })
    }

    /// Submits one transition request: `POST /api/scan`.
    ///
    /// Always resolves to a [`SubmissionResult`]; transport failures become
    /// the generic network-error result.
    pub async fn submit(&self, request: &ScanRequest) -> SubmissionResult {
        let url = match self.base_url.join("api/scan") {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Malformed scan endpoint URL");
                return SubmissionResult::network_error();
            }
        };

        debug!(code = %request.code, mode = %request.mode, "Submitting scan");

        let response = match self.http.post(url).json(request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Scan submission transport failure");
                return SubmissionResult::network_error();
            }
        };

        let status = response.status();
        let body: ScanResponseBody = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, http_status = %status, "Unreadable scan response body");
                return SubmissionResult::network_error();
            }
        };

        if status.is_success() && body.ok {
            let message = body.message.unwrap_or_else(|| match &body.item {
                Some(item) => format!("OK {} => {}", item.id, item.status),
                None => "OK".to_string(),
            });
            SubmissionResult {
                ok: true,
                message,
                item: body.item,
            }
        } else {
            let reason = body
                .error
                .or(body.message)
                .unwrap_or_else(|| format!("Scan rejected (HTTP {})", status.as_u16()));
            SubmissionResult::failure(reason)
        }
    }

    /// Fetches the full waiter list: `GET /api/waiters`.
    ///
    /// Callers treat any `Err` as "keep the prior cache contents".
    pub async fn fetch_waiters(&self) -> ScanResult<Vec<Waiter>> {
        let url = self.base_url.join("api/waiters")?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        let body: WaiterListBody = response.json().await?;

        if !status.is_success() || !body.ok {
            return Err(ScanError::DirectoryRejected(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        debug!(count = body.waiters.len(), "Waiter directory fetched");
        Ok(body.waiters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use festa_core::StationMode;

    fn request(code: &str) -> ScanRequest {
        ScanRequest {
            code: code.to_string(),
            mode: StationMode::Sale,
            operator_name: "Ana".to_string(),
            override_credential: String::new(),
            waiter_code: Some("W-7".to_string()),
            flavor_if_empty: String::new(),
        }
    }

    fn client_for(server: &mockito::ServerGuard) -> ScanClient {
        ScanClient::new(
            Url::parse(&server.url()).unwrap(),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_submission_carries_item_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/scan")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "code": "PZ-001",
                "mode": "SALE",
                "operatorName": "Ana",
                "waiterCode": "W-7",
            })))
            .with_status(200)
            .with_body(
                r#"{"ok": true, "message": "OK PZ-001 => SOLD",
                    "item": {"id": "PZ-001", "status": "SOLD",
                             "flavor": "PEPPERONI", "price": "12.50"}}"#,
            )
            .create_async()
            .await;

        let result = client_for(&server).submit(&request("PZ-001")).await;

        mock.assert_async().await;
        assert!(result.ok);
        assert_eq!(result.message, "OK PZ-001 => SOLD");
        let item = result.item.unwrap();
        assert_eq!(item.id, "PZ-001");
        assert_eq!(item.status, "SOLD");
    }

    #[tokio::test]
    async fn test_server_rejection_is_a_failure_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/scan")
            .with_status(400)
            .with_body(r#"{"ok": false, "error": "Invalid transition"}"#)
            .create_async()
            .await;

        let result = client_for(&server).submit(&request("PZ-001")).await;

        assert!(!result.ok);
        assert_eq!(result.message, "Invalid transition");
        assert!(result.item.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_network_error() {
        // Nothing is listening on this port
        let client = ScanClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            Duration::from_millis(200),
        )
        .unwrap();

        let result = client.submit(&request("PZ-001")).await;

        assert!(!result.ok);
        assert_eq!(result, SubmissionResult::network_error());
    }

    #[tokio::test]
    async fn test_fetch_waiters_parses_directory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/waiters")
            .with_status(200)
            .with_body(
                r#"{"ok": true, "waiters": [
                    {"code": "W-7", "name": "Ana"},
                    {"code": "W-9", "name": "Luis"}]}"#,
            )
            .create_async()
            .await;

        let waiters = client_for(&server).fetch_waiters().await.unwrap();
        assert_eq!(waiters.len(), 2);
        assert_eq!(waiters[0].code, "W-7");
    }

    #[tokio::test]
    async fn test_fetch_waiters_rejection_is_an_error_for_best_effort_callers() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/waiters")
            .with_status(403)
            .with_body(r#"{"ok": false, "waiters": []}"#)
            .create_async()
            .await;

        let result = client_for(&server).fetch_waiters().await;
        assert!(matches!(result, Err(ScanError::DirectoryRejected(_))));
    }
}
