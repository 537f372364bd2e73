//! # Festa Station
//!
//! Terminal scan station for festival food-order processing.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Festa Station                                  │
//! │                                                                         │
//! │  keyboard / wedge scanner ───► stdin loop ───► StationEngine           │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │  terminal colors + bell   ◄─── ConsoleFeedback ◄─── feedback calls     │
//! │                                                     │                   │
//! │                                                     ▼                   │
//! │                                       back office (POST /api/scan)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes are typed or scanned straight into the prompt. Slash commands
//! drive everything else:
//!
//! ```text
//! /camera          open camera capture (if the platform has one)
//! /close           close camera capture
//! /clear-pending   drop the pending sale item
//! /clear-waiter    drop the active waiter
//! /waiters         re-fetch the waiter directory
//! /pin <value>     set the override credential for later submissions
//! /flavor <value>  set the flavor applied to unlabeled items
//! /quit            shut down
//! ```

mod console;

use std::sync::Arc;

use tokio::io::AsyncBufReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use festa_scan::capture::headless::HeadlessPlatform;
use festa_scan::{
    BackendSelector, CameraManager, ScanClient, StationConfig, StationEngine, StationEvent,
};

use crate::console::ConsoleFeedback;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = StationConfig::load()?;
    let mode = config.mode()?;
    info!(
        %mode,
        operator = %config.station.operator,
        server = %config.server.url,
        "Configuration loaded"
    );

    let client = ScanClient::new(config.server_url()?, config.request_timeout())?;

    // No camera hardware is wired into the terminal build; capture opens
    // report "unavailable" and the station stays keyboard-only
    let selector = BackendSelector::standard(Arc::new(HeadlessPlatform), config.frame_interval());
    let camera = CameraManager::new(selector);

    let (engine, handle) = StationEngine::new(
        mode,
        config.station.operator.clone(),
        client,
        camera,
        ConsoleFeedback,
        config.pending_timeout(),
    );
    let engine_task = tokio::spawn(engine.run());

    println!("Festa station ready ({mode} mode). Scan a code, or /quit to exit.");
    print!("> ");
    use std::io::Write;
    let _ = std::io::stdout().flush();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let event = match parse_command(line) {
                    Ok(Some(event)) => event,
                    Ok(None) => break,
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                };
                handle.send(event).await?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.send(StationEvent::Shutdown).await?;
    engine_task.await?;
    Ok(())
}

/// Maps one input line to an engine event. `Ok(None)` means quit.
fn parse_command(line: &str) -> Result<Option<StationEvent>, String> {
    let event = match line {
        "/quit" | "/exit" => return Ok(None),
        "/camera" => StationEvent::OpenCamera,
        "/close" => StationEvent::CloseCamera,
        "/clear-pending" => StationEvent::ClearPending,
        "/clear-waiter" => StationEvent::ClearWaiter,
        "/waiters" => StationEvent::RefreshWaiters,
        _ if line.starts_with("/pin") => {
            let value = line["/pin".len()..].trim();
            StationEvent::SetOverrideCredential(value.to_string())
        }
        _ if line.starts_with("/flavor") => {
            let value = line["/flavor".len()..].trim();
            StationEvent::SetFlavorIfEmpty(value.to_string())
        }
        _ if line.starts_with('/') => {
            return Err(format!("Unknown command: {line}"));
        }
        code => StationEvent::CodeEntered(code.to_string()),
    };
    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_routes_codes_and_commands() {
        assert_eq!(
            parse_command("PZ-001").unwrap(),
            Some(StationEvent::CodeEntered("PZ-001".to_string()))
        );
        assert_eq!(
            parse_command("/pin 1234").unwrap(),
            Some(StationEvent::SetOverrideCredential("1234".to_string()))
        );
        assert_eq!(parse_command("/camera").unwrap(), Some(StationEvent::OpenCamera));
        assert_eq!(parse_command("/quit").unwrap(), None);
        assert!(parse_command("/bogus").is_err());
    }
}
