//! # GS Bridge
//!
//! Ground-station bridge binary: opens the configured serial channels,
//! relays decoded telemetry into the shared table, and keeps the HYI
//! judging uplink fed at its fixed 200 ms cadence.
//!
//! Control flow:
//!
//! 1. Load `config.toml` (defaults apply when the file is absent) and
//!    initialize logging.
//! 2. Build the telemetry table, event channel and channel manager, then
//!    connect every channel that has a configured device path.
//! 3. Serve line-oriented control commands from stdin
//!    (`connect <channel> <path>`, `disconnect <channel>`, `quit`) while
//!    draining bridge events into the log.
//! 4. On Ctrl+C or `quit`, tear all channels down and exit.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use gs_bridge::channel::{ChannelId, ChannelManager, ErrorCounters};
use gs_bridge::command::{parse_command, Command};
use gs_bridge::config::Config;
use gs_bridge::events::{BridgeEvent, EventSender};
use gs_bridge::telemetry::logger::SampleLogger;
use gs_bridge::telemetry::TelemetryTable;

/// Configuration file path
const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("GS Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(gs_bridge::error::BridgeError::Io(_)) => {
            info!("no {} found, using defaults", CONFIG_PATH);
            Config::default()
        }
        Err(error) => return Err(error.into()),
    };

    let table = Arc::new(TelemetryTable::new());
    let counters = Arc::new(ErrorCounters::new());
    let (events, mut event_rx) = EventSender::channel();
    let logger = SampleLogger::new(
        &config.logging.payload_log_path,
        &config.logging.merged_log_path,
    );

    let mut manager = ChannelManager::new(
        Arc::clone(&table),
        events.clone(),
        Arc::clone(&counters),
        logger,
        config.team.id,
        Duration::from_millis(config.team.transmit_interval_ms),
    );

    // Channels with configured device paths come up immediately; open
    // failures are reported and leave the channel reconnectable.
    let startup = [
        (ChannelId::Avionics, &config.channels.avionics_device),
        (ChannelId::Payload, &config.channels.payload_device),
        (ChannelId::Judging, &config.channels.judging_device),
    ];
    for (channel, device) in startup {
        if let Some(path) = device {
            if let Err(error) = manager.connect(channel, path).await {
                warn!("{} startup connect failed: {}", channel, error);
            }
        }
    }

    let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
    info!("ready; control commands on stdin, Ctrl+C to exit");

    loop {
        tokio::select! {
            // Bridge events toward the (external) UI transport
            Some(event) = event_rx.recv() => {
                info!("event: {}", event.to_json());
            }

            // Control commands from the UI layer
            line = stdin_lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match parse_command(&line) {
                            Ok(Command::Connect { channel, path }) => {
                                // Error already counted and reported by the manager
                                let _ = manager.connect(channel, &path).await;
                            }
                            Ok(Command::Disconnect { channel }) => {
                                manager.disconnect(channel).await;
                            }
                            Ok(Command::Quit) => {
                                info!("quit requested");
                                break;
                            }
                            Err(reason) => {
                                // Malformed control messages are dropped and
                                // counted against the avionics channel
                                warn!("malformed command: {}", reason);
                                let count = counters.increment(ChannelId::Avionics);
                                events.emit(BridgeEvent::ErrorCountUpdated {
                                    channel: ChannelId::Avionics,
                                    count,
                                });
                            }
                        }
                    }
                    Ok(None) => {
                        info!("stdin closed");
                        break;
                    }
                    Err(error) => {
                        warn!("stdin read error: {}", error);
                        break;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    manager.shutdown().await;
    info!(
        "final error counts: avionics {}, payload {}, judging {}",
        counters.get(ChannelId::Avionics),
        counters.get(ChannelId::Payload),
        counters.get(ChannelId::Judging),
    );

    Ok(())
}
