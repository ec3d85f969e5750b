//! # Outbound HYI Transmitter
//!
//! Periodic task that snapshots the telemetry table every 200 ms, encodes
//! the 78-byte HYI frame and writes it to the judging serial channel.
//!
//! The sequence counter starts at zero and increments (wrapping modulo
//! 256) after every transmission attempt, successful or not. The task
//! checks the judging channel state at each tick boundary and cancels
//! itself once the channel is no longer open. A transient write failure
//! leaves the channel open and the next tick is still attempted; a
//! device-gone failure (unplugged adapter) closes the channel, which ends
//! the loop at the following tick.

use super::{ChannelId, ChannelState, ErrorCounters};
use crate::error::BridgeError;
use crate::events::{BridgeEvent, EventSender};
use crate::protocol::hyi::encode_hyi_frame;
use crate::serial::uplink::FrameSink;
use crate::telemetry::TelemetryTable;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, warn};

/// Fixed transmit period required by the judging station
pub const TRANSMIT_PERIOD: Duration = Duration::from_millis(200);

/// Error kinds that mean the serial device itself is gone
///
/// An unplugged USB adapter surfaces as one of these on the next write;
/// anything else is treated as transient.
fn is_device_gone(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected
    )
}

/// Periodic HYI frame builder and writer
pub struct OutboundTransmitter {
    sink: Box<dyn FrameSink>,
    table: Arc<TelemetryTable>,
    channel_state: Arc<Mutex<ChannelState>>,
    events: EventSender,
    counters: Arc<ErrorCounters>,
    team_id: u8,
    period: Duration,
    sequence: Arc<AtomicU8>,
}

impl OutboundTransmitter {
    /// Create a transmitter over an already-open judging sink
    ///
    /// The sequence counter is shared with the channel manager so that a
    /// judging-channel reconnect resumes the count instead of restarting
    /// at zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sink: Box<dyn FrameSink>,
        table: Arc<TelemetryTable>,
        channel_state: Arc<Mutex<ChannelState>>,
        events: EventSender,
        counters: Arc<ErrorCounters>,
        team_id: u8,
        period: Duration,
        sequence: Arc<AtomicU8>,
    ) -> Self {
        Self {
            sink,
            table,
            channel_state,
            events,
            counters,
            team_id,
            period,
            sequence,
        }
    }

    /// Run the periodic transmit loop until the judging channel closes
    pub async fn run(mut self) {
        let mut tick = interval(self.period);
        info!(
            "HYI transmitter started (period {} ms, team id {})",
            self.period.as_millis(),
            self.team_id
        );

        loop {
            tick.tick().await;

            // Cancellation is checked at the tick boundary: once the
            // channel left Open, stop being scheduled instead of erroring
            // on every tick.
            let state = *self
                .channel_state
                .lock()
                .expect("judging channel state lock poisoned");
            if state != ChannelState::Open {
                info!("judging channel no longer open, stopping HYI transmitter");
                break;
            }

            self.transmit_once().await;
        }
    }

    /// Build and write one frame, then advance the sequence counter
    ///
    /// The counter advances regardless of the write outcome; the judging
    /// station uses it to spot dropped frames. A device-gone write error
    /// moves the channel to `Closed` so `run` stops ticking.
    pub async fn transmit_once(&mut self) {
        let snapshot = self.table.snapshot();
        let sequence = self.sequence.load(Ordering::Relaxed);
        let frame = encode_hyi_frame(&snapshot, self.team_id, sequence);

        let result = self.sink.send_frame(&frame).await;

        let next = sequence.wrapping_add(1);
        self.sequence.store(next, Ordering::Relaxed);

        match result {
            Ok(()) => {
                debug!("HYI frame sent, sequence now {}", next);
                self.events.emit(BridgeEvent::HyiSent { sequence: next });
            }
            Err(io_error) => {
                let device_gone = is_device_gone(&io_error);
                let error = BridgeError::Transmit(io_error.to_string());
                warn!("HYI frame write failed: {}", error);

                let count = self.counters.increment(ChannelId::Judging);
                self.events.emit(BridgeEvent::HyiSendError {
                    message: error.to_string(),
                });
                self.events.emit(BridgeEvent::ErrorCountUpdated {
                    channel: ChannelId::Judging,
                    count,
                });

                if device_gone {
                    info!("judging device gone, closing channel");
                    *self
                        .channel_state
                        .lock()
                        .expect("judging channel state lock poisoned") = ChannelState::Closed;
                    self.events.emit(BridgeEvent::Disconnected {
                        channel: ChannelId::Judging,
                    });
                }
            }
        }
    }

    /// Current sequence counter value
    pub fn sequence(&self) -> u8 {
        self.sequence.load(Ordering::Relaxed)
    }
}
