//! # Channel Management Module
//!
//! Connection lifecycle for the three serial channels: the avionics and
//! payload downlinks and the HYI judging uplink.
//!
//! Each channel moves through `Closed → Opening → Open → {Closed |
//! Faulted}`. An open inbound channel runs one task that owns the port and
//! its receive buffer and feeds bytes through a [`FrameReassembler`]; the
//! judging channel runs the [`OutboundTransmitter`] instead. Reconnecting
//! an already-open channel tears the old endpoint down first, so at most
//! one live endpoint exists per channel.

pub mod transmitter;

pub use transmitter::{OutboundTransmitter, TRANSMIT_PERIOD};

use crate::events::{BridgeEvent, EventSender};
use crate::protocol::avionics::{self, decode_avionics};
use crate::protocol::payload::{self, decode_payload};
use crate::protocol::FrameReassembler;
use crate::serial::{self, uplink::SerialFrameSink};
use crate::telemetry::logger::SampleLogger;
use crate::telemetry::TelemetryTable;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The three logical serial channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelId {
    /// Rocket-body avionics downlink
    Avionics,
    /// Secondary payload downlink
    Payload,
    /// HYI judging uplink
    Judging,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Avionics => write!(f, "avionics"),
            ChannelId::Payload => write!(f, "payload"),
            ChannelId::Judging => write!(f, "judging"),
        }
    }
}

/// Lifecycle state of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Opening,
    Open,
    Faulted,
}

/// Monotonic per-channel error counters
///
/// Never reset while the process runs; every checksum failure, transmit
/// failure and malformed control message lands here.
#[derive(Debug, Default)]
pub struct ErrorCounters {
    avionics: AtomicU64,
    payload: AtomicU64,
    judging: AtomicU64,
}

impl ErrorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, channel: ChannelId) -> &AtomicU64 {
        match channel {
            ChannelId::Avionics => &self.avionics,
            ChannelId::Payload => &self.payload,
            ChannelId::Judging => &self.judging,
        }
    }

    /// Add one to a channel's counter, returning the new value
    pub fn increment(&self, channel: ChannelId) -> u64 {
        self.counter(channel).fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current value of a channel's counter
    pub fn get(&self, channel: ChannelId) -> u64 {
        self.counter(channel).load(Ordering::Relaxed)
    }
}

/// One channel's slot inside the manager
struct ChannelSlot {
    state: Arc<Mutex<ChannelState>>,
    task: Option<JoinHandle<()>>,
}

impl ChannelSlot {
    fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChannelState::Closed)),
            task: None,
        }
    }
}

/// Shared context every channel task needs
#[derive(Clone)]
struct ChannelContext {
    table: Arc<TelemetryTable>,
    events: EventSender,
    counters: Arc<ErrorCounters>,
    logger: SampleLogger,
}

/// Owner of the three channel lifecycles
pub struct ChannelManager {
    context: ChannelContext,
    team_id: u8,
    transmit_period: Duration,
    // Survives judging-channel reconnects, like the error counters
    hyi_sequence: Arc<AtomicU8>,
    avionics: ChannelSlot,
    payload: ChannelSlot,
    judging: ChannelSlot,
}

impl ChannelManager {
    /// Create a manager with all channels closed
    pub fn new(
        table: Arc<TelemetryTable>,
        events: EventSender,
        counters: Arc<ErrorCounters>,
        logger: SampleLogger,
        team_id: u8,
        transmit_period: Duration,
    ) -> Self {
        Self {
            context: ChannelContext {
                table,
                events,
                counters,
                logger,
            },
            team_id,
            transmit_period,
            hyi_sequence: Arc::new(AtomicU8::new(0)),
            avionics: ChannelSlot::new(),
            payload: ChannelSlot::new(),
            judging: ChannelSlot::new(),
        }
    }

    fn slot_mut(&mut self, channel: ChannelId) -> &mut ChannelSlot {
        match channel {
            ChannelId::Avionics => &mut self.avionics,
            ChannelId::Payload => &mut self.payload,
            ChannelId::Judging => &mut self.judging,
        }
    }

    fn slot(&self, channel: ChannelId) -> &ChannelSlot {
        match channel {
            ChannelId::Avionics => &self.avionics,
            ChannelId::Payload => &self.payload,
            ChannelId::Judging => &self.judging,
        }
    }

    const fn baud_for(channel: ChannelId) -> u32 {
        match channel {
            ChannelId::Avionics => serial::AVIONICS_BAUD_RATE,
            ChannelId::Payload => serial::PAYLOAD_BAUD_RATE,
            ChannelId::Judging => serial::JUDGING_BAUD_RATE,
        }
    }

    /// Current lifecycle state of a channel
    pub fn state(&self, channel: ChannelId) -> ChannelState {
        *self
            .slot(channel)
            .state
            .lock()
            .expect("channel state lock poisoned")
    }

    /// Current monotonic error count of a channel
    pub fn error_count(&self, channel: ChannelId) -> u64 {
        self.context.counters.get(channel)
    }

    /// Open a channel on the given device path
    ///
    /// An already-open channel is force-closed first; its task is aborted
    /// and awaited, so no decode callback fires after the old endpoint is
    /// gone. On open failure the channel lands in `Faulted` and the error
    /// is both reported as an event and returned.
    pub async fn connect(&mut self, channel: ChannelId, path: &str) -> crate::error::Result<()> {
        // At most one live endpoint per logical channel
        self.teardown(channel).await;

        *self.slot_mut(channel).state.lock().expect("channel state lock poisoned") =
            ChannelState::Opening;

        match serial::open_port(path, Self::baud_for(channel)) {
            Err(error) => {
                warn!("{} port open failed: {}", channel, error);
                *self
                    .slot_mut(channel)
                    .state
                    .lock()
                    .expect("channel state lock poisoned") = ChannelState::Faulted;
                self.context.events.emit(BridgeEvent::ChannelError {
                    channel,
                    message: error.to_string(),
                });
                Err(error)
            }
            Ok(port) => {
                info!("{} port opened: {}", channel, path);
                let state = Arc::clone(&self.slot(channel).state);
                *state.lock().expect("channel state lock poisoned") = ChannelState::Open;
                self.context.events.emit(BridgeEvent::Connected {
                    channel,
                    path: path.to_string(),
                });

                let task = match channel {
                    ChannelId::Avionics | ChannelId::Payload => tokio::spawn(
                        run_inbound_channel(channel, port, state, self.context.clone()),
                    ),
                    ChannelId::Judging => {
                        let transmitter = OutboundTransmitter::new(
                            Box::new(SerialFrameSink::new(port)),
                            Arc::clone(&self.context.table),
                            state,
                            self.context.events.clone(),
                            Arc::clone(&self.context.counters),
                            self.team_id,
                            self.transmit_period,
                            Arc::clone(&self.hyi_sequence),
                        );
                        tokio::spawn(transmitter.run())
                    }
                };
                self.slot_mut(channel).task = Some(task);
                Ok(())
            }
        }
    }

    /// Close a channel, best-effort
    ///
    /// Always lands in `Closed`, whether or not an endpoint was open or
    /// its teardown succeeded cleanly.
    pub async fn disconnect(&mut self, channel: ChannelId) {
        self.teardown(channel).await;
        info!("{} channel disconnected", channel);
        self.context
            .events
            .emit(BridgeEvent::Disconnected { channel });
    }

    /// Abort and await any running task, dropping the port it owns
    async fn teardown(&mut self, channel: ChannelId) {
        let slot = self.slot_mut(channel);
        let task = slot.task.take();
        let state = Arc::clone(&slot.state);

        if let Some(task) = task {
            task.abort();
            // Awaiting the aborted task guarantees no further decode
            // callback fires after the close is acknowledged
            let _ = task.await;
        }

        *state.lock().expect("channel state lock poisoned") = ChannelState::Closed;
    }

    /// Abort every running channel task (process shutdown)
    pub async fn shutdown(&mut self) {
        for channel in [ChannelId::Avionics, ChannelId::Payload, ChannelId::Judging] {
            self.teardown(channel).await;
        }
    }
}

/// Receive loop for one inbound channel
///
/// Owns the port and the reassembly buffer. Ends on EOF (device unplugged)
/// or a read error, marking the channel closed either way.
async fn run_inbound_channel<R>(
    channel: ChannelId,
    mut port: R,
    state: Arc<Mutex<ChannelState>>,
    context: ChannelContext,
) where
    R: AsyncRead + Unpin + Send,
{
    let layout = match channel {
        ChannelId::Avionics => avionics::frame_layout(),
        ChannelId::Payload => payload::frame_layout(),
        ChannelId::Judging => unreachable!("judging channel has no inbound loop"),
    };
    let mut reassembler = FrameReassembler::new(layout);
    let mut read_buf = [0u8; 512];

    loop {
        match port.read(&mut read_buf).await {
            Ok(0) => {
                info!("{} port closed by device", channel);
                break;
            }
            Ok(n) => {
                for result in reassembler.feed(&read_buf[..n]) {
                    match result {
                        Ok(frame) => handle_frame(channel, &frame, &context).await,
                        Err(error) => {
                            warn!("{} frame corrupt: {}", channel, error);
                            let count = context.counters.increment(channel);
                            context.events.emit(BridgeEvent::ErrorCountUpdated {
                                channel,
                                count,
                            });
                        }
                    }
                }
            }
            Err(error) => {
                warn!("{} read error: {}", channel, error);
                context.events.emit(BridgeEvent::ChannelError {
                    channel,
                    message: error.to_string(),
                });
                break;
            }
        }
    }

    // Unsolicited close: Open -> Closed
    *state.lock().expect("channel state lock poisoned") = ChannelState::Closed;
    context.events.emit(BridgeEvent::Disconnected { channel });
}

/// Decode one validated frame and fan the sample out
async fn handle_frame(channel: ChannelId, frame: &[u8], context: &ChannelContext) {
    match channel {
        ChannelId::Avionics => match decode_avionics(frame) {
            Ok(sample) => {
                context.table.apply_avionics(&sample);
                context.logger.log_merged(&context.table.snapshot()).await;
                context.events.emit(BridgeEvent::AvionicsData(sample));
            }
            Err(error) => warn!("avionics decode failed: {}", error),
        },
        ChannelId::Payload => match decode_payload(frame) {
            Ok(sample) => {
                context.table.apply_payload(&sample);
                context.logger.log_payload(&sample).await;
                context.logger.log_merged(&context.table.snapshot()).await;
                context.events.emit(BridgeEvent::PayloadData(sample));
            }
            Err(error) => warn!("payload decode failed: {}", error),
        },
        ChannelId::Judging => unreachable!("judging channel has no inbound frames"),
    }
}
