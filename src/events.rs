//! # Notification Events
//!
//! Typed, fire-and-forget events the core emits toward the UI layer
//! (WebSocket transport and front end are external collaborators; they see
//! these serialized as tagged JSON). Nothing in the core waits for an
//! acknowledgment, and a missing subscriber is never an error.

use crate::channel::ChannelId;
use crate::protocol::avionics::AvionicsSample;
use crate::protocol::payload::PayloadSample;
use serde::Serialize;
use tokio::sync::mpsc;

/// Everything the bridge reports outward
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum BridgeEvent {
    /// A channel's serial endpoint opened
    Connected { channel: ChannelId, path: String },

    /// A channel's serial endpoint closed (requested or unplugged)
    Disconnected { channel: ChannelId },

    /// A channel-level failure (open error, read error)
    ChannelError { channel: ChannelId, message: String },

    /// A channel's monotonic error counter changed
    ErrorCountUpdated { channel: ChannelId, count: u64 },

    /// One successfully decoded avionics frame
    AvionicsData(AvionicsSample),

    /// One successfully decoded payload frame
    PayloadData(PayloadSample),

    /// One HYI frame written, with the post-increment sequence value
    HyiSent { sequence: u8 },

    /// An HYI frame write failed
    HyiSendError { message: String },
}

impl BridgeEvent {
    /// Serialize to the tagged JSON shape the UI transport forwards
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// Fire-and-forget sender side of the notification channel
///
/// Cloned into every channel task and the transmitter. Dropped receivers
/// are ignored: the core keeps running with nobody listening.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<BridgeEvent>,
}

impl EventSender {
    /// Create a connected sender/receiver pair
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit one event, ignoring a closed receiver
    pub fn emit(&self, event: BridgeEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_kebab_case_tags() {
        let event = BridgeEvent::Connected {
            channel: ChannelId::Avionics,
            path: "/dev/ttyUSB0".to_string(),
        };
        let json = event.to_json();
        assert!(json.contains("\"type\":\"connected\""), "got {}", json);
        assert!(json.contains("avionics"), "got {}", json);

        let event = BridgeEvent::HyiSent { sequence: 42 };
        assert!(event.to_json().contains("\"type\":\"hyi-sent\""));

        let event = BridgeEvent::ErrorCountUpdated {
            channel: ChannelId::Payload,
            count: 3,
        };
        assert!(event
            .to_json()
            .contains("\"type\":\"error-count-updated\""));
    }

    #[tokio::test]
    async fn test_emit_is_fire_and_forget() {
        let (sender, mut rx) = EventSender::channel();
        sender.emit(BridgeEvent::HyiSent { sequence: 1 });
        assert_eq!(rx.recv().await, Some(BridgeEvent::HyiSent { sequence: 1 }));

        // Dropping the receiver must not make emit fail or panic
        drop(rx);
        sender.emit(BridgeEvent::HyiSent { sequence: 2 });
    }
}
