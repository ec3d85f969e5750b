//! # Judging Uplink Sink
//!
//! Write side of the HYI judging channel. The transmitter hands complete
//! wire frames to a [`FrameSink`]; the production sink pushes each frame
//! through an open serial port and flushes it, so a frame is either fully
//! on the wire or reported failed with the underlying I/O error kind.

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

/// One-frame-at-a-time write seam for the judging uplink
///
/// Errors keep their [`io::ErrorKind`] so the caller can tell a vanished
/// device apart from a transient write failure.
#[async_trait]
pub trait FrameSink: Send {
    /// Write one complete frame and flush it out of the OS buffer
    async fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

/// Production sink over an open serial port
pub struct SerialFrameSink {
    port: tokio_serial::SerialStream,
}

impl SerialFrameSink {
    pub fn new(port: tokio_serial::SerialStream) -> Self {
        Self { port }
    }
}

#[async_trait]
impl FrameSink for SerialFrameSink {
    async fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        self.port.write_all(frame).await?;
        self.port.flush().await
    }
}
