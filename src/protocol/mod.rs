//! # Wire Protocol Module
//!
//! Frame layouts, checksum arithmetic and codecs for the three serial
//! protocols the bridge speaks:
//!
//! - Avionics downlink (header `0xAB`, 52 bytes)
//! - Payload downlink (header `0xAA`, 27 bytes)
//! - HYI judging uplink (78 bytes, fixed sync + CR/LF terminator)

pub mod avionics;
pub mod checksum;
pub mod hyi;
pub mod payload;
pub mod reassembler;

pub use reassembler::{FrameLayout, FrameReassembler};

use thiserror::Error;

/// Errors produced while scanning a byte stream for frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Frame had a valid header and footer but the checksum byte did not
    /// match the computed sum
    #[error("checksum mismatch: frame carries 0x{expected:02X}, computed 0x{calculated:02X}")]
    ChecksumMismatch {
        /// Checksum byte carried by the frame
        expected: u8,
        /// Sum of header-through-payload bytes modulo 256
        calculated: u8,
    },
}

/// Read a little-endian f32 out of a payload region
///
/// Panics if `offset + 4` exceeds `payload.len()`; callers validate frame
/// length before field extraction.
pub(crate) fn read_f32_le(payload: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}
