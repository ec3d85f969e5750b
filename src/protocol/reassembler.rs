//! # Frame Reassembler
//!
//! Sliding-window scanner that recovers fixed-length frames from an
//! unreliable serial byte stream. Shared by the avionics and payload
//! inbound channels, each with its own header/footer/length configuration.
//!
//! Resynchronization policy:
//! - No header byte anywhere: the whole buffer is garbage, discard it.
//! - Header found but fewer than `length` bytes available: wait for more
//!   data, keeping everything from the header onward.
//! - Footer byte wrong at the trailing offset: the header was a false
//!   positive, slide forward a single byte and rescan.
//! - Checksum mismatch on a complete candidate: the frame is consumed in
//!   full (no single-byte slide) and reported as corrupt.

use super::checksum::sum_mod_256;
use super::FrameError;
use bytes::{Buf, BytesMut};

/// Fixed geometry of one frame type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Leading marker byte
    pub header: u8,
    /// Trailing marker byte at `length - 1`
    pub footer: u8,
    /// Total frame length in bytes, checksum at `length - 2`
    pub length: usize,
}

/// Stream scanner for one inbound channel
///
/// Owns the channel's receive accumulator. Feed raw serial reads in,
/// get back zero or more complete frames (or checksum failures) per call.
#[derive(Debug)]
pub struct FrameReassembler {
    layout: FrameLayout,
    buffer: BytesMut,
}

impl FrameReassembler {
    /// Create a reassembler for the given frame geometry
    pub fn new(layout: FrameLayout) -> Self {
        Self {
            layout,
            buffer: BytesMut::new(),
        }
    }

    /// Append newly received bytes and extract every complete frame
    ///
    /// # Arguments
    ///
    /// * `new_bytes` - Raw bytes as they arrived from the serial port
    ///
    /// # Returns
    ///
    /// * `Vec<Result<Vec<u8>, FrameError>>` - In stream order: `Ok` with the
    ///   full frame (header through footer) for each checksum-valid frame,
    ///   `Err(ChecksumMismatch)` for each consumed-but-corrupt frame
    pub fn feed(&mut self, new_bytes: &[u8]) -> Vec<Result<Vec<u8>, FrameError>> {
        self.buffer.extend_from_slice(new_bytes);
        let mut results = Vec::new();

        loop {
            let Some(header_index) = self
                .buffer
                .iter()
                .position(|&byte| byte == self.layout.header)
            else {
                // No header anywhere, nothing useful remains
                self.buffer.clear();
                break;
            };

            // Drop leading garbage so the candidate starts the buffer
            if header_index > 0 {
                self.buffer.advance(header_index);
            }

            if self.buffer.len() < self.layout.length {
                // Partial candidate, wait for more bytes
                break;
            }

            if self.buffer[self.layout.length - 1] != self.layout.footer {
                // False-positive header: slide exactly one byte and rescan
                self.buffer.advance(1);
                continue;
            }

            let frame = self.buffer.split_to(self.layout.length);
            let expected = frame[self.layout.length - 2];
            let calculated = sum_mod_256(&frame[..self.layout.length - 2]);

            if calculated == expected {
                results.push(Ok(frame.to_vec()));
            } else {
                results.push(Err(FrameError::ChecksumMismatch {
                    expected,
                    calculated,
                }));
            }
        }

        results
    }

    /// Number of bytes currently buffered awaiting a complete frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Discard any partially accumulated data
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: FrameLayout = FrameLayout {
        header: 0xAB,
        footer: 0x56,
        length: 8,
    };

    /// Build a valid 8-byte test frame around the given payload bytes
    fn valid_frame(payload: [u8; 5]) -> Vec<u8> {
        let mut frame = vec![LAYOUT.header];
        frame.extend_from_slice(&payload);
        frame.push(sum_mod_256(&frame));
        frame.push(LAYOUT.footer);
        frame
    }

    #[test]
    fn test_single_complete_frame() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let frame = valid_frame([1, 2, 3, 4, 5]);

        let results = reassembler.feed(&frame);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], Ok(frame));
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn test_partial_frame_waits_for_more_bytes() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let frame = valid_frame([9, 8, 7, 6, 5]);

        // Deliver byte by byte: nothing may be emitted until the last byte
        for &byte in &frame[..frame.len() - 1] {
            assert!(reassembler.feed(&[byte]).is_empty());
        }
        let results = reassembler.feed(&frame[frame.len() - 1..]);
        assert_eq!(results, vec![Ok(frame)]);
    }

    #[test]
    fn test_garbage_without_header_is_discarded() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let results = reassembler.feed(&[0x00, 0x11, 0x22, 0x33]);
        assert!(results.is_empty());
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn test_garbage_before_frame_is_skipped() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let frame = valid_frame([1, 1, 2, 3, 5]);

        let mut stream = vec![0x00, 0x42, 0x13];
        stream.extend_from_slice(&frame);

        let results = reassembler.feed(&stream);
        assert_eq!(results, vec![Ok(frame)]);
    }

    #[test]
    fn test_false_positive_header_advances_one_byte() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let frame = valid_frame([4, 4, 4, 4, 4]);

        // A header byte followed by a non-footer byte at the trailing
        // offset, then the real frame. The scanner must slide past the
        // bogus header one byte at a time and still find the real frame.
        let mut stream = vec![LAYOUT.header, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        stream.extend_from_slice(&frame);

        let results = reassembler.feed(&stream);
        assert_eq!(results, vec![Ok(frame)]);
    }

    #[test]
    fn test_checksum_mismatch_consumes_whole_frame() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let mut corrupt = valid_frame([1, 2, 3, 4, 5]);
        corrupt[3] ^= 0xFF; // tamper a payload byte, footer untouched
        let good = valid_frame([6, 7, 8, 9, 10]);

        let mut stream = corrupt.clone();
        stream.extend_from_slice(&good);

        let results = reassembler.feed(&stream);
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(FrameError::ChecksumMismatch { .. })
        ));
        assert_eq!(results[1], Ok(good));
        // The corrupt frame was consumed in full, not re-scanned byte-wise
        assert_eq!(reassembler.pending(), 0);
    }

    #[test]
    fn test_two_frames_in_one_feed() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let first = valid_frame([1, 0, 0, 0, 0]);
        let second = valid_frame([2, 0, 0, 0, 0]);

        let mut stream = first.clone();
        stream.extend_from_slice(&second);

        let results = reassembler.feed(&stream);
        assert_eq!(results, vec![Ok(first), Ok(second)]);
    }

    #[test]
    fn test_buffer_retained_from_header_onward() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        let results = reassembler.feed(&[0x99, LAYOUT.header, 0x01, 0x02]);
        assert!(results.is_empty());
        // Leading garbage dropped, candidate bytes kept
        assert_eq!(reassembler.pending(), 3);
    }

    #[test]
    fn test_clear_discards_partial_data() {
        let mut reassembler = FrameReassembler::new(LAYOUT);
        reassembler.feed(&[LAYOUT.header, 0x01]);
        assert_eq!(reassembler.pending(), 2);
        reassembler.clear();
        assert_eq!(reassembler.pending(), 0);
    }
}
