//! # Modulo-256 Checksum
//!
//! Checksum arithmetic shared by all three wire protocols: the plain sum of
//! the covered bytes, reduced modulo 256.
//!
//! Inbound frames cover header through the last payload byte (everything
//! before the checksum byte itself). The outbound HYI frame covers bytes
//! 4..=74 (team id through parachute flag).

/// Sum of all bytes modulo 256
///
/// # Arguments
///
/// * `data` - Byte slice to sum
///
/// # Returns
///
/// * `u8` - Wrapping byte sum
///
/// # Examples
///
/// ```
/// use gs_bridge::protocol::checksum::sum_mod_256;
///
/// assert_eq!(sum_mod_256(&[0x01, 0x02, 0x03]), 0x06);
/// assert_eq!(sum_mod_256(&[0xFF, 0x02]), 0x01);
/// ```
pub fn sum_mod_256(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}
