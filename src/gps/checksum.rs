// src/gps/checksum.rs
//! NMEA checksum trailer verification

use crate::error::Rejection;

/// XOR of every byte in `payload`.
pub fn checksum_of(payload: &str) -> u8 {
    payload.bytes().fold(0u8, |acc, byte| acc ^ byte)
}

/// Format a checksum the way it appears after `*`.
pub fn format_checksum(checksum: u8) -> String {
    format!("{:02X}", checksum)
}

/// Check the `*HH` trailer of a sentence and report why it fails, if it does.
///
/// The XOR covers every byte strictly between the first `$` and the first
/// `*` that follows it. Anything after the two hex digits is ignored.
pub fn validate_checksum(sentence: &str) -> Result<(), Rejection> {
    let start = sentence.find('$').ok_or(Rejection::MissingStart)? + 1;
    let body = &sentence[start..];
    let star = body.find('*').ok_or(Rejection::MissingChecksum)?;

    let trailer = body
        .as_bytes()
        .get(star + 1..star + 3)
        .ok_or(Rejection::MalformedChecksum)?;
    let expected = parse_hex_byte(trailer).ok_or(Rejection::MalformedChecksum)?;

    let computed = checksum_of(&body[..star]);
    if computed == expected {
        Ok(())
    } else {
        Err(Rejection::ChecksumMismatch { computed, expected })
    }
}

/// `true` iff the sentence carries a well-formed, matching checksum trailer.
pub fn verify_checksum(sentence: &str) -> bool {
    validate_checksum(sentence).is_ok()
}

fn parse_hex_byte(digits: &[u8]) -> Option<u8> {
    let high = hex_value(*digits.first()?)?;
    let low = hex_value(*digits.get(1)?)?;
    Some(high << 4 | low)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
