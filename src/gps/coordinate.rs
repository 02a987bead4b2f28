// src/gps/coordinate.rs
//! NMEA `DDMM.MMMM` / `DDDMM.MMMM` coordinate conversion

use super::lenient::lenient_f64;

/// Convert an NMEA latitude/longitude field to unsigned decimal degrees.
///
/// The two digits right before the decimal point start the minutes, every
/// digit before them is degrees. Empty or malformed input yields `0.0`.
/// The hemisphere sign is applied by the caller.
pub fn to_decimal_degrees(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    let Some(dot) = raw.find('.') else {
        return 0.0;
    };
    let Some(minutes_start) = dot.checked_sub(2) else {
        return 0.0;
    };
    if minutes_start == 0 {
        return 0.0;
    }

    match (raw.get(..minutes_start), raw.get(minutes_start..)) {
        (Some(degrees), Some(minutes)) => lenient_f64(degrees) + lenient_f64(minutes) / 60.0,
        _ => 0.0,
    }
}
