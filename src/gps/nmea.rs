// src/gps/nmea.rs
//! NMEA sentence decoding for RMC and GGA

use super::{
    checksum::validate_checksum,
    coordinate::to_decimal_degrees,
    data::{FixDetail, FixStatus, LatHemisphere, LonHemisphere, PositionFix, Sentence},
    lenient::{lenient_f64, lenient_i32, lenient_u32},
    tokenizer::{payload_of, tokenize},
};
use crate::error::Rejection;

pub const RMC_MAX_FIELDS: usize = 13;
pub const RMC_MIN_FIELDS: usize = 12;
pub const GGA_MAX_FIELDS: usize = 16;
pub const GGA_MIN_FIELDS: usize = 14;

/// Decode an RMC (Recommended Minimum) sentence.
///
/// Numeric fields that do not parse become zero. A missing or unknown
/// status or hemisphere character rejects the sentence.
pub fn decode_rmc(sentence: &str) -> Result<PositionFix, Rejection> {
    let fields = checked_fields(sentence, "RMC", RMC_MAX_FIELDS, RMC_MIN_FIELDS)?;

    let status = required_char(fields[2], "status", FixStatus::from_char)?;
    let lat_hemi = required_char(fields[4], "lat_hemi", LatHemisphere::from_char)?;
    let lon_hemi = required_char(fields[6], "lon_hemi", LonHemisphere::from_char)?;

    Ok(PositionFix {
        time_utc: lenient_f64(fields[1]),
        status,
        latitude: lat_hemi.apply(to_decimal_degrees(fields[3])),
        lat_hemi,
        longitude: lon_hemi.apply(to_decimal_degrees(fields[5])),
        lon_hemi,
        speed_knots: lenient_f64(fields[7]),
        track_angle: lenient_f64(fields[8]),
        // DDMMYY kept as the token's numeric value, truncated
        date_utc: lenient_f64(fields[9]) as u32,
    })
}

/// Decode a GGA (Global Positioning System Fix Data) sentence.
///
/// An empty or unknown hemisphere is `None` and leaves the coordinate
/// unsigned, as sent by a receiver without a fix.
pub fn decode_gga(sentence: &str) -> Result<FixDetail, Rejection> {
    let fields = checked_fields(sentence, "GGA", GGA_MAX_FIELDS, GGA_MIN_FIELDS)?;

    let lat_hemi = optional_char(fields[3], LatHemisphere::from_char);
    let lon_hemi = optional_char(fields[5], LonHemisphere::from_char);
    let latitude = to_decimal_degrees(fields[2]);
    let longitude = to_decimal_degrees(fields[4]);

    Ok(FixDetail {
        time_utc: lenient_f64(fields[1]),
        latitude: lat_hemi.map_or(latitude, |hemi| hemi.apply(latitude)),
        lat_hemi,
        longitude: lon_hemi.map_or(longitude, |hemi| hemi.apply(longitude)),
        lon_hemi,
        fix_quality: lenient_i32(fields[6]),
        num_satellites: lenient_u32(fields[7]),
        hdop: lenient_f64(fields[8]),
        altitude_msl: lenient_f64(fields[9]),
        alt_unit: fields[10].chars().next(),
        geoid_sep: lenient_f64(fields[11]),
        geo_sep_unit: fields[12].chars().next(),
    })
}

/// Decode any supported sentence, dispatching on its name field.
pub fn decode_sentence(line: &str) -> Result<Sentence, Rejection> {
    let payload = payload_of(line).ok_or(Rejection::MissingStart)?;
    let name = payload.split(',').next().unwrap_or_default();

    match name {
        "GPRMC" | "GNRMC" => decode_rmc(line).map(Sentence::Rmc),
        "GPGGA" | "GNGGA" => decode_gga(line).map(Sentence::Gga),
        other => Err(Rejection::Unsupported(other.to_string())),
    }
}

/// Checksum, strip to `$`, tokenize and enforce the minimum field count.
fn checked_fields<'a>(
    sentence: &'a str,
    kind: &'static str,
    max_fields: usize,
    min_fields: usize,
) -> Result<Vec<&'a str>, Rejection> {
    validate_checksum(sentence)?;
    let payload = payload_of(sentence).ok_or(Rejection::MissingStart)?;

    let fields = tokenize(payload, max_fields);
    if fields.len() < min_fields {
        return Err(Rejection::TooFewFields {
            sentence: kind,
            found: fields.len(),
            required: min_fields,
        });
    }
    Ok(fields)
}

fn required_char<T>(
    token: &str,
    field: &'static str,
    parse: impl FnOnce(char) -> Option<T>,
) -> Result<T, Rejection> {
    let c = token
        .chars()
        .next()
        .ok_or(Rejection::MissingField { field })?;
    parse(c).ok_or_else(|| Rejection::InvalidField {
        field,
        value: token.to_string(),
    })
}

fn optional_char<T>(token: &str, parse: impl FnOnce(char) -> Option<T>) -> Option<T> {
    token.chars().next().and_then(parse)
}
