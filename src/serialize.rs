// src/serialize.rs
//! Ordered key/value records for transport

use crate::gps::data::{CombinedFix, FixDetail, LatHemisphere, LonHemisphere, PositionFix};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_DEVICE_ID: &str = "06ABC123";
pub const DEFAULT_ROUTE_ID: u32 = 1;

/// Constant fields stamped on every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub route_id: u32,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            route_id: DEFAULT_ROUTE_ID,
        }
    }
}

pub type Record = Map<String, Value>;

fn char_value(c: char) -> Value {
    Value::String(c.to_string())
}

fn unit_value(unit: Option<char>) -> Value {
    Value::String(unit.map(String::from).unwrap_or_default())
}

/// Real numbers always serialize as numbers; non-finite values become zero.
fn real_value(value: f64) -> Value {
    if value.is_finite() {
        value.into()
    } else {
        0.0.into()
    }
}

/// RMC record: id, time_utc, status, latitude, lat_hemi, longitude,
/// lon_hemi, speed_knots, track_angle, date_utc
pub fn serialize_rmc(fix: &PositionFix, identity: &DeviceIdentity) -> Record {
    let mut record = Map::new();
    record.insert("id".into(), identity.device_id.clone().into());
    record.insert("time_utc".into(), real_value(fix.time_utc));
    record.insert("status".into(), char_value(fix.status.as_char()));
    record.insert("latitude".into(), real_value(fix.latitude));
    record.insert("lat_hemi".into(), char_value(fix.lat_hemi.as_char()));
    record.insert("longitude".into(), real_value(fix.longitude));
    record.insert("lon_hemi".into(), char_value(fix.lon_hemi.as_char()));
    record.insert("speed_knots".into(), real_value(fix.speed_knots));
    record.insert("track_angle".into(), real_value(fix.track_angle));
    record.insert("date_utc".into(), fix.date_utc.into());
    record
}

/// GGA record: id, time_utc, latitude, lat_hemi, longitude, lon_hemi,
/// fix_quality, num_satellites, hdop, altitude_msl, alt_unit, geoid_sep,
/// geo_sep_unit
pub fn serialize_gga(fix: &FixDetail, identity: &DeviceIdentity) -> Record {
    let mut record = Map::new();
    record.insert("id".into(), identity.device_id.clone().into());
    record.insert("time_utc".into(), real_value(fix.time_utc));
    record.insert("latitude".into(), real_value(fix.latitude));
    record.insert("lat_hemi".into(), unit_value(fix.lat_hemi.map(LatHemisphere::as_char)));
    record.insert("longitude".into(), real_value(fix.longitude));
    record.insert("lon_hemi".into(), unit_value(fix.lon_hemi.map(LonHemisphere::as_char)));
    record.insert("fix_quality".into(), fix.fix_quality.into());
    record.insert("num_satellites".into(), fix.num_satellites.into());
    record.insert("hdop".into(), real_value(fix.hdop));
    record.insert("altitude_msl".into(), real_value(fix.altitude_msl));
    record.insert("alt_unit".into(), unit_value(fix.alt_unit));
    record.insert("geoid_sep".into(), real_value(fix.geoid_sep));
    record.insert("geo_sep_unit".into(), unit_value(fix.geo_sep_unit));
    record
}

/// Combined record. `timestamp_ms` is supplied by the transport side.
pub fn serialize_combined(
    fix: &CombinedFix,
    identity: &DeviceIdentity,
    timestamp_ms: i64,
) -> Record {
    let mut record = Map::new();
    record.insert("id".into(), identity.device_id.clone().into());
    record.insert("latitude".into(), real_value(fix.latitude));
    record.insert("lat_hemi".into(), unit_value(fix.lat_hemi.map(LatHemisphere::as_char)));
    record.insert("longitude".into(), real_value(fix.longitude));
    record.insert("lon_hemi".into(), unit_value(fix.lon_hemi.map(LonHemisphere::as_char)));
    record.insert("num_satellites".into(), fix.num_satellites.into());
    record.insert("altitude_msl".into(), real_value(fix.altitude_msl));
    record.insert("alt_unit".into(), unit_value(fix.alt_unit));
    record.insert("speed_knots".into(), real_value(fix.speed_knots));
    record.insert("track_angle".into(), real_value(fix.track_angle));
    record.insert("status".into(), char_value(fix.status.as_char()));
    record.insert("date_utc".into(), fix.date_utc.into());
    record.insert("time_utc".into(), real_value(fix.time_utc));
    record.insert("timestamp".into(), timestamp_ms.into());
    record.insert("route_id".into(), identity.route_id.into());
    record
}
