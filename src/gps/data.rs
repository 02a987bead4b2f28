// src/gps/data.rs
//! Decoded GPS records

use serde::Serialize;

/// RMC fix validity flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixStatus {
    Active,
    Void,
}

impl FixStatus {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(FixStatus::Active),
            'V' => Some(FixStatus::Void),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            FixStatus::Active => 'A',
            FixStatus::Void => 'V',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LatHemisphere {
    North,
    South,
}

impl LatHemisphere {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(LatHemisphere::North),
            'S' => Some(LatHemisphere::South),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LatHemisphere::North => 'N',
            LatHemisphere::South => 'S',
        }
    }

    /// Apply this hemisphere's sign to an unsigned magnitude.
    pub fn apply(self, degrees: f64) -> f64 {
        match self {
            LatHemisphere::North => degrees,
            LatHemisphere::South => -degrees,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LonHemisphere {
    East,
    West,
}

impl LonHemisphere {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'E' => Some(LonHemisphere::East),
            'W' => Some(LonHemisphere::West),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LonHemisphere::East => 'E',
            LonHemisphere::West => 'W',
        }
    }

    pub fn apply(self, degrees: f64) -> f64 {
        match self {
            LonHemisphere::East => degrees,
            LonHemisphere::West => -degrees,
        }
    }
}

/// Recommended Minimum (RMC) fix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFix {
    pub time_utc: f64,          // hhmmss.ss as a number
    pub status: FixStatus,
    pub latitude: f64,          // signed decimal degrees
    pub lat_hemi: LatHemisphere,
    pub longitude: f64,         // signed decimal degrees
    pub lon_hemi: LonHemisphere,
    pub speed_knots: f64,
    pub track_angle: f64,       // degrees true
    pub date_utc: u32,          // DDMMYY, not decomposed
}

/// GPS fix data (GGA)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixDetail {
    pub time_utc: f64,
    pub latitude: f64,
    pub lat_hemi: Option<LatHemisphere>,   // empty until the receiver has a fix
    pub longitude: f64,
    pub lon_hemi: Option<LonHemisphere>,
    pub fix_quality: i32,
    pub num_satellites: u32,
    pub hdop: f64,
    pub altitude_msl: f64,
    pub alt_unit: Option<char>,
    pub geoid_sep: f64,
    pub geo_sep_unit: Option<char>,
}

impl FixDetail {
    /// Check if the receiver reports any kind of position fix
    pub fn has_fix(&self) -> bool {
        self.fix_quality > 0
    }

    /// Get fix type description
    pub fn fix_description(&self) -> String {
        match self.fix_quality {
            0 => "No fix".to_string(),
            1 => "GPS".to_string(),
            2 => "DGPS".to_string(),
            3 => "PPS".to_string(),
            4 => "RTK".to_string(),
            5 => "Float RTK".to_string(),
            6 => "Estimated".to_string(),
            7 => "Manual".to_string(),
            8 => "Simulation".to_string(),
            quality => format!("Unknown ({})", quality),
        }
    }
}

/// One GPS epoch: position and quality from GGA, motion and date from RMC
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedFix {
    pub latitude: f64,
    pub lat_hemi: Option<LatHemisphere>,
    pub longitude: f64,
    pub lon_hemi: Option<LonHemisphere>,
    pub num_satellites: u32,
    pub altitude_msl: f64,
    pub alt_unit: Option<char>,
    pub speed_knots: f64,
    pub track_angle: f64,
    pub status: FixStatus,
    pub date_utc: u32,
    pub time_utc: f64,
}

impl CombinedFix {
    pub fn new(gga: &FixDetail, rmc: &PositionFix) -> Self {
        Self {
            latitude: gga.latitude,
            lat_hemi: gga.lat_hemi,
            longitude: gga.longitude,
            lon_hemi: gga.lon_hemi,
            num_satellites: gga.num_satellites,
            altitude_msl: gga.altitude_msl,
            alt_unit: gga.alt_unit,
            speed_knots: rmc.speed_knots,
            track_angle: rmc.track_angle,
            status: rmc.status,
            date_utc: rmc.date_utc,
            time_utc: rmc.time_utc,
        }
    }
}

/// A decoded sentence of either supported kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sentence {
    Rmc(PositionFix),
    Gga(FixDetail),
}

impl Sentence {
    pub fn kind(&self) -> &'static str {
        match self {
            Sentence::Rmc(_) => "RMC",
            Sentence::Gga(_) => "GGA",
        }
    }
}
