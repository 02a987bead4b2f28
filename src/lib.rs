// src/lib.rs
//! NMEA Relay Library
//!
//! Decodes NMEA-0183 RMC and GGA sentences from a GPS receiver, merges each
//! RMC/GGA pair into one fix, and turns the results into ordered key/value
//! records for transport.

pub mod config;
pub mod error;
pub mod gps;
pub mod logging;
pub mod relay;
pub mod serialize;

// Re-export main types for convenience
pub use error::{Rejection, RelayError, Result};
pub use gps::{
    decode_gga, decode_rmc, decode_sentence, verify_checksum, CombinedFix, FixDetail, FixMerger,
    PositionFix, Sentence,
};
pub use relay::{JsonLineSink, MemorySink, RecordSink, Relay, RelayMode, RelayStats};
pub use serialize::{serialize_combined, serialize_gga, serialize_rmc, DeviceIdentity, Record};
