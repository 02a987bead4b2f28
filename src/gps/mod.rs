// src/gps/mod.rs
//! NMEA sentence decoding and RMC/GGA merging

pub mod checksum;
pub mod coordinate;
pub mod data;
pub mod lenient;
pub mod merge;
pub mod nmea;
pub mod tokenizer;

pub use checksum::verify_checksum;
pub use coordinate::to_decimal_degrees;
pub use data::{CombinedFix, FixDetail, FixStatus, LatHemisphere, LonHemisphere, PositionFix, Sentence};
pub use merge::{FixMerger, MergeState};
pub use nmea::{decode_gga, decode_rmc, decode_sentence};
pub use tokenizer::tokenize;
