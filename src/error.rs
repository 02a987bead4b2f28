// src/error.rs
//! Error types for the relay host and rejection reasons for the decoder

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Failures of the host side: reading lines, writing records, loading config.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serial error: {0}")]
    Serial(#[from] tokio_serial::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Why a single sentence was dropped.
///
/// None of these are fatal: the caller discards the line and keeps reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no '$' start delimiter")]
    MissingStart,
    #[error("no '*' checksum delimiter")]
    MissingChecksum,
    #[error("checksum trailer is not two hex digits")]
    MalformedChecksum,
    #[error("checksum mismatch: computed {computed:02X}, trailer says {expected:02X}")]
    ChecksumMismatch { computed: u8, expected: u8 },
    #[error("{sentence} has {found} fields, needs at least {required}")]
    TooFewFields {
        sentence: &'static str,
        found: usize,
        required: usize,
    },
    #[error("field {field} is missing")]
    MissingField { field: &'static str },
    #[error("field {field} has unexpected value {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("unsupported sentence {0:?}")]
    Unsupported(String),
}
