use thiserror::Error;

/// Errors raised by the counting engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// A blob handed over by the detector has malformed geometry.
    #[error("invalid blob #{index}: {reason}")]
    InvalidBlob { index: usize, reason: String },
    /// Creating the requested vehicles would overflow the id counter.
    #[error("vehicle id space exhausted (next id {next_id}, {requested} requested)")]
    IdentitySpaceExhausted { next_id: u64, requested: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("can't parse configuration: {0}")]
    ConfigParse(String),
}
