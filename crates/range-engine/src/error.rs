//! Error types for range-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;
