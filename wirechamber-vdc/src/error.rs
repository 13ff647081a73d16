//! VDC-specific error types.

use thiserror::Error;

/// Result type for VDC operations.
pub type Result<T> = std::result::Result<T, Error>;

/// VDC-specific error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed database or missing required key.
    #[error("invalid database: {0}")]
    Database(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] wirechamber_core::Error),

    /// Decoding failure inside a numbered event.
    #[error("event {event}: {source}")]
    Event {
        event: u64,
        #[source]
        source: wirechamber_core::Error,
    },
}
