//! Error types for wirechamber-core.

use thiserror::Error;

/// Result type alias for wirechamber operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for wirechamber operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Per-wire timing offsets do not cover every wire.
    #[error("timing offset count mismatch: expected {expected} offsets, found {found}")]
    OffsetCountMismatch { expected: usize, found: usize },

    /// Position vector with the wrong number of components.
    #[error("invalid geometry: position vector has {0} components, expected 3")]
    InvalidGeometry(usize),

    /// Logical wire number outside the configured wire table.
    #[error("wire {wire} out of range for plane with {count} wires")]
    WireOutOfRange { wire: i64, count: usize },

    /// Hit routed to a plane that does not exist.
    #[error("unknown plane index: {0}")]
    UnknownPlane(usize),

    /// Two planes configured with the same name.
    #[error("duplicate plane name: {0}")]
    DuplicatePlane(String),
}
