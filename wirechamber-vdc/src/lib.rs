//! wirechamber-vdc: Vertical drift chamber planes and chambers.
//!
//! This crate ties the core decoding types and the grouping algorithm into
//! per-plane event containers, loads the plane database, and exposes the
//! host lifecycle hooks.
//!
//! # Key Components
//!
//! - [`PlaneConfig`] / [`ChamberConfig`] - JSON database records
//! - [`Plane`] - wire table plus per-event hits and groups
//! - [`Chamber`] - independent planes fed from one event stream
//! - [`Detector`] - host lifecycle hooks
//!
//! # Processing Pipeline
//!
//! 1. `begin_event` clears the previous event
//! 2. each channel hit is resolved, gated and calibrated
//! 3. `finalize_event` sorts hits by (wire, descending raw time) and forms groups

mod chamber;
pub mod config;
mod detector;
mod error;
mod plane;

pub use chamber::{Chamber, PlaneHit, RawEvent};
pub use config::{ChamberConfig, PlaneConfig};
pub use detector::Detector;
pub use error::{Error, Result};
pub use plane::{Plane, PlaneStatistics};

// Re-export core types for convenience
pub use wirechamber_core::{Hit, HitGroup, PlaneOutput, RawHit, Wire};
