//! wirechamber-core: Core types for drift chamber plane processing.
//!
//! This crate provides the wire table, hit decoding and ordering, and the
//! group types shared by grouping algorithms and plane containers.
//!

pub mod decoder;
pub mod error;
pub mod grouping;
pub mod hit;
pub mod ordering;
pub mod soa;
pub mod wire;

pub use decoder::{HitDecoder, TimeGate};
pub use error::{Error, Result};
pub use grouping::{GroupingConfig, GroupingStatistics, HitGroup, HitGrouping};
pub use hit::{Hit, RawHit};
pub use ordering::{hit_order, is_sorted, sort_hits};
pub use soa::PlaneOutput;
pub use wire::{Wire, WireTable};
