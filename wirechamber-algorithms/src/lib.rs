//! wirechamber-algorithms: Group formation algorithms for sorted hit lists.
//!
//! - **Wire gap** - single pass over wire-sorted hits, closing a run when the
//!   wire step exceeds the configured gap, then filtering runs by hit count
//!   and span.
//!
#![warn(missing_docs)]

mod wire_gap;

pub use wire_gap::WireGapGrouping;

// Re-export core grouping traits
pub use wirechamber_core::grouping::{GroupingConfig, GroupingStatistics, HitGroup, HitGrouping};
