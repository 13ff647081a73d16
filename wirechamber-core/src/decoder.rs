//! Raw channel decoding: wire resolution, gating and calibration.

use crate::{Hit, Result, WireTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed interval of admissible raw TDC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeGate {
    /// Smallest accepted raw count.
    pub min: i32,
    /// Largest accepted raw count.
    pub max: i32,
}

impl Default for TimeGate {
    fn default() -> Self {
        Self {
            min: 0,
            max: i32::MAX,
        }
    }
}

impl TimeGate {
    /// Creates a new gate.
    #[inline]
    #[must_use]
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns true if `raw_time` lies inside `[min, max]`.
    #[inline]
    #[must_use]
    pub fn contains(&self, raw_time: i32) -> bool {
        (self.min..=self.max).contains(&raw_time)
    }
}

/// Converts (wire, raw count) pairs into calibrated hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitDecoder {
    gate: TimeGate,
}

impl HitDecoder {
    /// Creates a decoder with the given gate.
    #[must_use]
    pub fn new(gate: TimeGate) -> Self {
        Self { gate }
    }

    /// Returns the gate in use.
    #[must_use]
    pub fn gate(&self) -> TimeGate {
        self.gate
    }

    /// Decodes one channel hit.
    ///
    /// Returns `Ok(None)` for counts outside the gate; those are routine noise.
    ///
    /// # Errors
    /// Returns [`Error::WireOutOfRange`](crate::Error::WireOutOfRange) if the
    /// wire number is not in the table.
    #[inline]
    pub fn decode(&self, table: &WireTable, wire: i32, raw_time: i32) -> Result<Option<Hit>> {
        let wire = table.lookup(wire)?;
        if !self.gate.contains(raw_time) {
            return Ok(None);
        }
        Ok(Some(Hit::new(wire.num, raw_time, wire.calibrate(raw_time))))
    }
}
