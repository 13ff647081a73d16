//! Sense wires and the per-plane wire table.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single sense wire of a chamber plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wire {
    /// Wire number (dense, 0..N-1).
    pub num: u32,
    /// Position along the measurement coordinate (meters).
    pub pos: f64,
    /// Per-wire timing offset (seconds).
    pub timing_offset: f64,
    /// TDC resolution (seconds per count).
    pub timing_resolution: f64,
}

impl Wire {
    /// Creates a new wire.
    #[inline]
    #[must_use]
    pub fn new(num: u32, pos: f64, timing_offset: f64, timing_resolution: f64) -> Self {
        Self {
            num,
            pos,
            timing_offset,
            timing_resolution,
        }
    }

    /// Converts a raw TDC count on this wire to a calibrated time in seconds.
    #[inline]
    #[must_use]
    pub fn calibrate(&self, raw_time: i32) -> f64 {
        f64::from(raw_time) * self.timing_resolution + self.timing_offset
    }
}

/// Immutable table of all wires in one plane, indexed by wire number.
///
/// Built once per calibration epoch. Hits refer into the table by wire
/// number, so offsets and resolution have a single source of truth.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireTable {
    wires: Vec<Wire>,
}

impl WireTable {
    /// Builds `count` wires at `first_pos + i * spacing` with per-wire offsets
    /// and a shared resolution.
    ///
    /// # Errors
    /// Returns [`Error::OffsetCountMismatch`] if `offsets.len() != count`, or
    /// [`Error::ConfigError`] if the resolution is not finite and positive or
    /// the count does not fit a wire number.
    pub fn build(
        count: usize,
        first_pos: f64,
        spacing: f64,
        offsets: &[f64],
        resolution: f64,
    ) -> Result<Self> {
        if offsets.len() != count {
            return Err(Error::OffsetCountMismatch {
                expected: count,
                found: offsets.len(),
            });
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(Error::ConfigError(format!(
                "TDC resolution must be positive, got {resolution}"
            )));
        }
        if u32::try_from(count).is_err() {
            return Err(Error::ConfigError(format!("too many wires: {count}")));
        }

        let wires = offsets
            .iter()
            .zip(0u32..)
            .map(|(&offset, num)| {
                Wire::new(
                    num,
                    first_pos + f64::from(num) * spacing,
                    offset,
                    resolution,
                )
            })
            .collect();

        Ok(Self { wires })
    }

    /// Resolves a logical wire number coming from the channel map.
    ///
    /// # Errors
    /// Returns [`Error::WireOutOfRange`] if `wire` is not in `[0, len)`.
    #[inline]
    pub fn lookup(&self, wire: i32) -> Result<&Wire> {
        usize::try_from(wire)
            .ok()
            .and_then(|idx| self.wires.get(idx))
            .ok_or(Error::WireOutOfRange {
                wire: i64::from(wire),
                count: self.wires.len(),
            })
    }

    /// Returns the wire with the given number, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, num: u32) -> Option<&Wire> {
        self.wires.get(num as usize)
    }

    /// Returns the number of wires.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns true if the table holds no wires.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Returns all wires ordered by number.
    #[must_use]
    pub fn as_slice(&self) -> &[Wire] {
        &self.wires
    }

    /// Returns an iterator over the wires.
    pub fn iter(&self) -> impl Iterator<Item = &Wire> {
        self.wires.iter()
    }
}
