//! Hit types for drift chamber timing data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One digitized channel hit as delivered by the channel map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawHit {
    /// Logical wire number (may be invalid if the channel map is inconsistent).
    pub wire: i32,
    /// Raw TDC count.
    pub raw_time: i32,
    /// Hit index within the channel. Informational only.
    pub sequence: u32,
}

impl RawHit {
    /// Creates a new raw hit.
    #[inline]
    #[must_use]
    pub fn new(wire: i32, raw_time: i32, sequence: u32) -> Self {
        Self {
            wire,
            raw_time,
            sequence,
        }
    }
}

/// A calibrated timing measurement on one wire in one event.
///
/// The wire is referenced by number, which indexes the plane's
/// [`WireTable`](crate::WireTable).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// Wire number in the owning wire table.
    pub wire: u32,
    /// Raw TDC count (common stop: smaller counts are later times).
    pub raw_time: i32,
    /// Calibrated time in seconds.
    pub calibrated_time: f64,
}

impl Hit {
    /// Creates a new hit.
    #[inline]
    #[must_use]
    pub fn new(wire: u32, raw_time: i32, calibrated_time: f64) -> Self {
        Self {
            wire,
            raw_time,
            calibrated_time,
        }
    }

    /// Wire-number distance from `earlier` to this hit.
    ///
    /// Saturates at zero when `earlier` sits on a higher wire.
    #[inline]
    #[must_use]
    pub fn wire_gap(&self, earlier: &Self) -> u32 {
        self.wire.saturating_sub(earlier.wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_hit() {
        let raw = RawHit::new(12, 1500, 1);
        assert_eq!(raw.wire, 12);
        assert_eq!(raw.raw_time, 1500);
        assert_eq!(raw.sequence, 1);
    }

    #[test]
    fn test_wire_gap() {
        let a = Hit::new(12, 100, 0.0);
        let b = Hit::new(16, 100, 0.0);
        assert_eq!(b.wire_gap(&a), 4);
        assert_eq!(a.wire_gap(&a), 0);
        assert_eq!(a.wire_gap(&b), 0);
    }
}
