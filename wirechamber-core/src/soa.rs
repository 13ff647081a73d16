//! Structure of Arrays (`SoA`) export record for one plane and one event.
//!
//! The hit columns are positionally aligned with each other, and so are the
//! group columns. Downstream exporters read the named fields directly.

use crate::{Hit, HitGroup, WireTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-event output arrays of one plane.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneOutput {
    /// Raw TDC counts of all hits.
    pub hit_raw_time: Vec<i32>,
    /// Calibrated times of all hits (seconds).
    pub hit_time: Vec<f64>,
    /// Wire numbers of all hits.
    pub hit_wire: Vec<u32>,
    /// Wire positions of all hits (meters).
    pub hit_pos: Vec<f64>,
    /// First wire of each group.
    pub group_start_wire: Vec<u32>,
    /// Last wire of each group.
    pub group_end_wire: Vec<u32>,
    /// Inclusive wire span of each group.
    pub group_span: Vec<u32>,
    /// Number of hits in each group.
    pub group_hit_count: Vec<usize>,
}

impl PlaneOutput {
    /// Creates an empty record with room for the given hit and group counts.
    #[must_use]
    pub fn with_capacity(hits: usize, groups: usize) -> Self {
        Self {
            hit_raw_time: Vec::with_capacity(hits),
            hit_time: Vec::with_capacity(hits),
            hit_wire: Vec::with_capacity(hits),
            hit_pos: Vec::with_capacity(hits),
            group_start_wire: Vec::with_capacity(groups),
            group_end_wire: Vec::with_capacity(groups),
            group_span: Vec::with_capacity(groups),
            group_hit_count: Vec::with_capacity(groups),
        }
    }

    /// Fills a record from a plane's wire table and event state.
    ///
    /// Hits whose wire is missing from `wires` get a NaN position.
    #[must_use]
    pub fn from_event(wires: &WireTable, hits: &[Hit], groups: &[HitGroup]) -> Self {
        let mut output = Self::with_capacity(hits.len(), groups.len());
        for hit in hits {
            let pos = wires.get(hit.wire).map_or(f64::NAN, |wire| wire.pos);
            output.push_hit(hit, pos);
        }
        for group in groups {
            output.push_group(group);
        }
        output
    }

    /// Returns the number of hits.
    #[must_use]
    pub fn num_hits(&self) -> usize {
        self.hit_wire.len()
    }

    /// Returns the number of groups.
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.group_start_wire.len()
    }

    /// Returns true if the record holds neither hits nor groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hit_wire.is_empty() && self.group_start_wire.is_empty()
    }

    /// Pushes a single hit with its wire position.
    pub fn push_hit(&mut self, hit: &Hit, pos: f64) {
        self.hit_raw_time.push(hit.raw_time);
        self.hit_time.push(hit.calibrated_time);
        self.hit_wire.push(hit.wire);
        self.hit_pos.push(pos);
    }

    /// Pushes a single group.
    pub fn push_group(&mut self, group: &HitGroup) {
        self.group_start_wire.push(group.start_wire);
        self.group_end_wire.push(group.end_wire);
        self.group_span.push(group.span());
        self.group_hit_count.push(group.hit_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_event_alignment() {
        let wires = WireTable::build(3, 0.1, 0.01, &[0.0; 3], 0.5e-9).unwrap();
        let hits = [Hit::new(0, 400, 2e-7), Hit::new(1, 300, 1.5e-7)];
        let groups = [HitGroup::new(0, 2, 0, 1)];

        let output = PlaneOutput::from_event(&wires, &hits, &groups);
        assert_eq!(output.num_hits(), 2);
        assert_eq!(output.num_groups(), 1);
        assert_eq!(output.hit_wire, vec![0, 1]);
        assert_eq!(output.hit_raw_time, vec![400, 300]);
        assert!((output.hit_pos[1] - 0.11).abs() < 1e-12);
        assert_eq!(output.group_span, vec![2]);
        assert_eq!(output.group_hit_count, vec![2]);
    }

    #[test]
    fn test_is_empty() {
        let mut output = PlaneOutput::with_capacity(4, 1);
        assert!(output.is_empty());
        output.push_group(&HitGroup::new(0, 1, 3, 3));
        assert!(!output.is_empty());
        assert_eq!(output.num_hits(), 0);
    }
}
