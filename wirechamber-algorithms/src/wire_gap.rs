//! Wire-gap grouping.
//!
//! Key characteristics:
//! - Complexity: O(n) over a hit list already sorted by wire
//! - Runs are maximal: a run only closes when the next hit's wire is more
//!   than `max_gap` past the last wire placed in the run
//! - Rejected runs are dropped whole, never split or reassigned
//! - Only wire numbers are consulted; hit times never influence grouping

use log::trace;
use wirechamber_core::grouping::{span, GroupingConfig, GroupingStatistics, HitGroup, HitGrouping};
use wirechamber_core::Hit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An open run while scanning the hit list.
#[derive(Clone, Copy, Debug)]
struct Run {
    first_hit: usize,
    hit_count: usize,
    first_wire: u32,
    last: Hit,
}

impl Run {
    fn open(index: usize, hit: &Hit) -> Self {
        Self {
            first_hit: index,
            hit_count: 1,
            first_wire: hit.wire,
            last: *hit,
        }
    }

    fn extend(&mut self, hit: &Hit) {
        self.hit_count += 1;
        self.last = *hit;
    }
}

/// Single-pass grouping of wire-adjacent hits.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireGapGrouping {
    config: GroupingConfig,
}

impl WireGapGrouping {
    /// Create with custom configuration.
    #[must_use]
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    fn close(&self, run: Run, groups: &mut Vec<HitGroup>, stats: &mut GroupingStatistics) {
        stats.runs_formed += 1;
        let run_span = span(run.first_wire, run.last.wire);

        if self.config.accepts(run.hit_count, run_span) {
            groups.push(HitGroup::new(
                run.first_hit,
                run.hit_count,
                run.first_wire,
                run.last.wire,
            ));
            stats.groups_kept += 1;
            stats.hits_grouped += run.hit_count;
            return;
        }

        if run.hit_count < self.config.min_hits {
            stats.rejected_min_hits += 1;
        } else {
            stats.rejected_span += 1;
        }
        stats.hits_dropped += run.hit_count;
        trace!(
            "dropped run wires {}..={} ({} hits, span {})",
            run.first_wire,
            run.last.wire,
            run.hit_count,
            run_span
        );
    }
}

impl HitGrouping for WireGapGrouping {
    fn name(&self) -> &'static str {
        "WireGap"
    }

    fn config(&self) -> &GroupingConfig {
        &self.config
    }

    fn group(&self, hits: &[Hit], groups: &mut Vec<HitGroup>) -> GroupingStatistics {
        let mut stats = GroupingStatistics::default();

        let Some(first) = hits.first() else {
            return stats;
        };

        let mut run = Run::open(0, first);
        for (index, hit) in hits.iter().enumerate().skip(1) {
            // Sorted input never steps backwards in wire number.
            if hit.wire_gap(&run.last) <= self.config.max_gap {
                run.extend(hit);
            } else {
                self.close(run, groups, &mut stats);
                run = Run::open(index, hit);
            }
        }
        self.close(run, groups, &mut stats);

        stats
    }
}
