//! Hit group traits and types.

use crate::{Error, Hit, Result};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A run of wire-adjacent hits accepted as a track-segment candidate.
///
/// Groups index into the sorted hit list they were formed from; the hits of
/// one group are contiguous in that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitGroup {
    /// Index of the first hit in the sorted hit list.
    pub first_hit: usize,
    /// Number of hits in the group.
    pub hit_count: usize,
    /// Wire number of the first hit.
    pub start_wire: u32,
    /// Wire number of the last hit.
    pub end_wire: u32,
}

impl HitGroup {
    /// Creates a group covering `hits[first_hit..first_hit + hit_count]`.
    #[must_use]
    pub fn new(first_hit: usize, hit_count: usize, start_wire: u32, end_wire: u32) -> Self {
        Self {
            first_hit,
            hit_count,
            start_wire,
            end_wire,
        }
    }

    /// Inclusive number of wires covered.
    #[inline]
    #[must_use]
    pub fn span(&self) -> u32 {
        span(self.start_wire, self.end_wire)
    }

    /// Index range of this group in the sorted hit list.
    #[inline]
    #[must_use]
    pub fn hit_range(&self) -> Range<usize> {
        self.first_hit..self.first_hit + self.hit_count
    }

    /// Returns the hits of this group from the list it was formed from.
    ///
    /// # Panics
    /// Panics if `hits` is not the list the group was formed from.
    #[must_use]
    pub fn hits<'a>(&self, hits: &'a [Hit]) -> &'a [Hit] {
        &hits[self.hit_range()]
    }
}

/// Inclusive wire span between two wire numbers.
#[inline]
#[must_use]
pub fn span(start_wire: u32, end_wire: u32) -> u32 {
    end_wire.saturating_sub(start_wire) + 1
}

/// Thresholds for group formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupingConfig {
    /// Minimum number of hits for a group to be kept.
    pub min_hits: usize,
    /// Minimum inclusive wire span.
    pub min_span: u32,
    /// Maximum inclusive wire span.
    pub max_span: u32,
    /// Largest wire-number step allowed between consecutive hits of a run.
    pub max_gap: u32,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            min_hits: 2,
            min_span: 2,
            max_span: 10,
            max_gap: 3,
        }
    }
}

impl GroupingConfig {
    /// Creates a grouping configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum hit count.
    #[must_use]
    pub fn with_min_hits(mut self, min_hits: usize) -> Self {
        self.min_hits = min_hits;
        self
    }

    /// Sets the minimum span.
    #[must_use]
    pub fn with_min_span(mut self, min_span: u32) -> Self {
        self.min_span = min_span;
        self
    }

    /// Sets the maximum span.
    #[must_use]
    pub fn with_max_span(mut self, max_span: u32) -> Self {
        self.max_span = max_span;
        self
    }

    /// Sets the maximum gap.
    #[must_use]
    pub fn with_max_gap(mut self, max_gap: u32) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Checks the thresholds for consistency.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if `min_hits` is zero or
    /// `min_span > max_span`.
    pub fn validate(&self) -> Result<()> {
        if self.min_hits == 0 {
            return Err(Error::ConfigError(
                "group.minhits must be at least 1".to_string(),
            ));
        }
        if self.min_span > self.max_span {
            return Err(Error::ConfigError(format!(
                "group.minspan ({}) exceeds group.maxspan ({})",
                self.min_span, self.max_span
            )));
        }
        Ok(())
    }

    /// Returns true if a closed run with these properties becomes a group.
    #[inline]
    #[must_use]
    pub fn accepts(&self, hit_count: usize, span: u32) -> bool {
        hit_count >= self.min_hits && (self.min_span..=self.max_span).contains(&span)
    }
}

/// Counters describing one grouping pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupingStatistics {
    /// Runs closed, kept or not.
    pub runs_formed: usize,
    /// Runs exported as groups.
    pub groups_kept: usize,
    /// Runs discarded for having too few hits.
    pub rejected_min_hits: usize,
    /// Runs discarded for a span outside the bounds.
    pub rejected_span: usize,
    /// Hits belonging to kept groups.
    pub hits_grouped: usize,
    /// Hits belonging to discarded runs.
    pub hits_dropped: usize,
}

impl GroupingStatistics {
    /// Accumulates another pass into this one.
    pub fn merge(&mut self, other: &Self) {
        self.runs_formed += other.runs_formed;
        self.groups_kept += other.groups_kept;
        self.rejected_min_hits += other.rejected_min_hits;
        self.rejected_span += other.rejected_span;
        self.hits_grouped += other.hits_grouped;
        self.hits_dropped += other.hits_dropped;
    }
}

/// Trait for algorithms that partition a sorted hit list into groups.
pub trait HitGrouping: Send + Sync {
    /// Returns the name of the algorithm.
    fn name(&self) -> &'static str;

    /// Returns the thresholds in use.
    fn config(&self) -> &GroupingConfig;

    /// Forms groups from hits sorted by [`hit_order`](crate::hit_order).
    ///
    /// Kept groups are appended to `groups`; rejected runs are dropped.
    fn group(&self, hits: &[Hit], groups: &mut Vec<HitGroup>) -> GroupingStatistics;
}
