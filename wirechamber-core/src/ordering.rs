//! Canonical per-event ordering of hits.
//!
//! Hits are ordered by ascending wire number. Hits sharing a wire are ordered
//! by descending raw count, which for a common-stop TDC puts the latest real
//! time first. Grouping relies on this order.

use crate::Hit;
use std::cmp::Ordering;

/// Compares two hits by (wire ascending, raw time descending).
#[inline]
#[must_use]
pub fn hit_order(a: &Hit, b: &Hit) -> Ordering {
    a.wire
        .cmp(&b.wire)
        .then_with(|| b.raw_time.cmp(&a.raw_time))
}

/// Sorts hits in place. The sort is stable, so fully tied hits keep their
/// decode order.
pub fn sort_hits(hits: &mut [Hit]) {
    hits.sort_by(hit_order);
}

/// Returns true if `hits` is already in canonical order.
#[must_use]
pub fn is_sorted(hits: &[Hit]) -> bool {
    hits.windows(2)
        .all(|pair| hit_order(&pair[0], &pair[1]) != Ordering::Greater)
}
