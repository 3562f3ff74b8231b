//! Set-based merge of per-worker cycle lists.
//!
//! Both parallel engines funnel their workers' output through a
//! [`CycleDeduplicator`]. No normalization happens here: a
//! [`CanonicalCycle`] is canonical by construction, so value equality is
//! exactly the deduplication rule.
use std::collections::BTreeSet;

use crate::cycle::CanonicalCycle;

/// Ordered set of canonical cycles.
#[derive(Debug, Clone, Default)]
pub struct CycleDeduplicator {
    cycles: BTreeSet<CanonicalCycle>,
}

impl CycleDeduplicator {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every cycle, silently discarding values already present.
    ///
    /// Returns how many cycles were new.
    pub fn merge<I>(&mut self, cycles: I) -> usize
    where
        I: IntoIterator<Item = CanonicalCycle>,
    {
        let mut added = 0;
        for cycle in cycles {
            if self.cycles.insert(cycle) {
                added += 1;
            }
        }
        added
    }

    /// Returns `true` if `cycle` is in the set.
    pub fn contains(&self, cycle: &CanonicalCycle) -> bool {
        self.cycles.contains(cycle)
    }

    /// Number of distinct cycles held.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Returns `true` if no cycle has been merged.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Iterates over the held cycles.
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalCycle> {
        self.cycles.iter()
    }

    /// Consumes the set and returns its cycles.
    ///
    /// The current implementation happens to yield them sorted; callers must
    /// not depend on that.
    pub fn drain(self) -> Vec<CanonicalCycle> {
        self.cycles.into_iter().collect()
    }
}

impl FromIterator<CanonicalCycle> for CycleDeduplicator {
    fn from_iter<I: IntoIterator<Item = CanonicalCycle>>(iter: I) -> Self {
        let mut dedup = Self::new();
        dedup.merge(iter);
        dedup
    }
}
