//! Per-tick exposure bookkeeping.
//!
//! Each light source owns one [`ExposureTracker`]; the map built during a
//! cast pass is reconciled against the previous tick to produce exit
//! notifications. Damage is applied once per (source, target, tick) using
//! the minimum distance any ray observed.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::world::TargetId;

/// Targets hit by one source in one tick, deduplicated by minimum distance.
#[derive(Debug, Clone, Default)]
pub struct ExposureMap {
    min_dist: HashMap<TargetId, f32>,
}

impl ExposureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ray hit; keeps the smallest distance seen for the target.
    pub fn note(&mut self, target: TargetId, distance: f32) {
        self.min_dist
            .entry(target)
            .and_modify(|d| *d = d.min(distance))
            .or_insert(distance);
    }

    pub fn is_empty(&self) -> bool {
        self.min_dist.is_empty()
    }

    pub fn contains(&self, target: TargetId) -> bool {
        self.min_dist.contains_key(&target)
    }

    pub fn distance(&self, target: TargetId) -> Option<f32> {
        self.min_dist.get(&target).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, f32)> + '_ {
        self.min_dist.iter().map(|(t, d)| (*t, *d))
    }

    pub fn targets(&self) -> HashSet<TargetId> {
        self.min_dist.keys().copied().collect()
    }
}

/// Frame-coherent hit-set tracking for one light source.
///
/// Invariant: `prev` always reflects the illumination result of the
/// immediately preceding tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExposureTracker {
    prev: HashSet<TargetId>,
}

impl ExposureTracker {
    /// Swap in this tick's hit set; returns every target that was lit last
    /// tick but not this one (exactly the set owed an exit notification).
    pub fn reconcile(&mut self, current: HashSet<TargetId>) -> Vec<TargetId> {
        let exited: Vec<TargetId> = self.prev.difference(&current).copied().collect();
        self.prev = current;
        exited
    }

    pub fn was_lit(&self, target: TargetId) -> bool {
        self.prev.contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;

    fn b(id: u32) -> TargetId {
        TargetId::Block(BlockId(id))
    }

    #[test]
    fn note_keeps_minimum_distance() {
        let mut map = ExposureMap::new();
        map.note(b(1), 4.0);
        map.note(b(1), 2.5);
        map.note(b(1), 3.0);
        assert_eq!(map.distance(b(1)), Some(2.5));
    }

    #[test]
    fn reconcile_reports_only_departures() {
        let mut tracker = ExposureTracker::default();

        let mut first = HashSet::new();
        first.insert(b(1));
        first.insert(b(2));
        assert!(tracker.reconcile(first).is_empty());

        let mut second = HashSet::new();
        second.insert(b(2));
        second.insert(b(3));
        let exited = tracker.reconcile(second);
        assert_eq!(exited, vec![b(1)]);
        assert!(tracker.was_lit(b(3)));
    }

    #[test]
    fn empty_reconcile_flushes_everything() {
        let mut tracker = ExposureTracker::default();
        let mut set = HashSet::new();
        set.insert(b(7));
        tracker.reconcile(set);
        let exited = tracker.reconcile(HashSet::new());
        assert_eq!(exited, vec![b(7)]);
        assert!(tracker.reconcile(HashSet::new()).is_empty());
    }
}
