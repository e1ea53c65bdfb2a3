use fnv::{FnvHashMap, FnvHashSet};
use lazy_static::lazy_static;

use crate::chart::{Chart, PersonId};
use crate::engine::adjacency::adjacent;

lazy_static! {
    static ref NO_NEIGHBORS: FnvHashSet<PersonId> = FnvHashSet::default();
}

/// Who sat next to whom before a reshuffle. Advisory only: the engine steers
/// people away from their previous neighbors but never fails over it.
pub(crate) struct NeighborLog {
    map: FnvHashMap<PersonId, FnvHashSet<PersonId>>,
}

impl NeighborLog {
    /// Records, for every seated person (locked or not), the ids currently
    /// adjacent to them.
    pub(crate) fn capture(chart: &Chart) -> NeighborLog {
        let occupied = chart.occupied();
        let mut map: FnvHashMap<PersonId, FnvHashSet<PersonId>> = FnvHashMap::default();
        for &(seat_a, id_a) in &occupied {
            for &(seat_b, id_b) in &occupied {
                if adjacent(seat_a, seat_b) {
                    map.entry(id_a.clone()).or_default().insert(id_b.clone());
                }
            }
        }
        NeighborLog { map }
    }

    pub(crate) fn neighbors(&self, id: &PersonId) -> &FnvHashSet<PersonId> {
        self.map.get(id).unwrap_or(&NO_NEIGHBORS)
    }
}
