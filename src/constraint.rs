use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::chart::PersonId;

/// User-selected soft constraints for one engine run. Together-groups sharing
/// a member are merged before use, so [[a,b],[b,c]] behaves as [a,b,c]. Ids
/// naming nobody on the roster are tolerated and ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// Groups that should end up mutually adjacent or chained contiguously.
    pub together: Vec<Vec<PersonId>>,
    /// Pairs that should never end up in adjacent seats.
    pub apart: Vec<[PersonId; 2]>,
    /// Alternate gender categories when filling seat-groups.
    pub mix_genders: bool,
}

impl ConstraintSet {
    pub fn new() -> ConstraintSet {
        ConstraintSet::default()
    }

    pub fn is_empty(&self) -> bool {
        self.together.is_empty() && self.apart.is_empty() && !self.mix_genders
    }

    /// Ids that some apart-pair forbids next to `id`.
    pub fn apart_partners(&self, id: &PersonId) -> Vec<&PersonId> {
        let mut partners = vec![];
        for [a, b] in &self.apart {
            if a == id {
                partners.push(b);
            } else if b == id {
                partners.push(a);
            }
        }
        partners
    }

    /// Together-groups after transitive-closure merging, members deduplicated
    /// and in first-seen order.
    pub fn merged_together(&self) -> Vec<Vec<PersonId>> {
        let mut sets = DisjointSet::new();
        for group in &self.together {
            let mut members = group.iter();
            if let Some(first) = members.next() {
                let root = sets.insert(first);
                for member in members {
                    let ix = sets.insert(member);
                    sets.union(root, ix);
                }
            }
        }
        sets.partitions()
    }
}

/// Union-find over together-group members.
struct DisjointSet {
    index: FnvHashMap<PersonId, usize>,
    order: Vec<PersonId>,
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new() -> DisjointSet {
        DisjointSet {
            index: FnvHashMap::default(),
            order: vec![],
            parent: vec![],
        }
    }

    fn insert(&mut self, id: &PersonId) -> usize {
        if let Some(&ix) = self.index.get(id) {
            return ix;
        }
        let ix = self.parent.len();
        self.index.insert(id.clone(), ix);
        self.order.push(id.clone());
        self.parent.push(ix);
        ix
    }

    fn find(&mut self, mut ix: usize) -> usize {
        while self.parent[ix] != ix {
            // path halving
            self.parent[ix] = self.parent[self.parent[ix]];
            ix = self.parent[ix];
        }
        ix
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }

    fn partitions(mut self) -> Vec<Vec<PersonId>> {
        let mut slot_of_root: FnvHashMap<usize, usize> = FnvHashMap::default();
        let mut out: Vec<Vec<PersonId>> = vec![];
        for ix in 0..self.order.len() {
            let root = self.find(ix);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                out.push(vec![]);
                out.len() - 1
            });
            out[slot].push(self.order[ix].clone());
        }
        out
    }
}
