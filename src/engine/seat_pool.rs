use fnv::FnvHashSet;
use itertools::Itertools;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::layout::{Layout, Seat};

/// The seats up for grabs during one engine run. A claim is permanent for the
/// run: a seat handed out is never offered again.
pub(crate) struct SeatPool {
    // row-major scan order
    seats: Vec<Seat>,
    members: FnvHashSet<Seat>,
    claimed: FnvHashSet<Seat>,
}

impl SeatPool {
    pub(crate) fn new(seats: Vec<Seat>) -> SeatPool {
        let members = seats.iter().copied().collect();
        SeatPool {
            seats,
            members,
            claimed: FnvHashSet::default(),
        }
    }

    pub(crate) fn is_free(&self, seat: Seat) -> bool {
        self.members.contains(&seat) && !self.claimed.contains(&seat)
    }

    pub(crate) fn claim(&mut self, seat: Seat) {
        self.claimed.insert(seat);
    }

    /// Unclaimed seats in row-major order.
    pub(crate) fn free_seats(&self) -> Vec<Seat> {
        self.seats
            .iter()
            .copied()
            .filter(|s| !self.claimed.contains(s))
            .collect()
    }

    /// Claims up to `count` seats that sit well together: a contiguous
    /// horizontal run if one exists, whole desk pairs under a paired layout,
    /// arbitrary free seats as the last resort. May return fewer than `count`
    /// when the pool runs dry.
    pub(crate) fn claim_nearby<R: Rng>(
        &mut self,
        layout: &Layout,
        count: usize,
        rng: &mut R,
    ) -> Vec<Seat> {
        if count == 0 {
            return vec![];
        }

        if let Some(run) = self.find_run(layout, count, rng) {
            for &seat in &run {
                self.claim(seat);
            }
            return run;
        }

        let mut picked = vec![];
        if layout.is_paired() {
            let mut pairs = self.free_pairs(layout);
            pairs.shuffle(rng);
            for pair in pairs {
                if picked.len() + 2 > count {
                    break;
                }
                for seat in pair {
                    self.claim(seat);
                    picked.push(seat);
                }
            }
        }

        let mut rest = self.free_seats();
        rest.shuffle(rng);
        for seat in rest {
            if picked.len() >= count {
                break;
            }
            self.claim(seat);
            picked.push(seat);
        }
        trace!("no run of {} found, picked {:?}", count, picked);
        picked
    }

    /// First contiguous run of `count` free seats, scanning rows in random
    /// order and columns left to right.
    fn find_run<R: Rng>(&self, layout: &Layout, count: usize, rng: &mut R) -> Option<Vec<Seat>> {
        let mut rows = (0..layout.rows()).collect_vec();
        rows.shuffle(rng);
        for row in rows {
            let free = (0..layout.row_seat_count(row))
                .filter(|&col| self.is_free(Seat::new(row, col)))
                .collect_vec();
            for (ix, &col) in free.iter().enumerate() {
                let mut len = 1;
                while ix + len < free.len() && free[ix + len] == col + len {
                    len += 1;
                }
                if len >= count {
                    return Some((col..col + count).map(|c| Seat::new(row, c)).collect());
                }
            }
        }
        None
    }

    fn free_pairs(&self, layout: &Layout) -> Vec<[Seat; 2]> {
        let mut pairs = vec![];
        for row in 0..layout.rows() {
            for group in layout.row_groups(row) {
                if group.size != 2 {
                    continue;
                }
                let left = Seat::new(row, group.start_col);
                let right = Seat::new(row, group.start_col + 1);
                if self.is_free(left) && self.is_free(right) {
                    pairs.push([left, right]);
                }
            }
        }
        pairs
    }
}
