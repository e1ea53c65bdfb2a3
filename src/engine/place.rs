use fnv::{FnvHashMap, FnvHashSet};
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::chart::{Chart, Person, PersonId, Timestamp};
use crate::constraint::ConstraintSet;
use crate::engine::adjacency::surrounding;
use crate::engine::gender::alternation_fill;
use crate::engine::neighbors::NeighborLog;
use crate::engine::seat_pool::SeatPool;
use crate::layout::{Layout, Seat};

/// Counters for one engine run, logged at debug level.
#[derive(Clone, Copy, Debug, Default)]
struct RunStats {
    placed: usize,
    unplaced: usize,
    apart_fallbacks: usize,
    neighbor_relaxations: usize,
}

/// Fills every unlocked seat from the full roster. Locked, seated people keep
/// their exact seats; everyone else (seated or not) is a candidate. If
/// candidates outnumber seats the surplus stays unplaced.
pub fn randomize<R: Rng>(
    chart: &Chart,
    constraints: Option<&ConstraintSet>,
    rng: &mut R,
    now: Timestamp,
) -> Chart {
    let locked = locked_seated(chart);
    let candidates: Vec<Person> = chart
        .roster()
        .iter()
        .filter(|p| !locked.contains(&p.id))
        .cloned()
        .collect();
    if candidates.is_empty() {
        return chart.clone();
    }

    let obstacles: FnvHashSet<Seat> = chart
        .occupied()
        .into_iter()
        .filter(|(_, id)| locked.contains(*id))
        .map(|(seat, _)| seat)
        .collect();
    let available: Vec<Seat> = chart
        .layout()
        .seats()
        .into_iter()
        .filter(|s| !obstacles.contains(s))
        .collect();

    run(chart, constraints, candidates, available, None, rng, now)
}

/// Re-randomizes only the currently seated, unlocked occupants over exactly
/// the seats they hold, steering each one away from their previous neighbors.
/// Unplaced roster members stay unplaced.
pub fn reshuffle<R: Rng>(
    chart: &Chart,
    constraints: Option<&ConstraintSet>,
    rng: &mut R,
    now: Timestamp,
) -> Chart {
    let mut candidates = vec![];
    let mut available = vec![];
    for (seat, id) in chart.occupied() {
        match chart.person(id) {
            Some(person) if !person.locked => {
                candidates.push(person.clone());
                available.push(seat);
            }
            _ => {}
        }
    }
    if candidates.is_empty() {
        return chart.clone();
    }

    let history = NeighborLog::capture(chart);
    run(chart, constraints, candidates, available, Some(history), rng, now)
}

fn locked_seated(chart: &Chart) -> FnvHashSet<PersonId> {
    chart
        .occupied()
        .into_iter()
        .filter(|(_, id)| chart.person(id).map_or(false, |p| p.locked))
        .map(|(_, id)| id.clone())
        .collect()
}

fn run<R: Rng>(
    chart: &Chart,
    constraints: Option<&ConstraintSet>,
    candidates: Vec<Person>,
    available: Vec<Seat>,
    history: Option<NeighborLog>,
    rng: &mut R,
    now: Timestamp,
) -> Chart {
    let rows = chart.layout().rows();
    let cols = chart.layout().cols();
    let mut stats = RunStats::default();
    debug!(
        "placing {} candidates over {} seats",
        candidates.len(),
        available.len()
    );

    // Locked occupants stay on the grid and still count for adjacency checks.
    let available_set: FnvHashSet<Seat> = available.iter().copied().collect();
    let mut occupied_by: FnvHashMap<Seat, PersonId> = chart
        .occupied()
        .into_iter()
        .filter(|(seat, _)| !available_set.contains(seat))
        .map(|(seat, id)| (seat, id.clone()))
        .collect();

    let mut pool = SeatPool::new(available);
    let mut assignments: Vec<(PersonId, Seat)> = vec![];
    let mut assigned: FnvHashSet<PersonId> = FnvHashSet::default();

    let merged = constraints.map(|c| c.merged_together()).unwrap_or_default();
    let mut group_of: FnvHashMap<PersonId, usize> = FnvHashMap::default();
    for (ix, group) in merged.iter().enumerate() {
        for id in group {
            group_of.insert(id.clone(), ix);
        }
    }

    match constraints.filter(|c| !c.is_empty()) {
        None => {
            let mut shuffled = candidates.clone();
            shuffled.shuffle(rng);
            for person in &shuffled {
                let apart: FnvHashSet<&PersonId> = FnvHashSet::default();
                let prev = history.as_ref().map(|log| log.neighbors(&person.id));
                let free = pool.free_seats();
                let choice = pick_seat(
                    &free, rows, cols, &occupied_by, &apart, prev, &group_of, None, &mut stats,
                );
                if let Some(seat) = choice {
                    pool.claim(seat);
                    occupied_by.insert(seat, person.id.clone());
                    assignments.push((person.id.clone(), seat));
                }
            }
        }
        Some(constraints) => {
            let candidate_set: FnvHashSet<&PersonId> = candidates.iter().map(|p| &p.id).collect();
            for group in &merged {
                place_group(
                    chart,
                    group,
                    &candidate_set,
                    &mut pool,
                    &mut occupied_by,
                    &mut assignments,
                    &mut assigned,
                    rng,
                );
            }

            let remaining: Vec<&Person> = candidates
                .iter()
                .filter(|p| !assigned.contains(&p.id))
                .collect();
            if constraints.mix_genders {
                let groups = free_seat_groups(chart.layout(), &pool);
                for (id, seat) in alternation_fill(&remaining, groups, rng) {
                    pool.claim(seat);
                    occupied_by.insert(seat, id.clone());
                    assignments.push((id, seat));
                }
            } else {
                let mut shuffled = remaining;
                shuffled.shuffle(rng);
                for person in shuffled {
                    let apart: FnvHashSet<&PersonId> =
                        constraints.apart_partners(&person.id).into_iter().collect();
                    let prev = history.as_ref().map(|log| log.neighbors(&person.id));
                    let candidate_group = group_of.get(&person.id).copied();
                    let free = pool.free_seats();
                    let choice = pick_seat(
                        &free,
                        rows,
                        cols,
                        &occupied_by,
                        &apart,
                        prev,
                        &group_of,
                        candidate_group,
                        &mut stats,
                    );
                    if let Some(seat) = choice {
                        pool.claim(seat);
                        occupied_by.insert(seat, person.id.clone());
                        assignments.push((person.id.clone(), seat));
                    }
                }
            }
        }
    }

    let mut updated = chart.clone();
    for person in &candidates {
        if let Some(seat) = chart.seat_of(&person.id) {
            updated = updated.vacate(seat.row, seat.col, now);
        }
    }
    for (id, seat) in &assignments {
        updated = updated.place(id, seat.row, seat.col, now);
    }

    stats.placed = assignments.len();
    stats.unplaced = candidates.len() - assignments.len();
    debug!("placement run done: {:?}", stats);
    updated
}

/// Seats one merged together-group. Locked members already on the grid are
/// anchors; members in the candidate pool are movable; anything else is
/// ignored. Movable members go next to the first anchor when there is one,
/// and into a nearby block of seats otherwise.
#[allow(clippy::too_many_arguments)]
fn place_group<R: Rng>(
    chart: &Chart,
    group: &[PersonId],
    candidate_set: &FnvHashSet<&PersonId>,
    pool: &mut SeatPool,
    occupied_by: &mut FnvHashMap<Seat, PersonId>,
    assignments: &mut Vec<(PersonId, Seat)>,
    assigned: &mut FnvHashSet<PersonId>,
    rng: &mut R,
) {
    let mut anchors: Vec<Seat> = vec![];
    let mut movable: Vec<&PersonId> = vec![];
    for id in group {
        if candidate_set.contains(id) {
            movable.push(id);
        } else if let Some(seat) = chart.seat_of(id) {
            if chart.person(id).map_or(false, |p| p.locked) {
                anchors.push(seat);
            }
        }
    }
    if movable.is_empty() {
        // fully anchored (or fully dangling): nothing to place
        return;
    }

    let mut claimed: Vec<Seat> = vec![];
    if let Some(&anchor) = anchors.first() {
        for seat in anchor_adjacent(chart.layout(), anchor) {
            if claimed.len() >= movable.len() {
                break;
            }
            if pool.is_free(seat) {
                pool.claim(seat);
                claimed.push(seat);
            }
        }
    }
    if claimed.len() < movable.len() {
        let more = pool.claim_nearby(chart.layout(), movable.len() - claimed.len(), rng);
        claimed.extend(more);
    }
    trace!(
        "group {:?}: {} anchors, {} movable, seats {:?}",
        group,
        anchors.len(),
        movable.len(),
        claimed
    );

    for (id, seat) in movable.into_iter().zip(claimed) {
        occupied_by.insert(seat, id.clone());
        assignments.push((id.clone(), seat));
        assigned.insert(id.clone());
    }
}

/// Seats adjacent to an anchor, best first: the anchor's own pair partner
/// under a paired layout, then the immediate left and right neighbors.
fn anchor_adjacent(layout: &Layout, anchor: Seat) -> Vec<Seat> {
    let mut prefs = vec![];
    if layout.is_paired() {
        let pair_start = anchor.col - anchor.col % 2;
        let partner = if anchor.col == pair_start {
            pair_start + 1
        } else {
            pair_start
        };
        prefs.push(Seat::new(anchor.row, partner));
    }
    if anchor.col > 0 {
        prefs.push(Seat::new(anchor.row, anchor.col - 1));
    }
    prefs.push(Seat::new(anchor.row, anchor.col + 1));

    let mut out: Vec<Seat> = vec![];
    for seat in prefs {
        if layout.is_seat(seat.row, seat.col) && !out.contains(&seat) {
            out.push(seat);
        }
    }
    out
}

/// Picks the first free seat passing the apart-pair check and, when a history
/// is present, the previous-neighbor check. Neighbor avoidance is waived
/// towards members of the candidate's own together-group and is the first
/// thing relaxed when no seat qualifies; the last resort is the first free
/// seat, violated constraints and all.
#[allow(clippy::too_many_arguments)]
fn pick_seat(
    free: &[Seat],
    rows: usize,
    cols: usize,
    occupied_by: &FnvHashMap<Seat, PersonId>,
    apart: &FnvHashSet<&PersonId>,
    prev: Option<&FnvHashSet<PersonId>>,
    group_of: &FnvHashMap<PersonId, usize>,
    candidate_group: Option<usize>,
    stats: &mut RunStats,
) -> Option<Seat> {
    let ok = |seat: Seat, check_neighbors: bool| {
        surrounding(seat, rows, cols)
            .into_iter()
            .all(|s| match occupied_by.get(&s) {
                None => true,
                Some(occupant) => {
                    if apart.contains(occupant) {
                        return false;
                    }
                    if check_neighbors {
                        if let Some(prev) = prev {
                            let waived = candidate_group.is_some()
                                && group_of.get(occupant).copied() == candidate_group;
                            if !waived && prev.contains(occupant) {
                                return false;
                            }
                        }
                    }
                    true
                }
            })
    };

    if let Some(seat) = free.iter().copied().find(|&s| ok(s, true)) {
        return Some(seat);
    }
    if prev.map_or(false, |p| !p.is_empty()) {
        // relax the advisory neighbor heuristic before giving up on apart
        stats.neighbor_relaxations += 1;
        if let Some(seat) = free.iter().copied().find(|&s| ok(s, false)) {
            return Some(seat);
        }
    }
    if !free.is_empty() {
        stats.apart_fallbacks += 1;
    }
    free.first().copied()
}

/// Remaining free seats, partitioned by the layout's natural grouping: desk
/// pairs, declared custom groups, or whole rows.
fn free_seat_groups(layout: &Layout, pool: &SeatPool) -> Vec<Vec<Seat>> {
    let mut out = vec![];
    for row in 0..layout.rows() {
        for group in layout.row_groups(row) {
            let seats: Vec<Seat> = (group.start_col..group.start_col + group.size)
                .map(|col| Seat::new(row, col))
                .filter(|&s| pool.is_free(s))
                .collect();
            if !seats.is_empty() {
                out.push(seats);
            }
        }
    }
    out
}
