use core::fmt;

use fnv::FnvHashSet;
use serde::{Deserialize, Serialize};

use crate::chart::{Person, PersonId};
use crate::layout::{Layout, Seat};

/// Caller-supplied modification time, unix milliseconds. The library never
/// consults a clock; every mutating operation takes the stamp to apply.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub i64);

#[derive(Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartId(pub String);

impl ChartId {
    pub fn new(id: impl Into<String>) -> ChartId {
        ChartId(id.into())
    }
}

impl fmt::Debug for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chart#{}", self.0)
    }
}

/// A seating chart: the roster of known people plus a rows x cols grid of
/// optional occupants. Grid cells hold ids; the roster owns the people.
///
/// Invariants:
/// - every id in the grid is in the roster
/// - no id occupies more than one cell
/// - non-seat coordinates (short custom rows) are always empty
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: ChartId,
    pub name: String,
    roster: Vec<Person>,
    grid: Vec<Vec<Option<PersonId>>>,
    layout: Layout,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chart {
    pub fn new(id: ChartId, name: impl Into<String>, layout: Layout, now: Timestamp) -> Chart {
        let grid = vec![vec![None; layout.cols()]; layout.rows()];
        Chart {
            id,
            name: name.into(),
            roster: vec![],
            grid,
            layout,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    /// All known people, in insertion order. Roster membership and being
    /// seated are separate facts.
    pub fn roster(&self) -> &[Person] {
        &self.roster
    }

    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.roster.iter().find(|p| &p.id == id)
    }

    pub fn occupant(&self, row: usize, col: usize) -> Option<&PersonId> {
        self.grid.get(row)?.get(col)?.as_ref()
    }

    pub fn seat_of(&self, id: &PersonId) -> Option<Seat> {
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.as_ref() == Some(id) {
                    return Some(Seat::new(row, col));
                }
            }
        }
        None
    }

    /// Every occupied seat with its occupant, in row-major order.
    pub fn occupied(&self) -> Vec<(Seat, &PersonId)> {
        let mut out = vec![];
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if let Some(id) = cell {
                    out.push((Seat::new(row, col), id));
                }
            }
        }
        out
    }

    /// Roster members with no seat, in roster order.
    pub fn unplaced(&self) -> Vec<&Person> {
        let seated: FnvHashSet<&PersonId> = self.occupied().into_iter().map(|(_, id)| id).collect();
        self.roster.iter().filter(|p| !seated.contains(&p.id)).collect()
    }

    /// Appends to the roster; unchanged if the id is already known. Does not
    /// seat the person.
    pub fn add_person(&self, person: Person, now: Timestamp) -> Chart {
        if self.person(&person.id).is_some() {
            return self.clone();
        }
        let mut next = self.touched(now);
        next.roster.push(person);
        next
    }

    /// Drops the person from the roster and vacates their seat, if any.
    pub fn remove_person(&self, id: &PersonId, now: Timestamp) -> Chart {
        if self.person(id).is_none() {
            return self.clone();
        }
        let mut next = self.touched(now);
        next.roster.retain(|p| &p.id != id);
        for cells in next.grid.iter_mut() {
            for cell in cells.iter_mut() {
                if cell.as_ref() == Some(id) {
                    *cell = None;
                }
            }
        }
        next
    }

    pub fn set_locked(&self, id: &PersonId, locked: bool, now: Timestamp) -> Chart {
        if self.person(id).is_none() {
            return self.clone();
        }
        let mut next = self.touched(now);
        for person in next.roster.iter_mut() {
            if &person.id == id {
                person.locked = locked;
            }
        }
        next
    }

    /// Seats the person, vacating their previous seat first (so this doubles
    /// as "move"). Any displaced occupant of the target becomes unplaced.
    /// Unchanged on an unknown id or a coordinate that is not a real seat.
    pub fn place(&self, id: &PersonId, row: usize, col: usize, now: Timestamp) -> Chart {
        if self.person(id).is_none() || !self.layout.is_seat(row, col) {
            return self.clone();
        }
        let mut next = self.touched(now);
        for cells in next.grid.iter_mut() {
            for cell in cells.iter_mut() {
                if cell.as_ref() == Some(id) {
                    *cell = None;
                }
            }
        }
        next.grid[row][col] = Some(id.clone());
        next
    }

    pub fn vacate(&self, row: usize, col: usize, now: Timestamp) -> Chart {
        if self.occupant(row, col).is_none() {
            return self.clone();
        }
        let mut next = self.touched(now);
        next.grid[row][col] = None;
        next
    }

    /// Exchanges two cells (either may be empty). Unchanged if either
    /// coordinate is not a real seat.
    pub fn swap(&self, row_a: usize, col_a: usize, row_b: usize, col_b: usize, now: Timestamp) -> Chart {
        if !self.layout.is_seat(row_a, col_a) || !self.layout.is_seat(row_b, col_b) {
            return self.clone();
        }
        let mut next = self.touched(now);
        next.exchange(Seat::new(row_a, col_a), Seat::new(row_b, col_b));
        next
    }

    /// Exchanges two whole desk pairs. The right-hand partners swap only when
    /// both exist as real seats.
    pub fn swap_pairs(&self, row_a: usize, col_a: usize, row_b: usize, col_b: usize, now: Timestamp) -> Chart {
        if !self.layout.is_seat(row_a, col_a) || !self.layout.is_seat(row_b, col_b) {
            return self.clone();
        }
        let mut next = self.touched(now);
        next.exchange(Seat::new(row_a, col_a), Seat::new(row_b, col_b));
        if self.layout.is_seat(row_a, col_a + 1) && self.layout.is_seat(row_b, col_b + 1) {
            next.exchange(Seat::new(row_a, col_a + 1), Seat::new(row_b, col_b + 1));
        }
        next
    }

    /// Exchanges two seat-groups cell by cell. Unchanged unless both groups
    /// exist and have equal sizes.
    pub fn swap_groups(&self, row_a: usize, group_a: usize, row_b: usize, group_b: usize, now: Timestamp) -> Chart {
        let a = match self.layout.row_groups(row_a).get(group_a) {
            Some(&group) => group,
            None => return self.clone(),
        };
        let b = match self.layout.row_groups(row_b).get(group_b) {
            Some(&group) => group,
            None => return self.clone(),
        };
        if a.size != b.size {
            return self.clone();
        }
        let mut next = self.touched(now);
        for i in 0..a.size {
            next.exchange(
                Seat::new(row_a, a.start_col + i),
                Seat::new(row_b, b.start_col + i),
            );
        }
        next
    }

    /// Empties the whole grid; the roster is unchanged.
    pub fn clear_placements(&self, now: Timestamp) -> Chart {
        let mut next = self.touched(now);
        next.grid = vec![vec![None; self.layout.cols()]; self.layout.rows()];
        next
    }

    /// Rebuilds the grid under a new layout, keeping occupants whose
    /// coordinates remain real seats. The roster is unchanged.
    pub fn resize(&self, layout: Layout, now: Timestamp) -> Chart {
        let mut grid = vec![vec![None; layout.cols()]; layout.rows()];
        for (seat, id) in self.occupied() {
            if layout.is_seat(seat.row, seat.col) {
                grid[seat.row][seat.col] = Some(id.clone());
            }
        }
        let mut next = self.touched(now);
        next.grid = grid;
        next.layout = layout;
        next
    }

    fn touched(&self, now: Timestamp) -> Chart {
        let mut next = self.clone();
        next.updated_at = now;
        next
    }

    fn exchange(&mut self, a: Seat, b: Seat) {
        let cell_a = self.grid[a.row][a.col].take();
        let cell_b = self.grid[b.row][b.col].take();
        self.grid[a.row][a.col] = cell_b;
        self.grid[b.row][b.col] = cell_a;
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::chart::Gender;

    const T0: Timestamp = Timestamp(0);
    const T1: Timestamp = Timestamp(1);

    fn chart(rows: usize, cols: usize) -> Chart {
        Chart::new(
            ChartId::new("c1"),
            "test",
            Layout::Uniform { rows, cols },
            T0,
        )
    }

    fn person(id: &str) -> Person {
        Person::new(id, id.to_uppercase(), Gender::Unspecified)
    }

    #[test]
    fn test_add_person_dedupes() {
        let chart = chart(2, 2)
            .add_person(person("a"), T0)
            .add_person(person("a"), T1);
        assert_eq!(chart.roster().len(), 1);
    }

    #[test]
    fn test_remove_person_vacates() {
        let chart = chart(2, 2)
            .add_person(person("a"), T0)
            .place(&PersonId::new("a"), 1, 1, T0)
            .remove_person(&PersonId::new("a"), T1);
        assert!(chart.roster().is_empty());
        assert_eq!(chart.occupant(1, 1), None);
    }

    #[test]
    fn test_place_moves_and_displaces() {
        let a = PersonId::new("a");
        let b = PersonId::new("b");
        let chart = chart(2, 2)
            .add_person(person("a"), T0)
            .add_person(person("b"), T0)
            .place(&a, 0, 0, T0)
            .place(&b, 0, 1, T0)
            // moving a person vacates their old seat
            .place(&a, 1, 0, T0);
        assert_eq!(chart.occupant(0, 0), None);
        assert_eq!(chart.seat_of(&a), Some(Seat::new(1, 0)));
        // placing onto an occupied seat displaces the occupant
        let chart = chart.place(&a, 0, 1, T1);
        assert_eq!(chart.seat_of(&a), Some(Seat::new(0, 1)));
        assert_eq!(chart.seat_of(&b), None);
        assert_eq!(chart.unplaced().len(), 1);
    }

    #[test]
    fn test_place_invalid_is_noop() {
        let base = chart(2, 2).add_person(person("a"), T0);
        let a = PersonId::new("a");
        assert_eq!(base.place(&PersonId::new("ghost"), 0, 0, T1), base);
        assert_eq!(base.place(&a, 5, 0, T1), base);
        assert_eq!(base.place(&a, 0, 5, T1), base);
    }

    #[test]
    fn test_place_rejects_non_seat() {
        // row 0 has 8 seats out of 10 columns
        let layout = Layout::parse_custom("2 3 3\n2 3 3 2").unwrap();
        let base = Chart::new(ChartId::new("c1"), "custom", layout, T0)
            .add_person(person("a"), T0);
        let a = PersonId::new("a");
        assert_eq!(base.place(&a, 0, 9, T1), base);
        let placed = base.place(&a, 0, 7, T1);
        assert_eq!(placed.seat_of(&a), Some(Seat::new(0, 7)));
    }

    #[test]
    fn test_swap_on_non_seat_is_noop() {
        let layout = Layout::parse_custom("2 3 3\n2 3 3 2").unwrap();
        let a = PersonId::new("a");
        let base = Chart::new(ChartId::new("c1"), "custom", layout, T0)
            .add_person(person("a"), T0)
            .place(&a, 0, 0, T0);
        assert_eq!(base.swap(0, 0, 0, 9, T1), base);
        let swapped = base.swap(0, 0, 1, 9, T1);
        assert_eq!(swapped.seat_of(&a), Some(Seat::new(1, 9)));
    }

    #[test]
    fn test_swap_with_empty_cell() {
        let a = PersonId::new("a");
        let chart = chart(1, 3)
            .add_person(person("a"), T0)
            .place(&a, 0, 0, T0)
            .swap(0, 0, 0, 2, T1);
        assert_eq!(chart.occupant(0, 0), None);
        assert_eq!(chart.seat_of(&a), Some(Seat::new(0, 2)));
    }

    #[test]
    fn test_swap_pairs() {
        let layout = Layout::Paired { rows: 2, cols: 4 };
        let a = PersonId::new("a");
        let b = PersonId::new("b");
        let chart = Chart::new(ChartId::new("c1"), "pairs", layout, T0)
            .add_person(person("a"), T0)
            .add_person(person("b"), T0)
            .place(&a, 0, 0, T0)
            .place(&b, 0, 1, T0)
            .swap_pairs(0, 0, 1, 2, T1);
        assert_eq!(chart.seat_of(&a), Some(Seat::new(1, 2)));
        assert_eq!(chart.seat_of(&b), Some(Seat::new(1, 3)));
    }

    #[test]
    fn test_swap_groups_requires_equal_sizes() {
        let layout = Layout::parse_custom("2 3\n3 2").unwrap();
        let a = PersonId::new("a");
        let base = Chart::new(ChartId::new("c1"), "groups", layout, T0)
            .add_person(person("a"), T0)
            .place(&a, 0, 0, T0);
        // row 0 group 0 has size 2, row 1 group 0 has size 3
        assert_eq!(base.swap_groups(0, 0, 1, 0, T1), base);
        // row 0 group 0 and row 1 group 1 both have size 2
        let swapped = base.swap_groups(0, 0, 1, 1, T1);
        assert_eq!(swapped.seat_of(&a), Some(Seat::new(1, 3)));
    }

    #[test]
    fn test_unplaced_in_roster_order() {
        let a = PersonId::new("a");
        let chart = chart(1, 3)
            .add_person(person("a"), T0)
            .add_person(person("b"), T0)
            .add_person(person("c"), T0)
            .place(&a, 0, 0, T0);
        let unplaced: Vec<&str> = chart.unplaced().iter().map(|p| p.id.0.as_str()).collect();
        assert_eq!(unplaced, vec!["b", "c"]);
    }

    #[test]
    fn test_clear_placements_keeps_roster() {
        let a = PersonId::new("a");
        let chart = chart(1, 3)
            .add_person(person("a"), T0)
            .place(&a, 0, 0, T0)
            .clear_placements(T1);
        assert_eq!(chart.roster().len(), 1);
        assert!(chart.occupied().is_empty());
        assert_eq!(chart.updated_at, T1);
    }

    #[test]
    fn test_resize_preserves_valid_occupants() {
        let a = PersonId::new("a");
        let b = PersonId::new("b");
        let chart = chart(2, 3)
            .add_person(person("a"), T0)
            .add_person(person("b"), T0)
            .place(&a, 0, 0, T0)
            .place(&b, 1, 2, T0)
            .resize(Layout::Uniform { rows: 2, cols: 2 }, T1);
        assert_eq!(chart.seat_of(&a), Some(Seat::new(0, 0)));
        // b's seat no longer exists
        assert_eq!(chart.seat_of(&b), None);
        assert_eq!(chart.unplaced().len(), 1);
    }

    #[test]
    fn test_set_locked() {
        let a = PersonId::new("a");
        let chart = chart(1, 1).add_person(person("a"), T0).set_locked(&a, true, T1);
        assert!(chart.person(&a).unwrap().locked);
        assert!(!chart.set_locked(&a, false, T1).person(&a).unwrap().locked);
    }

    #[test]
    fn test_json_round_trip() {
        let a = PersonId::new("a");
        let chart = Chart::new(
            ChartId::new("c1"),
            "round trip",
            Layout::parse_custom("2 3\n3 2").unwrap(),
            T0,
        )
        .add_person(person("a").locked(), T0)
        .add_person(Person::new("b", "B", Gender::A), T0)
        .place(&a, 0, 1, T1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        fs::write(&path, serde_json::to_string_pretty(&chart).unwrap()).unwrap();
        let restored: Chart = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, chart);
    }
}
