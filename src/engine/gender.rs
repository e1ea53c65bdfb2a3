use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::chart::{Gender, Person, PersonId};
use crate::layout::Seat;

/// Fills seat-groups by alternating between the two gender categories,
/// starting each group from a random side. When the preferred category runs
/// out the other one steps in, then the unspecified pool. Candidates are
/// consumed in arrival order within their category.
pub(crate) fn alternation_fill<R: Rng>(
    candidates: &[&Person],
    mut seat_groups: Vec<Vec<Seat>>,
    rng: &mut R,
) -> Vec<(PersonId, Seat)> {
    let mut cat_a: VecDeque<&Person> = by_gender(candidates, Gender::A);
    let mut cat_b: VecDeque<&Person> = by_gender(candidates, Gender::B);
    let mut unspecified: VecDeque<&Person> = by_gender(candidates, Gender::Unspecified);

    seat_groups.shuffle(rng);

    let mut out = vec![];
    for group in seat_groups {
        let mut want_a = rng.gen_bool(0.5);
        for seat in group {
            let next = if want_a {
                cat_a
                    .pop_front()
                    .or_else(|| cat_b.pop_front())
                    .or_else(|| unspecified.pop_front())
            } else {
                cat_b
                    .pop_front()
                    .or_else(|| cat_a.pop_front())
                    .or_else(|| unspecified.pop_front())
            };
            match next {
                Some(person) => out.push((person.id.clone(), seat)),
                None => return out,
            }
            want_a = !want_a;
        }
    }
    out
}

fn by_gender<'a>(candidates: &[&'a Person], gender: Gender) -> VecDeque<&'a Person> {
    candidates.iter().copied().filter(|p| p.gender == gender).collect()
}
