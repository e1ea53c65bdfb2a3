// The `chart` module contains the seating chart data model. These types are
// value types: every operation returns a new chart and never mutates its
// input.
mod person;
pub use crate::chart::person::{Gender, Person, PersonId};

mod state;
pub use crate::chart::state::{Chart, ChartId, Timestamp};
