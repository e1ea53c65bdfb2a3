pub mod chart;
pub mod constraint;
pub mod engine;
pub mod layout;

pub use chart::*;
pub use constraint::ConstraintSet;
pub use engine::{adjacent, randomize, reshuffle};
pub use layout::{Layout, LayoutError, Seat};
