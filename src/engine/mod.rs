mod adjacency;
mod gender;
mod neighbors;
mod seat_pool;

mod place;
pub use crate::engine::adjacency::adjacent;
pub use crate::engine::place::*;
