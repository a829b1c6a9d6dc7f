mod force_directed;
mod random;

pub use force_directed::{FruchtermanReingold, FruchtermanReingoldState};
pub use random::place_unplaced;
