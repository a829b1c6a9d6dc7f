mod derive;
mod graph;
mod seed;

pub use self::derive::{InstanceLink, InstanceNode, SeedSetDerive};
pub use self::graph::InstanceGraph;
pub use self::seed::SeedSet;
