mod edge;
mod node;

pub use self::edge::Edge;
pub use self::node::{Node, NodeLayout};
