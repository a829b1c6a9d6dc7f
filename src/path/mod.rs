mod layout;
mod spec;

pub use self::layout::{shortest_path, Connection, PathLayout, Slot};
pub use self::spec::PathSpecification;
