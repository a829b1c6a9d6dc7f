mod elements;
mod error;
mod settings;
mod snapshot;
mod store;

pub mod events;
pub mod heuristic;
pub mod instances;
pub mod layouts;
pub mod model;
pub mod network;
pub mod path;

pub use self::elements::{Edge, Node, NodeLayout};
pub use self::error::{Error, Result};
pub use self::layouts::{place_unplaced, FruchtermanReingold, FruchtermanReingoldState};
pub use self::settings::{Settings, SettingsLayout, SettingsPath, SettingsStats, MIN_SUMMARY_BINS};
pub use self::snapshot::Snapshot;
pub use self::store::{Derive, KeyFn, PersistentGraph, UpdateOutcome};

pub use self::instances::InstanceGraph;
pub use self::network::NetworkModelGraph;
pub use self::path::PathSpecification;
