//! Interfaces of the model library the graphs are derived from.
//!
//! The library itself is opaque: instances are reached through [`Instance`] handles whose
//! relations are asynchronous streams, classes through a [`ClassCatalog`].

mod class;
mod instance;

pub use self::class::{ClassCatalog, ClassId, ClassInfo, ClassKind, Classes};
pub use self::instance::{Instance, InstanceId, InstanceKind, InstanceRef, InstanceStream};
