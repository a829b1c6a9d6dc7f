use std::fmt;
use std::sync::Arc;

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Stable identity of an instance across model reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceKind {
    Node,
    Edge,
}

pub type InstanceRef = Arc<dyn Instance>;

/// Lazily produced sequence of instances. Items may fail when the underlying read fails.
pub type InstanceStream = BoxStream<'static, Result<InstanceRef>>;

/// A node or edge instance of the model library.
///
/// Node instances yield their incident edges through [`Instance::edges`]; edge instances yield
/// their endpoints through [`Instance::source_nodes`] and [`Instance::target_nodes`]. Relations
/// that don't apply to a kind yield an empty stream.
pub trait Instance: Send + Sync {
    fn instance_id(&self) -> InstanceId;

    fn kind(&self) -> InstanceKind;

    fn edges(&self) -> InstanceStream;

    fn source_nodes(&self) -> InstanceStream;

    fn target_nodes(&self) -> InstanceStream;

    fn is_node(&self) -> bool {
        self.kind() == InstanceKind::Node
    }

    fn is_edge(&self) -> bool {
        self.kind() == InstanceKind::Edge
    }
}

impl fmt::Debug for dyn Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("instance_id", &self.instance_id())
            .field("kind", &self.kind())
            .finish()
    }
}
