use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(String);

impl ClassId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClassId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Node {
        edge_class_ids: Vec<ClassId>,
    },
    Edge {
        source_class_id: Option<ClassId>,
        target_class_id: Option<ClassId>,
        directed: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub class_id: ClassId,
    pub class_name: String,
    pub kind: ClassKind,
}

impl ClassInfo {
    pub fn node(
        class_id: impl Into<ClassId>,
        class_name: impl Into<String>,
        edge_class_ids: impl IntoIterator<Item = ClassId>,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            class_name: class_name.into(),
            kind: ClassKind::Node {
                edge_class_ids: edge_class_ids.into_iter().collect(),
            },
        }
    }

    pub fn edge(
        class_id: impl Into<ClassId>,
        class_name: impl Into<String>,
        source_class_id: Option<ClassId>,
        target_class_id: Option<ClassId>,
        directed: bool,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            class_name: class_name.into(),
            kind: ClassKind::Edge {
                source_class_id,
                target_class_id,
                directed,
            },
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self.kind, ClassKind::Node { .. })
    }

    pub fn is_edge(&self) -> bool {
        matches!(self.kind, ClassKind::Edge { .. })
    }

    /// Classes one hop away: incident edge classes of a node class, the defined endpoint classes
    /// of an edge class.
    pub fn neighbours(&self) -> Vec<ClassId> {
        match &self.kind {
            ClassKind::Node { edge_class_ids } => edge_class_ids.clone(),
            ClassKind::Edge {
                source_class_id,
                target_class_id,
                ..
            } => source_class_id
                .iter()
                .chain(target_class_id.iter())
                .cloned()
                .collect(),
        }
    }
}

/// Read access to the classes of a model.
pub trait ClassCatalog: Send + Sync {
    /// All class ids in catalog order.
    fn class_ids(&self) -> Vec<ClassId>;

    fn class(&self, id: &ClassId) -> Option<ClassInfo>;
}

impl<T: ClassCatalog + ?Sized> ClassCatalog for &T {
    fn class_ids(&self) -> Vec<ClassId> {
        (**self).class_ids()
    }

    fn class(&self, id: &ClassId) -> Option<ClassInfo> {
        (**self).class(id)
    }
}

impl<T: ClassCatalog + ?Sized> ClassCatalog for Arc<T> {
    fn class_ids(&self) -> Vec<ClassId> {
        (**self).class_ids()
    }

    fn class(&self, id: &ClassId) -> Option<ClassInfo> {
        (**self).class(id)
    }
}

impl<T: ClassCatalog> ClassCatalog for RwLock<T> {
    fn class_ids(&self) -> Vec<ClassId> {
        self.read().class_ids()
    }

    fn class(&self, id: &ClassId) -> Option<ClassInfo> {
        self.read().class(id)
    }
}

/// In-memory catalog keeping insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classes {
    order: Vec<ClassId>,
    by_id: HashMap<ClassId, ClassInfo>,
}

impl Classes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a class. A replaced class keeps its position.
    pub fn insert(&mut self, info: ClassInfo) {
        if !self.by_id.contains_key(&info.class_id) {
            self.order.push(info.class_id.clone());
        }
        self.by_id.insert(info.class_id.clone(), info);
    }

    pub fn with(mut self, info: ClassInfo) -> Self {
        self.insert(info);
        self
    }

    /// Removes a class. A removed edge class is also unregistered from its node classes.
    pub fn remove(&mut self, id: &ClassId) -> Option<ClassInfo> {
        let removed = self.by_id.remove(id)?;
        self.order.retain(|other| other != id);
        if removed.is_edge() {
            for info in self.by_id.values_mut() {
                if let ClassKind::Node { edge_class_ids } = &mut info.kind {
                    edge_class_ids.retain(|other| other != id);
                }
            }
        }
        Some(removed)
    }

    /// Adds a node class connected to nothing yet.
    pub fn add_node_class(&mut self, id: impl Into<ClassId>, name: impl Into<String>) {
        self.insert(ClassInfo::node(id, name, []));
    }

    /// Adds an edge class between two node classes and registers it on both of them.
    pub fn connect(
        &mut self,
        id: impl Into<ClassId>,
        name: impl Into<String>,
        source: Option<ClassId>,
        target: Option<ClassId>,
        directed: bool,
    ) {
        let id = id.into();
        for end in source.iter().chain(target.iter()) {
            if let Some(ClassInfo {
                kind: ClassKind::Node { edge_class_ids },
                ..
            }) = self.by_id.get_mut(end)
            {
                if !edge_class_ids.contains(&id) {
                    edge_class_ids.push(id.clone());
                }
            }
        }
        self.insert(ClassInfo::edge(id, name, source, target, directed));
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ClassCatalog for Classes {
    fn class_ids(&self) -> Vec<ClassId> {
        self.order.clone()
    }

    fn class(&self, id: &ClassId) -> Option<ClassInfo> {
        self.by_id.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<ClassId> {
        list.iter().map(|id| ClassId::from(*id)).collect()
    }

    #[test]
    fn connect_registers_edge_on_both_ends() {
        let mut c = Classes::new();
        c.add_node_class("a", "A");
        c.add_node_class("b", "B");
        c.connect("e", "E", Some("a".into()), Some("b".into()), true);

        assert_eq!(c.class_ids(), ids(&["a", "b", "e"]));
        assert_eq!(c.class(&"a".into()).unwrap().neighbours(), ids(&["e"]));
        assert_eq!(c.class(&"b".into()).unwrap().neighbours(), ids(&["e"]));
        assert_eq!(c.class(&"e".into()).unwrap().neighbours(), ids(&["a", "b"]));
    }

    #[test]
    fn self_loop_is_registered_once() {
        let mut c = Classes::new();
        c.add_node_class("a", "A");
        c.connect("e", "E", Some("a".into()), Some("a".into()), false);
        assert_eq!(c.class(&"a".into()).unwrap().neighbours(), ids(&["e"]));
    }

    #[test]
    fn replacing_keeps_order_and_remove_drops() {
        let mut c = Classes::new()
            .with(ClassInfo::node("a", "A", []))
            .with(ClassInfo::node("b", "B", []));
        c.insert(ClassInfo::node("a", "Renamed", []));
        assert_eq!(c.class_ids(), ids(&["a", "b"]));
        assert_eq!(c.class(&"a".into()).unwrap().class_name, "Renamed");

        assert!(c.remove(&"a".into()).is_some());
        assert_eq!(c.len(), 1);
        assert!(c.class(&"a".into()).is_none());
    }

    #[test]
    fn catalog_through_lock_and_arc() {
        let shared = Arc::new(RwLock::new(Classes::new()));
        shared.write().add_node_class("a", "A");
        let catalog: &dyn ClassCatalog = &shared;
        assert_eq!(catalog.class_ids(), ids(&["a"]));
    }
}
