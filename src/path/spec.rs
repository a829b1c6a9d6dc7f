use std::sync::Arc;

use egui::{Pos2, Vec2};
use log::debug;

use super::{shortest_path, Connection, PathLayout};
use crate::events::{Event, EventSink, PayloadPathChanged};
use crate::model::{ClassCatalog, ClassId};
use crate::{Error, Result, SettingsPath};

/// A walk through the class graph starting at a root class, extended one shortest route at a
/// time.
pub struct PathSpecification<C> {
    catalog: C,
    root: ClassId,
    layout: PathLayout,
    current_path: Vec<ClassId>,
    settings: SettingsPath,

    events_sink: Option<Arc<dyn EventSink>>,
}

impl<C: ClassCatalog> PathSpecification<C> {
    /// # Errors
    /// Returns [`Error::UnknownClass`] when the root is not in the catalog.
    pub fn new(catalog: C, root: ClassId) -> Result<Self> {
        let layout = PathLayout::compute(&catalog, &root)?;
        Ok(Self {
            catalog,
            current_path: vec![root.clone()],
            root,
            layout,
            settings: SettingsPath::default(),
            events_sink: None,
        })
    }

    pub fn with_settings(mut self, settings: SettingsPath) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events_sink = Some(sink);
        self
    }

    pub fn root(&self) -> &ClassId {
        &self.root
    }

    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }

    pub fn current_path(&self) -> &[ClassId] {
        &self.current_path
    }

    /// Tail of the path.
    pub fn current_class_id(&self) -> &ClassId {
        self.current_path.last().unwrap_or(&self.root)
    }

    pub fn shortest_path(&self, source: &ClassId, target: &ClassId) -> Option<Vec<ClassId>> {
        shortest_path(&self.catalog, source, target)
    }

    /// Extends the path by the shortest route from its tail to `class_id`.
    ///
    /// # Errors
    /// Returns [`Error::UnreachableClass`] when no route exists; the path is left as it was.
    pub fn add_class_to_path(&mut self, class_id: &ClassId) -> Result<()> {
        let from = self.current_class_id().clone();
        let Some(route) = self.shortest_path(&from, class_id) else {
            return Err(Error::UnreachableClass {
                from,
                to: class_id.clone(),
            });
        };

        debug!("path extended by {} hops to {class_id}", route.len() - 1);
        self.current_path.extend(route.into_iter().skip(1));
        self.publish_path_changed();
        Ok(())
    }

    /// Keeps the path up to and including `index`. The root always stays.
    pub fn truncate_path(&mut self, index: usize) {
        let keep = index.saturating_add(1);
        if keep >= self.current_path.len() {
            return;
        }
        self.current_path.truncate(keep);
        self.publish_path_changed();
    }

    /// Connections with both ends on the path.
    pub fn active_connections(&self) -> Vec<&Connection> {
        self.layout
            .connections()
            .iter()
            .filter(|c| {
                self.current_path.contains(&c.source) && self.current_path.contains(&c.target)
            })
            .collect()
    }

    pub fn class_center(&self, class_id: &ClassId) -> Option<Pos2> {
        self.layout.class_center(class_id, &self.settings)
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.layout.canvas_size(&self.settings)
    }

    /// A path can be projected into a new edge class when it runs from a node class through at
    /// least one other class to a node class.
    pub fn projection_path_is_valid(&self) -> bool {
        let is_node = |id: &ClassId| self.catalog.class(id).is_some_and(|c| c.is_node());
        self.current_path.len() > 2 && is_node(&self.root) && is_node(self.current_class_id())
    }

    /// Re-reads the catalog. The path is cut before the first entry that is no longer
    /// reachable from the root or no longer linked to the entry before it.
    ///
    /// # Errors
    /// Returns [`Error::UnknownClass`] when the root was removed; nothing changes in that case.
    pub fn recompute_layout(&mut self) -> Result<()> {
        self.layout = PathLayout::compute(&self.catalog, &self.root)?;
        let broken_hop = self
            .current_path
            .windows(2)
            .position(|hop| !self.layout.contains(&hop[1]) || !self.is_linked(&hop[0], &hop[1]));
        if let Some(hop) = broken_hop {
            self.truncate_path(hop);
        }
        Ok(())
    }

    fn is_linked(&self, from: &ClassId, to: &ClassId) -> bool {
        self.catalog
            .class(from)
            .is_some_and(|class| class.neighbours().contains(to))
    }

    fn publish_path_changed(&self) {
        if let Some(sink) = &self.events_sink {
            sink.send(Event::PathChanged(PayloadPathChanged {
                path: self.current_path.iter().map(ToString::to_string).collect(),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Classes;

    fn line() -> Classes {
        let mut c = Classes::new();
        for id in ["a", "b", "c"] {
            c.add_node_class(id, id);
        }
        c.connect("e1", "e1", Some("a".into()), Some("b".into()), true);
        c.connect("e2", "e2", Some("b".into()), Some("c".into()), true);
        c
    }

    fn ids(list: &[&str]) -> Vec<ClassId> {
        list.iter().map(|id| ClassId::from(*id)).collect()
    }

    #[test]
    fn breadcrumb_truncation_keeps_root() {
        let mut p = PathSpecification::new(line(), "a".into()).unwrap();
        p.add_class_to_path(&"c".into()).unwrap();
        assert_eq!(p.current_path(), ids(&["a", "e1", "b", "e2", "c"]).as_slice());
        assert!(p.projection_path_is_valid());

        p.truncate_path(1);
        assert_eq!(p.current_path(), ids(&["a", "e1"]).as_slice());
        assert!(!p.projection_path_is_valid());

        p.truncate_path(0);
        assert_eq!(p.current_class_id(), &ClassId::from("a"));
    }

    #[test]
    fn active_connections_follow_path() {
        let mut p = PathSpecification::new(line(), "a".into()).unwrap();
        assert!(p.active_connections().is_empty());
        p.add_class_to_path(&"b".into()).unwrap();
        assert_eq!(p.active_connections().len(), 2);
    }

    #[test]
    fn recompute_cuts_unreachable_tail() {
        let shared = Arc::new(parking_lot::RwLock::new(line()));
        let mut p = PathSpecification::new(shared.clone(), "a".into()).unwrap();
        p.add_class_to_path(&"c".into()).unwrap();

        shared.write().remove(&"e2".into());
        p.recompute_layout().unwrap();
        assert_eq!(p.current_path(), ids(&["a", "e1", "b"]).as_slice());
        assert!(!p.layout().contains(&"c".into()));
    }

    #[test]
    fn recompute_cuts_at_retargeted_hop() {
        let shared = Arc::new(parking_lot::RwLock::new(line()));
        let mut p = PathSpecification::new(shared.clone(), "a".into()).unwrap();
        p.add_class_to_path(&"c".into()).unwrap();

        {
            let mut classes = shared.write();
            classes.remove(&"e2".into());
            classes.connect("e2", "e2", Some("a".into()), Some("c".into()), true);
        }
        p.recompute_layout().unwrap();

        assert!(p.layout().contains(&"e2".into()));
        assert!(p.layout().contains(&"c".into()));
        assert_eq!(p.current_path(), ids(&["a", "e1", "b"]).as_slice());
    }
}
