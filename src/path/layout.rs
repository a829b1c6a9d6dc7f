use std::collections::{HashMap, HashSet, VecDeque};

use egui::{Pos2, Vec2};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::{ClassCatalog, ClassId, ClassInfo};
use crate::{Error, Result, SettingsPath};

/// Position of a class in the layered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub layer: usize,
    pub index: usize,
}

/// Structural link between a class and one of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: ClassId,
    pub target: ClassId,
}

/// Classes reachable from a root, laid out in layers by BFS distance.
///
/// A child is never placed left of its parent: layers are padded with gaps where needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathLayout {
    all_classes: Vec<ClassInfo>,
    layers: Vec<Vec<Option<ClassId>>>,
    slots: HashMap<ClassId, Slot>,
    connections: Vec<Connection>,
}

struct Queued {
    parent_index: usize,
    layer: usize,
    class_id: ClassId,
}

impl PathLayout {
    /// # Errors
    /// Returns [`Error::UnknownClass`] when the root is not in the catalog.
    pub fn compute(catalog: &impl ClassCatalog, root: &ClassId) -> Result<Self> {
        if catalog.class(root).is_none() {
            return Err(Error::UnknownClass(root.clone()));
        }

        let mut layout = Self::default();
        let mut recorded: HashSet<(ClassId, ClassId)> = HashSet::new();
        let mut queue = VecDeque::from([Queued {
            parent_index: 0,
            layer: 0,
            class_id: root.clone(),
        }]);

        while let Some(Queued {
            parent_index,
            layer,
            class_id,
        }) = queue.pop_front()
        {
            if layout.slots.contains_key(&class_id) {
                continue;
            }
            let Some(info) = catalog.class(&class_id) else {
                continue;
            };

            if layout.layers.len() <= layer {
                layout.layers.resize_with(layer + 1, Vec::new);
            }
            let row = &mut layout.layers[layer];
            while row.len() + 1 < parent_index {
                row.push(None);
            }
            layout.slots.insert(
                class_id.clone(),
                Slot {
                    layer,
                    index: row.len(),
                },
            );
            row.push(Some(class_id.clone()));
            let parent_index = row.len();

            for neighbour in info.neighbours() {
                if catalog.class(&neighbour).is_none() {
                    warn!("class {class_id} links to {neighbour} which is not in the catalog");
                    continue;
                }
                if !recorded.contains(&(neighbour.clone(), class_id.clone()))
                    && recorded.insert((class_id.clone(), neighbour.clone()))
                {
                    layout.connections.push(Connection {
                        source: class_id.clone(),
                        target: neighbour.clone(),
                    });
                }
                queue.push_back(Queued {
                    parent_index,
                    layer: layer + 1,
                    class_id: neighbour,
                });
            }

            layout.all_classes.push(info);
        }

        Ok(layout)
    }

    /// Reached classes in BFS order, root first.
    pub fn all_classes(&self) -> &[ClassInfo] {
        &self.all_classes
    }

    pub fn layers(&self) -> &[Vec<Option<ClassId>>] {
        &self.layers
    }

    pub fn slot(&self, class_id: &ClassId) -> Option<Slot> {
        self.slots.get(class_id).copied()
    }

    pub fn contains(&self, class_id: &ClassId) -> bool {
        self.slots.contains_key(class_id)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Centre of a class glyph in diagram coordinates.
    pub fn class_center(&self, class_id: &ClassId, settings: &SettingsPath) -> Option<Pos2> {
        let slot = self.slot(class_id)?;
        let offset = settings.node_padding + settings.node_radius;
        Some(Pos2::new(
            settings.step() * slot.index as f32 + offset,
            settings.step() * slot.layer as f32 + offset,
        ))
    }

    /// Size needed to draw every layer.
    pub fn canvas_size(&self, settings: &SettingsPath) -> Vec2 {
        let widest = self.layers.iter().map(Vec::len).max().unwrap_or(0);
        Vec2::new(
            settings.node_padding + settings.step() * widest as f32,
            settings.node_padding + settings.step() * self.layers.len() as f32,
        )
    }
}

/// Fewest-hop route between two classes, both ends included.
pub fn shortest_path(
    catalog: &impl ClassCatalog,
    source: &ClassId,
    target: &ClassId,
) -> Option<Vec<ClassId>> {
    let mut visited: HashSet<ClassId> = HashSet::new();
    let mut queue = VecDeque::from([vec![source.clone()]]);

    while let Some(path) = queue.pop_front() {
        let tail = path.last()?;
        if tail == target {
            return Some(path);
        }
        if !visited.insert(tail.clone()) {
            continue;
        }
        let Some(info) = catalog.class(tail) else {
            continue;
        };
        for neighbour in info.neighbours() {
            if visited.contains(&neighbour) {
                continue;
            }
            let mut next = path.clone();
            next.push(neighbour);
            queue.push_back(next);
        }
    }

    None
}
