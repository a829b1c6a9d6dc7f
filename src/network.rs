use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::warn;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::events::EventSink;
use crate::model::{ClassCatalog, ClassId, ClassInfo, ClassKind};
use crate::{Derive, PersistentGraph, Result, Snapshot, UpdateOutcome};

/// Link between a class and one end of an edge class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLink {
    /// `"{source}>{target}"`
    pub id: String,
    pub directed: bool,
}

/// Derives the class graph: one node per class, edge classes linked to their endpoint classes.
pub struct ClassGraphDerive<C> {
    catalog: C,
}

impl<C: ClassCatalog> ClassGraphDerive<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn derive_now(&self) -> Snapshot<ClassInfo, ClassLink> {
        let ids = self.catalog.class_ids();
        let mut s = Snapshot::with_capacity(ids.len(), ids.len());
        let mut lookup: HashMap<ClassId, NodeIndex> = HashMap::with_capacity(ids.len());
        let mut edge_classes = Vec::new();

        for id in ids {
            let Some(info) = self.catalog.class(&id) else {
                warn!("class {id} listed but not found in catalog");
                continue;
            };
            if let ClassKind::Edge {
                source_class_id,
                target_class_id,
                directed,
            } = &info.kind
            {
                edge_classes.push((
                    id.clone(),
                    source_class_id.clone(),
                    target_class_id.clone(),
                    *directed,
                ));
            }
            lookup.insert(id, s.add_node(info));
        }

        for (edge_id, source, target, directed) in edge_classes {
            let ends = [(source, true), (target, false)];
            for (end, is_source) in ends {
                let Some(end) = end else {
                    continue;
                };
                let (Some(&end_idx), Some(&edge_idx)) = (lookup.get(&end), lookup.get(&edge_id))
                else {
                    warn!("edge class {edge_id} references unknown class {end}");
                    continue;
                };
                if is_source {
                    s.add_edge(
                        end_idx,
                        edge_idx,
                        ClassLink {
                            id: format!("{end}>{edge_id}"),
                            directed,
                        },
                    );
                } else {
                    s.add_edge(
                        edge_idx,
                        end_idx,
                        ClassLink {
                            id: format!("{edge_id}>{end}"),
                            directed,
                        },
                    );
                }
            }
        }

        s
    }
}

#[async_trait]
impl<C: ClassCatalog> Derive<ClassInfo, ClassLink> for ClassGraphDerive<C> {
    async fn derive(&self) -> Result<Snapshot<ClassInfo, ClassLink>> {
        Ok(self.derive_now())
    }
}

/// Class-level view of a model, keyed by class id so layouts survive catalog edits.
pub struct NetworkModelGraph {
    store: PersistentGraph<ClassInfo, ClassLink, ClassId>,
}

impl NetworkModelGraph {
    pub fn new(catalog: impl ClassCatalog + 'static) -> Self {
        Self {
            store: PersistentGraph::new(
                |info: &ClassInfo| Some(info.class_id.clone()),
                ClassGraphDerive::new(catalog),
            ),
        }
    }

    pub fn from_shared(catalog: Arc<dyn ClassCatalog>) -> Self {
        Self::new(catalog)
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.store = self.store.with_event_sink(sink);
        self
    }

    /// Re-reads the catalog.
    ///
    /// # Errors
    /// Never fails for in-memory catalogs; kept fallible to match [`PersistentGraph::update`].
    pub async fn update(&self) -> Result<UpdateOutcome> {
        self.store.update().await
    }

    pub fn store(&self) -> &PersistentGraph<ClassInfo, ClassLink, ClassId> {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot<ClassInfo, ClassLink> {
        self.store.snapshot()
    }
}
