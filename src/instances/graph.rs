use std::collections::BTreeMap;
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt};
use log::debug;
use parking_lot::RwLock;

use super::{InstanceLink, InstanceNode, SeedSet, SeedSetDerive};
use crate::events::EventSink;
use crate::model::{ClassId, InstanceId, InstanceKind, InstanceRef, InstanceStream};
use crate::{PersistentGraph, Result, Snapshot, UpdateOutcome};

type Mapping = BTreeMap<InstanceId, InstanceRef>;

/// Keeps the instance graph in sync with the seed set.
///
/// Seeding a node pulls in every edge that connects it to something already seeded; seeding an
/// edge pulls in its endpoints. Unseeding a node drops the edges left without an end.
pub struct InstanceGraph {
    seeds: Arc<RwLock<SeedSet>>,
    seeded_class: Option<ClassId>,
    store: PersistentGraph<InstanceNode, InstanceLink, InstanceId>,
}

impl Default for InstanceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceGraph {
    pub fn new() -> Self {
        let seeds = Arc::new(RwLock::new(SeedSet::Empty));
        Self {
            store: PersistentGraph::new(
                InstanceNode::instance_id,
                SeedSetDerive::new(seeds.clone()),
            ),
            seeds,
            seeded_class: None,
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.store = self.store.with_event_sink(sink);
        self
    }

    pub fn store(&self) -> &PersistentGraph<InstanceNode, InstanceLink, InstanceId> {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot<InstanceNode, InstanceLink> {
        self.store.snapshot()
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.seeds.read().contains(id)
    }

    pub fn is_reset(&self) -> bool {
        self.seeds.read().is_reset()
    }

    pub fn is_clear(&self) -> bool {
        self.seeds.read().is_clear()
    }

    pub fn seed_ids(&self) -> Vec<InstanceId> {
        self.seeds.read().ids()
    }

    /// Class whose instances were seeded by the last [`InstanceGraph::seed_class`], until the
    /// seed set is changed otherwise.
    pub fn seeded_class(&self) -> Option<&ClassId> {
        self.seeded_class.as_ref()
    }

    /// Adds instances and everything they connect to among the seeded ones.
    ///
    /// # Errors
    /// Propagates model read failures. The seed set and the graph stay as they were.
    pub async fn seed(
        &mut self,
        instances: impl IntoIterator<Item = InstanceRef>,
    ) -> Result<UpdateOutcome> {
        let mut working = self.seeds.read().to_mapping();
        let before = working.len();
        seed_into(&mut working, instances).await?;
        debug!("seed admitted {} instances", working.len() - before);

        self.commit(SeedSet::Seeded(working), None).await
    }

    /// Removes instances and the edges they leave dangling. Does nothing when nothing is seeded.
    ///
    /// # Errors
    /// Propagates model read failures. The seed set and the graph stay as they were.
    pub async fn unseed(
        &mut self,
        instances: impl IntoIterator<Item = InstanceRef>,
    ) -> Result<Option<UpdateOutcome>> {
        let mut working = match &*self.seeds.read() {
            SeedSet::Empty => return Ok(None),
            SeedSet::Seeded(m) => m.clone(),
        };
        let before = working.len();

        for instance in instances {
            let removed_id = instance.instance_id();
            working.remove(&removed_id);
            if instance.kind() != InstanceKind::Node {
                continue;
            }

            let mut edges = instance.edges();
            while let Some(edge) = edges.try_next().await? {
                let edge_id = edge.instance_id();
                if !working.contains_key(&edge_id) {
                    continue;
                }
                let has_source = any_remaining(edge.source_nodes(), &working, &removed_id).await?;
                let has_target = any_remaining(edge.target_nodes(), &working, &removed_id).await?;
                if !has_source || !has_target {
                    working.remove(&edge_id);
                }
            }
        }
        debug!("unseed removed {} instances", before - working.len());

        self.commit(SeedSet::collapse(working), None)
            .await
            .map(Some)
    }

    /// Back to the sentinel: nothing selected.
    ///
    /// # Errors
    /// See [`PersistentGraph::update`].
    pub async fn reset(&mut self) -> Result<UpdateOutcome> {
        self.commit(SeedSet::Empty, None).await
    }

    /// Explicitly empty selection.
    ///
    /// # Errors
    /// See [`PersistentGraph::update`].
    pub async fn clear(&mut self) -> Result<UpdateOutcome> {
        self.commit(SeedSet::cleared(), None).await
    }

    /// Replaces the seed set with every instance of a class.
    ///
    /// # Errors
    /// Propagates model read failures. The seed set and the graph stay as they were.
    pub async fn seed_class(
        &mut self,
        class_id: ClassId,
        instances: InstanceStream,
    ) -> Result<UpdateOutcome> {
        let instances: Vec<InstanceRef> = instances.try_collect().await?;
        let mut working = Mapping::new();
        seed_into(&mut working, instances).await?;
        debug!("class {class_id} seeded {} instances", working.len());

        self.commit(SeedSet::Seeded(working), Some(class_id)).await
    }

    async fn commit(
        &mut self,
        next: SeedSet,
        seeded_class: Option<ClassId>,
    ) -> Result<UpdateOutcome> {
        let previous = std::mem::replace(&mut *self.seeds.write(), next);
        match self.store.update().await {
            Ok(outcome) => {
                self.seeded_class = seeded_class;
                Ok(outcome)
            }
            Err(err) => {
                *self.seeds.write() = previous;
                Err(err)
            }
        }
    }
}

async fn seed_into(
    working: &mut Mapping,
    instances: impl IntoIterator<Item = InstanceRef>,
) -> Result<()> {
    let mut added_nodes: Vec<InstanceRef> = Vec::new();

    for instance in instances {
        working.insert(instance.instance_id(), instance.clone());
        match instance.kind() {
            InstanceKind::Node => added_nodes.push(instance),
            InstanceKind::Edge => {
                let mut ends = instance.source_nodes().chain(instance.target_nodes());
                while let Some(node) = ends.try_next().await? {
                    working.insert(node.instance_id(), node.clone());
                    added_nodes.push(node);
                }
            }
        }
    }

    for node in &added_nodes {
        let mut edges = node.edges();
        while let Some(edge) = edges.try_next().await? {
            let edge_id = edge.instance_id();
            if working.contains_key(&edge_id) {
                continue;
            }
            if any_seeded(edge.source_nodes(), working).await?
                && any_seeded(edge.target_nodes(), working).await?
            {
                working.insert(edge_id, edge);
            }
        }
    }

    Ok(())
}

async fn any_seeded(mut nodes: InstanceStream, working: &Mapping) -> Result<bool> {
    while let Some(node) = nodes.try_next().await? {
        if working.contains_key(&node.instance_id()) {
            return Ok(true);
        }
    }
    Ok(false)
}

async fn any_remaining(
    mut nodes: InstanceStream,
    working: &Mapping,
    removed: &InstanceId,
) -> Result<bool> {
    while let Some(node) = nodes.try_next().await? {
        let id = node.instance_id();
        if id != *removed && working.contains_key(&id) {
            return Ok(true);
        }
    }
    Ok(false)
}
