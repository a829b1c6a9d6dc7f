use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use parking_lot::RwLock;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::SeedSet;
use crate::model::{InstanceId, InstanceKind, InstanceRef, InstanceStream};
use crate::{Derive, Result, Snapshot};

/// Node of the instance graph.
#[derive(Debug, Clone)]
pub enum InstanceNode {
    Instance(InstanceRef),
    /// Stands in for the missing end of an edge whose endpoint isn't seeded.
    Dummy,
}

impl InstanceNode {
    /// Identity used to carry layouts over; dummies have none.
    pub fn instance_id(&self) -> Option<InstanceId> {
        match self {
            Self::Instance(i) => Some(i.instance_id()),
            Self::Dummy => None,
        }
    }

    pub fn instance(&self) -> Option<&InstanceRef> {
        match self {
            Self::Instance(i) => Some(i),
            Self::Dummy => None,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, Self::Dummy)
    }
}

/// Link of the instance graph, one per (source, target) pair of a seeded edge instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceLink {
    pub edge_id: InstanceId,
}

/// Builds the instance graph from the seed set it shares with its [`super::InstanceGraph`].
pub struct SeedSetDerive {
    seeds: Arc<RwLock<SeedSet>>,
}

impl SeedSetDerive {
    pub fn new(seeds: Arc<RwLock<SeedSet>>) -> Self {
        Self { seeds }
    }
}

#[async_trait]
impl Derive<InstanceNode, InstanceLink> for SeedSetDerive {
    async fn derive(&self) -> Result<Snapshot<InstanceNode, InstanceLink>> {
        // the lock guard must not live across an await
        let seeded: Vec<InstanceRef> = self.seeds.read().instances().cloned().collect();

        let mut s = Snapshot::with_capacity(seeded.len(), seeded.len());
        let mut lookup: HashMap<InstanceId, NodeIndex> = HashMap::with_capacity(seeded.len());

        for instance in seeded.iter().filter(|i| i.kind() == InstanceKind::Node) {
            let idx = s.add_node(InstanceNode::Instance(instance.clone()));
            lookup.insert(instance.instance_id(), idx);
        }

        for edge in seeded.iter().filter(|i| i.kind() == InstanceKind::Edge) {
            let mut sources = seeded_ends(edge.source_nodes(), &lookup).await?;
            let mut targets = seeded_ends(edge.target_nodes(), &lookup).await?;
            if sources.is_empty() {
                sources.push(s.add_node(InstanceNode::Dummy));
            }
            if targets.is_empty() {
                targets.push(s.add_node(InstanceNode::Dummy));
            }

            let edge_id = edge.instance_id();
            for &source in &sources {
                for &target in &targets {
                    s.add_edge(
                        source,
                        target,
                        InstanceLink {
                            edge_id: edge_id.clone(),
                        },
                    );
                }
            }
        }

        Ok(s)
    }
}

async fn seeded_ends(
    mut ends: InstanceStream,
    lookup: &HashMap<InstanceId, NodeIndex>,
) -> Result<Vec<NodeIndex>> {
    let mut found = Vec::new();
    while let Some(end) = ends.try_next().await? {
        if let Some(&idx) = lookup.get(&end.instance_id()) {
            if !found.contains(&idx) {
                found.push(idx);
            }
        }
    }
    Ok(found)
}
