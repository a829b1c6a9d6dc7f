#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use netmodel_graphs::model::{Instance, InstanceId, InstanceKind, InstanceRef, InstanceStream};
use netmodel_graphs::Error;
use parking_lot::RwLock;

#[derive(Default)]
struct ModelData {
    kinds: HashMap<String, InstanceKind>,
    edges_of: HashMap<String, Vec<String>>,
    sources: HashMap<String, Vec<String>>,
    targets: HashMap<String, Vec<String>>,
    broken: HashSet<String>,
}

/// In-memory model library. Instances are handles into shared tables.
#[derive(Clone, Default)]
pub struct MockModel {
    data: Arc<RwLock<ModelData>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> InstanceRef {
        self.data
            .write()
            .kinds
            .insert(id.to_string(), InstanceKind::Node);
        self.get(id)
    }

    pub fn edge(&self, id: &str, sources: &[&str], targets: &[&str]) -> InstanceRef {
        {
            let mut data = self.data.write();
            data.kinds.insert(id.to_string(), InstanceKind::Edge);
            data.sources
                .insert(id.to_string(), sources.iter().map(ToString::to_string).collect());
            data.targets
                .insert(id.to_string(), targets.iter().map(ToString::to_string).collect());
            for end in sources.iter().chain(targets) {
                let incident = data.edges_of.entry((*end).to_string()).or_default();
                if !incident.iter().any(|e| e == id) {
                    incident.push(id.to_string());
                }
            }
        }
        self.get(id)
    }

    pub fn get(&self, id: &str) -> InstanceRef {
        Arc::new(MockInstance {
            id: id.to_string(),
            model: self.clone(),
        })
    }

    /// Every relation read of the instance fails from now on.
    pub fn break_reads(&self, id: &str) {
        self.data.write().broken.insert(id.to_string());
    }

    pub fn fix_reads(&self, id: &str) {
        self.data.write().broken.remove(id);
    }

    fn related(
        &self,
        id: &str,
        table: fn(&ModelData) -> &HashMap<String, Vec<String>>,
    ) -> InstanceStream {
        let data = self.data.read();
        if data.broken.contains(id) {
            let err = Error::ModelRead(format!("instance {id} is unreadable"));
            return stream::iter(vec![Err(err)]).boxed();
        }
        let items: Vec<_> = table(&data)
            .get(id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|other| Ok(self.get(&other)))
            .collect();
        stream::iter(items).boxed()
    }
}

struct MockInstance {
    id: String,
    model: MockModel,
}

impl Instance for MockInstance {
    fn instance_id(&self) -> InstanceId {
        InstanceId::new(self.id.clone())
    }

    fn kind(&self) -> InstanceKind {
        self.model
            .data
            .read()
            .kinds
            .get(&self.id)
            .copied()
            .unwrap_or(InstanceKind::Node)
    }

    fn edges(&self) -> InstanceStream {
        self.model.related(&self.id, |d| &d.edges_of)
    }

    fn source_nodes(&self) -> InstanceStream {
        self.model.related(&self.id, |d| &d.sources)
    }

    fn target_nodes(&self) -> InstanceStream {
        self.model.related(&self.id, |d| &d.targets)
    }
}

pub fn ids(list: &[&str]) -> Vec<InstanceId> {
    let mut out: Vec<InstanceId> = list.iter().map(|id| InstanceId::from(*id)).collect();
    out.sort();
    out
}
