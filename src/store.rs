use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;

use crate::events::{Event, EventSink, PayloadGraphUpdated, PayloadUpdateSuperseded};
use crate::{NodeLayout, Result, Snapshot};

/// Produces a fresh node/edge set reflecting the current truth of some external source.
///
/// Implementations read whatever they need and must not touch the store they feed.
#[async_trait]
pub trait Derive<N, E>: Send + Sync {
    /// # Errors
    /// Any failure reading the source. The store keeps its committed snapshot.
    async fn derive(&self) -> Result<Snapshot<N, E>>;
}

/// Stable identity of a node payload. `None` opts the node out of layout preservation.
pub type KeyFn<N, K> = Arc<dyn Fn(&N) -> Option<K> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The derived snapshot was swapped in under this generation.
    Committed(u64),
    /// A later update was requested while this one was in flight; its result was dropped.
    Superseded(u64),
}

struct Committed<N, E> {
    snapshot: Snapshot<N, E>,
    generation: u64,
}

/// Re-derives a graph on demand while carrying node layouts over from one snapshot to the next.
///
/// Nodes are matched by the key function; every node whose key is present in both the outgoing
/// and the incoming snapshot gets the outgoing node's [`NodeLayout`] verbatim.
pub struct PersistentGraph<N, E, K> {
    key_fn: KeyFn<N, K>,
    derive: Arc<dyn Derive<N, E>>,

    current: Mutex<Committed<N, E>>,
    /// Generation of the most recent update request
    requested: AtomicU64,

    events_sink: Option<Arc<dyn EventSink>>,
}

impl<N, E, K> PersistentGraph<N, E, K>
where
    K: Eq + Hash,
{
    pub fn new(
        key_fn: impl Fn(&N) -> Option<K> + Send + Sync + 'static,
        derive: impl Derive<N, E> + 'static,
    ) -> Self {
        Self::from_parts(Arc::new(key_fn), Arc::new(derive))
    }

    pub fn from_parts(key_fn: KeyFn<N, K>, derive: Arc<dyn Derive<N, E>>) -> Self {
        Self {
            key_fn,
            derive,
            current: Mutex::new(Committed {
                snapshot: Snapshot::default(),
                generation: 0,
            }),
            requested: AtomicU64::new(0),
            events_sink: None,
        }
    }

    /// Supply a sink that receives an event after every committed or superseded update.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events_sink = Some(sink);
        self
    }

    /// Re-derives the graph and swaps it in, preserving layouts of nodes with matching keys.
    ///
    /// Concurrent calls are allowed; the latest request wins and results of requests that were
    /// overtaken are discarded.
    ///
    /// # Errors
    /// Propagates the derivation error. The committed snapshot is left untouched in that case.
    pub async fn update(&self) -> Result<UpdateOutcome> {
        let generation = self.requested.fetch_add(1, Ordering::SeqCst) + 1;

        let mut next = self.derive.derive().await?;

        let committed = {
            let mut current = self.current.lock();
            if self.requested.load(Ordering::SeqCst) == generation {
                let preserved = self.harvest(&current.snapshot);
                self.restore(&mut next, &preserved);

                current.snapshot = next;
                current.generation = generation;
                Some((current.snapshot.node_count(), current.snapshot.edge_count()))
            } else {
                None
            }
        };

        let Some((nodes, edges)) = committed else {
            debug!("update {generation} superseded before commit");
            self.publish_event(Event::UpdateSuperseded(PayloadUpdateSuperseded {
                generation,
            }));
            return Ok(UpdateOutcome::Superseded(generation));
        };

        debug!("update {generation} committed: {nodes} nodes, {edges} edges");
        self.publish_event(Event::GraphUpdated(PayloadGraphUpdated {
            generation,
            nodes,
            edges,
        }));

        Ok(UpdateOutcome::Committed(generation))
    }

    /// Generation of the committed snapshot, `0` before the first update.
    pub fn generation(&self) -> u64 {
        self.current.lock().generation
    }

    pub fn key_of(&self, payload: &N) -> Option<K> {
        (self.key_fn)(payload)
    }

    /// Gives read access to the committed snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&Snapshot<N, E>) -> R) -> R {
        f(&self.current.lock().snapshot)
    }

    /// Gives write access to the committed snapshot, e.g. for simulation ticks or drags.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Snapshot<N, E>) -> R) -> R {
        f(&mut self.current.lock().snapshot)
    }

    /// Layout of the committed node with the given key.
    pub fn layout_of(&self, key: &K) -> Option<NodeLayout> {
        self.read(|s| {
            s.nodes_iter()
                .find(|(_, n)| (self.key_fn)(n.payload()).as_ref() == Some(key))
                .map(|(_, n)| *n.layout())
        })
    }

    fn harvest(&self, snapshot: &Snapshot<N, E>) -> HashMap<K, NodeLayout> {
        snapshot
            .nodes_iter()
            .filter_map(|(_, n)| (self.key_fn)(n.payload()).map(|k| (k, *n.layout())))
            .collect()
    }

    fn restore(&self, snapshot: &mut Snapshot<N, E>, preserved: &HashMap<K, NodeLayout>) {
        for node in snapshot.nodes_iter_mut() {
            let Some(key) = (self.key_fn)(node.payload()) else {
                continue;
            };
            if let Some(layout) = preserved.get(&key) {
                node.set_layout(*layout);
            }
        }
    }

    fn publish_event(&self, event: Event) {
        if let Some(sink) = &self.events_sink {
            sink.send(event);
        }
    }
}

impl<N, E, K> PersistentGraph<N, E, K>
where
    N: Clone,
    E: Clone,
    K: Eq + Hash,
{
    /// Copy of the committed snapshot, handed to a renderer.
    pub fn snapshot(&self) -> Snapshot<N, E> {
        self.read(Clone::clone)
    }
}
