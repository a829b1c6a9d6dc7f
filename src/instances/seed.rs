use std::collections::BTreeMap;

use crate::model::{InstanceId, InstanceRef};

/// Instances the user selected to be shown.
///
/// `Empty` means nothing was ever selected (or the selection was reset) and is distinct from a
/// cleared selection, which is an empty mapping.
#[derive(Debug, Clone, Default)]
pub enum SeedSet {
    #[default]
    Empty,
    Seeded(BTreeMap<InstanceId, InstanceRef>),
}

impl SeedSet {
    pub fn cleared() -> Self {
        Self::Seeded(BTreeMap::new())
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Seeded(m) if m.is_empty())
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        match self {
            Self::Empty => false,
            Self::Seeded(m) => m.contains_key(id),
        }
    }

    pub fn get(&self, id: &InstanceId) -> Option<&InstanceRef> {
        match self {
            Self::Empty => None,
            Self::Seeded(m) => m.get(id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Seeded(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seeded ids in ascending order.
    pub fn ids(&self) -> Vec<InstanceId> {
        match self {
            Self::Empty => Vec::new(),
            Self::Seeded(m) => m.keys().cloned().collect(),
        }
    }

    pub fn instances(&self) -> impl Iterator<Item = &InstanceRef> {
        let map = match self {
            Self::Empty => None,
            Self::Seeded(m) => Some(m),
        };
        map.into_iter().flat_map(BTreeMap::values)
    }

    /// Working copy of the mapping; the sentinel turns into an empty one.
    pub(crate) fn to_mapping(&self) -> BTreeMap<InstanceId, InstanceRef> {
        match self {
            Self::Empty => BTreeMap::new(),
            Self::Seeded(m) => m.clone(),
        }
    }

    /// Wraps a mapping, collapsing an empty one to the sentinel.
    pub(crate) fn collapse(mapping: BTreeMap<InstanceId, InstanceRef>) -> Self {
        if mapping.is_empty() {
            Self::Empty
        } else {
            Self::Seeded(mapping)
        }
    }
}
