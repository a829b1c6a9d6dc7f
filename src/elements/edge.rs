use serde::{Deserialize, Serialize};

/// Stores client payload of an edge. Endpoints are kept by the owning [`crate::Snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<E> {
    payload: E,
}

impl<E> Edge<E> {
    pub fn new(payload: E) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut E {
        &mut self.payload
    }
}
