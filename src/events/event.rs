use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadGraphUpdated {
    /// Committed generation of the store after the swap.
    pub generation: u64,
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadUpdateSuperseded {
    /// Generation of the discarded request.
    pub generation: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadPathChanged {
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    GraphUpdated(PayloadGraphUpdated),
    UpdateSuperseded(PayloadUpdateSuperseded),
    PathChanged(PayloadPathChanged),
}
