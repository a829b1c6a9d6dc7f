use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Layout fields a force simulation attaches to a node.
///
/// `location` is `None` until a layout places the node. A `pinned` position overrides the
/// simulated one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub location: Option<Pos2>,
    pub velocity: Vec2,
    pub pinned: Option<Pos2>,
}

impl NodeLayout {
    pub fn at(location: Pos2) -> Self {
        Self {
            location: Some(location),
            ..Default::default()
        }
    }

    pub fn is_placed(&self) -> bool {
        self.location.is_some()
    }
}

/// Stores client payload of a node together with its layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<N> {
    payload: N,
    layout: NodeLayout,
}

impl<N> Node<N> {
    pub fn new(payload: N) -> Self {
        Self {
            payload,
            layout: NodeLayout::default(),
        }
    }

    pub fn with_layout(payload: N, layout: NodeLayout) -> Self {
        Self { payload, layout }
    }

    pub fn payload(&self) -> &N {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut N {
        &mut self.payload
    }

    pub fn into_payload(self) -> N {
        self.payload
    }

    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: NodeLayout) {
        self.layout = layout;
    }

    pub fn location(&self) -> Option<Pos2> {
        self.layout.location
    }

    pub fn set_location(&mut self, loc: Pos2) {
        self.layout.location = Some(loc);
    }

    pub fn velocity(&self) -> Vec2 {
        self.layout.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.layout.velocity = velocity;
    }

    pub fn pinned(&self) -> Option<Pos2> {
        self.layout.pinned
    }

    /// Pins the node at the given position, or releases it with `None`.
    pub fn set_pinned(&mut self, pos: Option<Pos2>) {
        self.layout.pinned = pos;
    }
}
