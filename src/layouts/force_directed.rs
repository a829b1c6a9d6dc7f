use egui::{Pos2, Rect, Vec2};
use log::trace;
use petgraph::stable_graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FruchtermanReingoldState {
    pub is_running: bool,
    pub dt: f32,
    pub epsilon: f32,
    pub damping: f32,
    pub max_step: f32,
    pub k_scale: f32,
    pub c_attract: f32,
    pub c_repulse: f32,
}

impl Default for FruchtermanReingoldState {
    fn default() -> Self {
        FruchtermanReingoldState {
            is_running: true,
            dt: 0.05,
            epsilon: 1e-3,
            damping: 0.3,
            max_step: 10.0,
            k_scale: 1.0,
            c_attract: 1.0,
            c_repulse: 1.0,
        }
    }
}

/// Fruchterman-Reingold simulation over the placed nodes of a [`Snapshot`].
///
/// The applied displacement of a step is stored as the node velocity. Pinned nodes are held at
/// their pin with zero velocity. Unplaced nodes are ignored, see [`crate::place_unplaced`].
#[derive(Debug, Default)]
pub struct FruchtermanReingold {
    state: FruchtermanReingoldState,
    // Reusable displacement buffer to avoid per-step allocations
    scratch_disp: Vec<Vec2>,
}

impl FruchtermanReingold {
    pub fn from_state(state: FruchtermanReingoldState) -> Self {
        Self {
            state,
            scratch_disp: Vec::new(),
        }
    }

    pub fn state(&self) -> FruchtermanReingoldState {
        self.state.clone()
    }

    pub fn set_running(&mut self, running: bool) {
        self.state.is_running = running;
    }

    /// Advances the simulation by one step. Returns the average displacement of free nodes, or
    /// `None` when nothing was simulated.
    pub fn step<N, E>(&mut self, s: &mut Snapshot<N, E>, view: Rect) -> Option<f32> {
        if !self.state.is_running {
            return None;
        }

        let indices: Vec<(NodeIndex, Pos2)> = s
            .nodes_iter()
            .filter_map(|(idx, n)| n.location().map(|loc| (idx, loc)))
            .collect();

        let params = &self.state;
        let k = prepare_constants(view, indices.len(), params.k_scale)?;

        self.scratch_disp.clear();
        self.scratch_disp.resize(indices.len(), Vec2::ZERO);

        let start = instant::Instant::now();
        compute_repulsion(&indices, &mut self.scratch_disp, k, params);
        compute_attraction(s, &indices, &mut self.scratch_disp, k, params);
        let avg = apply_displacements(s, &indices, &self.scratch_disp, params);
        trace!("fr step over {} nodes in {:?}", indices.len(), start.elapsed());

        avg
    }
}

pub(crate) fn prepare_constants(canvas: Rect, node_count: usize, k_scale: f32) -> Option<f32> {
    if node_count == 0 {
        return None;
    }
    let n = node_count as f32;
    let area = canvas.area().max(1.0);
    let k_ideal = (area / n).sqrt(); // ideal edge length
    let k = k_ideal * k_scale;
    if !k.is_finite() {
        return None;
    }
    Some(k)
}

fn compute_repulsion(
    indices: &[(NodeIndex, Pos2)],
    disp: &mut [Vec2],
    k: f32,
    params: &FruchtermanReingoldState,
) {
    for i in 0..indices.len() {
        for j in (i + 1)..indices.len() {
            let delta = indices[i].1 - indices[j].1;
            let distance = delta.length().max(params.epsilon);
            let force = params.c_repulse * (k * k) / distance;
            let dir = delta / distance;
            disp[i] += dir * force;
            disp[j] -= dir * force;
        }
    }
}

fn compute_attraction<N, E>(
    s: &Snapshot<N, E>,
    indices: &[(NodeIndex, Pos2)],
    disp: &mut [Vec2],
    k: f32,
    params: &FruchtermanReingoldState,
) {
    for (vec_pos, &(idx, loc)) in indices.iter().enumerate() {
        for nbr in s.g().neighbors_undirected(idx) {
            let Some(nbr_loc) = s.node(nbr).and_then(crate::Node::location) else {
                continue;
            };
            let delta = nbr_loc - loc;
            let distance = delta.length().max(params.epsilon);
            let force = params.c_attract * (distance * distance) / k;
            disp[vec_pos] += (delta / distance) * force;
        }
    }
}

fn apply_displacements<N, E>(
    s: &mut Snapshot<N, E>,
    indices: &[(NodeIndex, Pos2)],
    disp: &[Vec2],
    params: &FruchtermanReingoldState,
) -> Option<f32> {
    let mut moved = 0usize;
    let mut total = 0.0f32;

    for (vec_pos, &(idx, loc)) in indices.iter().enumerate() {
        let Some(node) = s.node_mut(idx) else {
            continue;
        };

        if let Some(pin) = node.pinned() {
            node.set_location(pin);
            node.set_velocity(Vec2::ZERO);
            continue;
        }

        let mut step = disp[vec_pos] * params.dt * params.damping;
        if step.length() > params.max_step {
            step = step.normalized() * params.max_step;
        }
        let new_loc = loc + step;
        if !new_loc.x.is_finite() || !new_loc.y.is_finite() {
            continue;
        }
        node.set_location(new_loc);
        node.set_velocity(step);

        moved += 1;
        total += step.length();
    }

    (moved > 0).then(|| total / moved as f32)
}
