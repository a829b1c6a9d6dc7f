use egui::{Pos2, Vec2};
use petgraph::stable_graph::NodeIndex;
use rand::Rng;

use crate::{SettingsLayout, Snapshot};

/// Gives every unplaced node a location. Does not override existing locations.
///
/// A pinned node goes to its pin. Otherwise the node spawns next to an already placed
/// neighbour, or anywhere inside the spawn square when it has none. Returns the number of
/// nodes placed.
pub fn place_unplaced<N, E>(s: &mut Snapshot<N, E>, settings: &SettingsLayout) -> usize {
    let unplaced: Vec<NodeIndex> = s
        .nodes_iter()
        .filter(|(_, n)| !n.layout().is_placed())
        .map(|(idx, _)| idx)
        .collect();

    let mut rng = rand::rng();
    let jitter = settings.spawn_jitter.abs().max(f32::EPSILON);
    let spawn = settings.spawn_size.abs().max(f32::EPSILON);

    for idx in &unplaced {
        let anchor = s
            .g()
            .neighbors_undirected(*idx)
            .find_map(|nbr| s.node(nbr).and_then(crate::Node::location));

        let Some(node) = s.node_mut(*idx) else {
            continue;
        };

        let loc = match (node.pinned(), anchor) {
            (Some(pin), _) => pin,
            (None, Some(anchor)) => {
                anchor
                    + Vec2::new(
                        rng.random_range(-jitter..jitter),
                        rng.random_range(-jitter..jitter),
                    )
            }
            (None, None) => Pos2::new(rng.random_range(0. ..spawn), rng.random_range(0. ..spawn)),
        };
        node.set_location(loc);
    }

    unplaced.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_existing_locations() {
        let mut s: Snapshot<(), ()> = Snapshot::new();
        let a = s.add_node_with_location((), Pos2::new(1000., 1000.));
        let b = s.add_node(());
        s.add_edge(a, b, ());

        let settings = SettingsLayout::default().with_spawn_jitter(10.);
        assert_eq!(place_unplaced(&mut s, &settings), 1);

        assert_eq!(s.node(a).unwrap().location(), Some(Pos2::new(1000., 1000.)));
        let loc_b = s.node(b).unwrap().location().unwrap();
        assert!((loc_b - Pos2::new(1000., 1000.)).length() <= 10. * 2f32.sqrt());
    }

    #[test]
    fn pinned_node_spawns_at_pin() {
        let mut s: Snapshot<(), ()> = Snapshot::new();
        let a = s.add_node_custom((), |n| n.set_pinned(Some(Pos2::new(-5., 7.))));
        place_unplaced(&mut s, &SettingsLayout::default());
        assert_eq!(s.node(a).unwrap().location(), Some(Pos2::new(-5., 7.)));
    }

    #[test]
    fn isolated_node_spawns_inside_square() {
        let mut s: Snapshot<(), ()> = Snapshot::new();
        let a = s.add_node(());
        place_unplaced(&mut s, &SettingsLayout::default().with_spawn_size(50.));
        let loc = s.node(a).unwrap().location().unwrap();
        assert!((0. ..50.).contains(&loc.x));
        assert!((0. ..50.).contains(&loc.y));
    }
}
