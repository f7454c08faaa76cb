//! Random scenario generation: a deterministic shape with shuffled
//! content, used to seed demos and exercise the full configuration flow
//! without manual setup. Output always satisfies the completion invariant.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::store::{BoardStore, TileKind};
use crate::template::{EdgeId, NodeId};
use crate::types::{BuildingKind, Resource};

const SETTLEMENTS_PER_COLOR: usize = 2;

/// The real game's tile distribution: four each of wood/sheep/wheat, three
/// each of brick/ore, one desert.
fn tile_pool() -> Vec<Option<Resource>> {
    let mut pool = Vec::with_capacity(19);
    for resource in [Resource::Wood, Resource::Sheep, Resource::Wheat] {
        pool.extend(std::iter::repeat(Some(resource)).take(4));
    }
    for resource in [Resource::Brick, Resource::Ore] {
        pool.extend(std::iter::repeat(Some(resource)).take(3));
    }
    pool.push(None);
    pool
}

/// Two tokens for each value 2..12 except 7, with 2 and 12 appearing once.
fn number_pool() -> Vec<u8> {
    vec![2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12]
}

/// One 2:1 port per resource plus four generic ports.
fn port_pool() -> Vec<Option<Resource>> {
    let mut pool: Vec<Option<Resource>> = Resource::ALL.iter().copied().map(Some).collect();
    pool.extend(std::iter::repeat(None).take(4));
    pool
}

/// Fill the store with a random, complete scenario.
pub fn generate(store: &mut BoardStore, rng: &mut impl Rng) {
    store.reset();

    let mut resources = tile_pool();
    resources.shuffle(rng);
    let mut numbers = number_pool();
    numbers.shuffle(rng);

    let land_coords = store.template().land_coords().to_vec();
    for coord in land_coords {
        match resources.pop().expect("tile pool exhausted") {
            Some(resource) => {
                let number = numbers.pop().expect("number pool exhausted");
                store.set_tile(coord, Some(TileKind::Resource(resource)), Some(number));
            }
            // Desert: no number, and set_tile parks the robber here.
            None => store.set_tile(coord, Some(TileKind::Desert), None),
        }
    }

    let mut ports = port_pool();
    ports.shuffle(rng);
    let port_coords = store.template().port_coords().to_vec();
    for coord in port_coords {
        store.set_port(coord, ports.pop().expect("port pool exhausted"));
    }

    place_starting_pieces(store, rng);

    let advised = store.advised();
    for resource in Resource::ALL {
        store.adjust_resource(advised, resource, rng.gen_range(0..=3));
    }

    debug!(advised = %advised, "random scenario generated");
}

/// Up to two settlements per active color, respecting the distance rule,
/// each with one road attached.
fn place_starting_pieces(store: &mut BoardStore, rng: &mut impl Rng) {
    let mut node_pool: Vec<NodeId> = store.template().node_ids().collect();
    node_pool.shuffle(rng);
    let mut used: HashSet<NodeId> = HashSet::new();

    for color in store.active_colors() {
        let mut placed = 0;
        for &node in &node_pool {
            if placed == SETTLEMENTS_PER_COLOR {
                break;
            }
            if used.contains(&node) {
                continue;
            }
            store.toggle_node(node, *color, BuildingKind::Settlement);
            used.insert(node);
            for neighbor in store.template().neighbors(node) {
                used.insert(*neighbor);
            }

            let open_edges: Vec<EdgeId> = store
                .template()
                .incident_edges(node)
                .iter()
                .copied()
                .filter(|(a, b)| store.road_at(*a, *b).is_none())
                .collect();
            if let Some((a, b)) = open_edges.choose(rng) {
                store.toggle_edge(*a, *b, *color);
            }
            placed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BoardTemplate;
    use crate::types::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generated(seed: u64, num_players: u8) -> BoardStore {
        let mut store = BoardStore::new(BoardTemplate::standard(), num_players, Color::Red);
        let mut rng = StdRng::seed_from_u64(seed);
        generate(&mut store, &mut rng);
        store
    }

    #[test]
    fn output_is_always_complete() {
        for seed in 0..20 {
            assert!(generated(seed, 4).is_complete(), "seed {seed}");
        }
    }

    #[test]
    fn exactly_eighteen_numbered_tiles_and_one_bare_desert() {
        let store = generated(7, 2);
        let mut numbered = 0;
        let mut deserts = 0;
        for coord in store.template().land_coords() {
            let config = store.tile(*coord);
            if matches!(config.kind, Some(TileKind::Desert)) {
                deserts += 1;
                assert_eq!(config.number, None);
                assert_eq!(store.robber(), Some(*coord));
            }
            if config.number.is_some() {
                numbered += 1;
            }
        }
        assert_eq!(numbered, 18);
        assert_eq!(deserts, 1);
    }

    #[test]
    fn settlements_respect_the_distance_rule() {
        let store = generated(11, 4);
        let occupied: Vec<NodeId> = store.buildings().map(|(node, _)| node).collect();
        assert_eq!(occupied.len(), 8);
        for &node in &occupied {
            for neighbor in store.template().neighbors(node) {
                assert!(
                    !occupied.contains(neighbor),
                    "nodes {node} and {neighbor} are adjacent"
                );
            }
        }
    }

    #[test]
    fn every_color_gets_a_road_touching_its_settlement() {
        let store = generated(3, 3);
        for (edge, color) in store.roads() {
            let touches_own = [edge.0, edge.1].iter().any(|node| {
                store
                    .building_at(*node)
                    .is_some_and(|building| building.color == color)
            });
            assert!(touches_own, "road {edge:?} floats free of {color}");
        }
    }

    #[test]
    fn advised_player_gets_zero_to_three_of_each() {
        for seed in 0..10 {
            let store = generated(seed, 2);
            let hand = store.hand(Color::Red);
            for (_, count) in hand.resources.iter() {
                assert!(count <= 3);
            }
        }
    }

    #[test]
    fn regeneration_replaces_the_previous_scenario() {
        let mut store = BoardStore::new(BoardTemplate::standard(), 2, Color::Red);
        let mut rng = StdRng::seed_from_u64(1);
        generate(&mut store, &mut rng);
        let first_roads: Vec<_> = store.roads().collect();
        generate(&mut store, &mut rng);
        assert!(store.is_complete());
        // Old pieces are gone; at most the per-color quota remains.
        assert_eq!(store.buildings().count(), 4);
        let _ = first_roads;
    }
}
