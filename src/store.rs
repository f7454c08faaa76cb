//! The board-state store: every piece of mutable configuration lives here,
//! and the mutation methods below are the only write path. Mutations are
//! total; nothing the UI can produce makes them fail.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::advisor::protocol::Advice;
use crate::counts::{DevCardCounts, ResourceCounts};
use crate::coords::CubeCoord;
use crate::template::{canonical_edge, BoardTemplate, EdgeId, NodeId};
use crate::types::{BuildingKind, Color, DevelopmentCard, Resource};

/// What a land tile produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Resource(Resource),
    Desert,
}

/// Configuration of one land tile. A desert never carries a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    pub kind: Option<TileKind>,
    pub number: Option<u8>,
}

/// A settlement or city on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub color: Color,
    pub kind: BuildingKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHand {
    pub resources: ResourceCounts,
    pub dev_cards: DevCardCounts,
    pub knights_played: u8,
}

#[derive(Debug, Clone)]
pub struct BoardStore {
    template: BoardTemplate,
    num_players: u8,
    advised: Color,
    tiles: HashMap<CubeCoord, TileConfig>,
    ports: HashMap<CubeCoord, Option<Resource>>,
    buildings: HashMap<NodeId, Building>,
    roads: HashMap<EdgeId, Color>,
    robber: Option<CubeCoord>,
    hands: BTreeMap<Color, PlayerHand>,
    advice: Option<Advice>,
}

impl BoardStore {
    pub fn new(template: BoardTemplate, num_players: u8, advised: Color) -> Self {
        let num_players = num_players.clamp(2, Color::ORDERED.len() as u8);
        let hands = Color::active(num_players as usize)
            .iter()
            .map(|color| (*color, PlayerHand::default()))
            .collect();
        Self {
            template,
            num_players,
            advised,
            tiles: HashMap::new(),
            ports: HashMap::new(),
            buildings: HashMap::new(),
            roads: HashMap::new(),
            robber: None,
            hands,
            advice: None,
        }
    }

    pub fn template(&self) -> &BoardTemplate {
        &self.template
    }

    pub fn num_players(&self) -> u8 {
        self.num_players
    }

    pub fn advised(&self) -> Color {
        self.advised
    }

    pub fn active_colors(&self) -> &'static [Color] {
        Color::active(self.num_players as usize)
    }

    pub fn tile(&self, coord: CubeCoord) -> TileConfig {
        self.tiles.get(&coord).copied().unwrap_or_default()
    }

    pub fn port(&self, coord: CubeCoord) -> Option<Resource> {
        self.ports.get(&coord).copied().flatten()
    }

    pub fn building_at(&self, node: NodeId) -> Option<Building> {
        self.buildings.get(&node).copied()
    }

    pub fn buildings(&self) -> impl Iterator<Item = (NodeId, Building)> + '_ {
        self.buildings.iter().map(|(id, b)| (*id, *b))
    }

    pub fn road_at(&self, a: NodeId, b: NodeId) -> Option<Color> {
        self.roads.get(&canonical_edge(a, b)).copied()
    }

    pub fn roads(&self) -> impl Iterator<Item = (EdgeId, Color)> + '_ {
        self.roads.iter().map(|(edge, color)| (*edge, *color))
    }

    pub fn robber(&self) -> Option<CubeCoord> {
        self.robber
    }

    pub fn hand(&self, color: Color) -> PlayerHand {
        self.hands.get(&color).copied().unwrap_or_default()
    }

    pub fn advice(&self) -> Option<&Advice> {
        self.advice.as_ref()
    }

    /// Overwrite a tile's configuration. Assigning desert clears the number
    /// and relocates the robber onto the tile.
    pub fn set_tile(&mut self, coord: CubeCoord, kind: Option<TileKind>, number: Option<u8>) {
        let config = if matches!(kind, Some(TileKind::Desert)) {
            self.robber = Some(coord);
            TileConfig { kind, number: None }
        } else {
            TileConfig { kind, number }
        };
        self.tiles.insert(coord, config);
    }

    /// Overwrite a port's trade resource; `None` is a generic 3:1 port.
    pub fn set_port(&mut self, coord: CubeCoord, resource: Option<Resource>) {
        self.ports.insert(coord, resource);
    }

    /// Place, replace, or remove a building. Re-applying the identical
    /// color and kind clears the node; anything else overwrites it.
    pub fn toggle_node(&mut self, node: NodeId, color: Color, kind: BuildingKind) {
        match self.buildings.get(&node) {
            Some(existing) if existing.color == color && existing.kind == kind => {
                self.buildings.remove(&node);
            }
            _ => {
                self.buildings.insert(node, Building { color, kind });
            }
        }
    }

    /// Same toggle rule for roads, keyed by the unordered node pair.
    pub fn toggle_edge(&mut self, a: NodeId, b: NodeId, color: Color) {
        let edge = canonical_edge(a, b);
        match self.roads.get(&edge) {
            Some(existing) if *existing == color => {
                self.roads.remove(&edge);
            }
            _ => {
                self.roads.insert(edge, color);
            }
        }
    }

    pub fn adjust_resource(&mut self, color: Color, resource: Resource, delta: i32) {
        if let Some(hand) = self.hands.get_mut(&color) {
            hand.resources.adjust(resource, delta);
        }
    }

    pub fn adjust_dev_card(&mut self, color: Color, card: DevelopmentCard, delta: i32) {
        if let Some(hand) = self.hands.get_mut(&color) {
            hand.dev_cards.adjust(card, delta);
        }
    }

    pub fn adjust_knights(&mut self, color: Color, delta: i32) {
        if let Some(hand) = self.hands.get_mut(&color) {
            hand.knights_played =
                (hand.knights_played as i64 + delta as i64).clamp(0, u8::MAX as i64) as u8;
        }
    }

    /// True once every land tile is assigned, exactly one tile is desert,
    /// and every non-desert tile carries a number token.
    pub fn is_complete(&self) -> bool {
        let mut deserts = 0;
        for coord in self.template.land_coords() {
            match self.tiles.get(coord) {
                Some(TileConfig {
                    kind: Some(TileKind::Desert),
                    ..
                }) => deserts += 1,
                Some(TileConfig {
                    kind: Some(TileKind::Resource(_)),
                    number: Some(_),
                }) => {}
                _ => return false,
            }
        }
        deserts == 1
    }

    /// Clear every configured value back to the template-load state.
    pub fn reset(&mut self) {
        self.tiles.clear();
        self.ports.clear();
        self.buildings.clear();
        self.roads.clear();
        self.robber = None;
        for hand in self.hands.values_mut() {
            *hand = PlayerHand::default();
        }
        self.advice = None;
    }

    pub fn set_advice(&mut self, advice: Advice) {
        self.advice = Some(advice);
    }

    pub fn clear_advice(&mut self) {
        self.advice = None;
    }

    /// Node the last response recommends building on, if it was a
    /// settlement or city action.
    pub fn recommended_node(&self) -> Option<NodeId> {
        self.advice.as_ref().and_then(Advice::recommended_node)
    }

    /// Node pair the last response recommends a road on, if it was a road
    /// action.
    pub fn recommended_edge(&self) -> Option<(NodeId, NodeId)> {
        self.advice.as_ref().and_then(Advice::recommended_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BoardStore {
        BoardStore::new(BoardTemplate::standard(), 2, Color::Red)
    }

    fn fill_complete(store: &mut BoardStore) {
        let coords: Vec<CubeCoord> = store.template().land_coords().to_vec();
        for (idx, coord) in coords.iter().enumerate() {
            if idx == 0 {
                store.set_tile(*coord, Some(TileKind::Desert), None);
            } else {
                store.set_tile(*coord, Some(TileKind::Resource(Resource::Wood)), Some(6));
            }
        }
    }

    #[test]
    fn empty_board_is_incomplete() {
        assert!(!store().is_complete());
    }

    #[test]
    fn complete_iff_assigned_one_desert_and_numbered() {
        let mut store = store();
        fill_complete(&mut store);
        assert!(store.is_complete());

        // Strip one number: incomplete again.
        let coord = store.template().land_coords()[3];
        store.set_tile(coord, Some(TileKind::Resource(Resource::Ore)), None);
        assert!(!store.is_complete());
        store.set_tile(coord, Some(TileKind::Resource(Resource::Ore)), Some(9));
        assert!(store.is_complete());

        // A second desert also breaks completion.
        store.set_tile(coord, Some(TileKind::Desert), None);
        assert!(!store.is_complete());
    }

    #[test]
    fn zero_deserts_is_incomplete() {
        let mut store = store();
        fill_complete(&mut store);
        let desert = store.template().land_coords()[0];
        store.set_tile(desert, Some(TileKind::Resource(Resource::Wheat)), Some(4));
        assert!(!store.is_complete());
    }

    #[test]
    fn desert_clears_number_and_takes_the_robber() {
        let mut store = store();
        let coord = store.template().land_coords()[5];
        store.set_tile(coord, Some(TileKind::Desert), Some(8));
        assert_eq!(store.tile(coord).number, None);
        assert_eq!(store.robber(), Some(coord));
    }

    #[test]
    fn toggle_node_is_an_involution() {
        let mut store = store();
        store.toggle_node(7, Color::Red, BuildingKind::Settlement);
        assert_eq!(
            store.building_at(7),
            Some(Building {
                color: Color::Red,
                kind: BuildingKind::Settlement
            })
        );
        store.toggle_node(7, Color::Red, BuildingKind::Settlement);
        assert_eq!(store.building_at(7), None);
    }

    #[test]
    fn toggle_node_overwrites_on_different_piece() {
        let mut store = store();
        store.toggle_node(7, Color::Red, BuildingKind::Settlement);
        store.toggle_node(7, Color::Blue, BuildingKind::City);
        assert_eq!(
            store.building_at(7),
            Some(Building {
                color: Color::Blue,
                kind: BuildingKind::City
            })
        );
    }

    #[test]
    fn edge_identity_ignores_direction() {
        let mut store = store();
        store.toggle_edge(9, 3, Color::Blue);
        assert_eq!(store.road_at(3, 9), Some(Color::Blue));
        assert_eq!(store.road_at(9, 3), Some(Color::Blue));
        store.toggle_edge(3, 9, Color::Blue);
        assert_eq!(store.road_at(3, 9), None);
    }

    #[test]
    fn adjustments_never_go_negative() {
        let mut store = store();
        store.adjust_resource(Color::Red, Resource::Brick, -10);
        assert_eq!(store.hand(Color::Red).resources.get(Resource::Brick), 0);
        store.adjust_dev_card(Color::Red, DevelopmentCard::Knight, 2);
        store.adjust_dev_card(Color::Red, DevelopmentCard::Knight, -5);
        assert_eq!(
            store.hand(Color::Red).dev_cards.get(DevelopmentCard::Knight),
            0
        );
        store.adjust_knights(Color::Blue, -1);
        assert_eq!(store.hand(Color::Blue).knights_played, 0);
        store.adjust_knights(Color::Blue, 3);
        assert_eq!(store.hand(Color::Blue).knights_played, 3);
    }

    #[test]
    fn inactive_colors_have_no_hand() {
        let mut store = store();
        store.adjust_resource(Color::White, Resource::Wood, 4);
        assert_eq!(store.hand(Color::White).resources.total(), 0);
    }
}
