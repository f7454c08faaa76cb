//! Wire shapes for the advisory service: snapshot serialization on the way
//! out, recommendation decoding on the way back. Field names and encodings
//! mirror the service schema exactly.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::coords::{CubeCoord, Direction};
use crate::store::{BoardStore, TileKind};
use crate::template::NodeId;
use crate::types::{ActionType, BuildingKind, Color, DevelopmentCard, Resource};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The robber has no tile. Building a request silently defaulting it to
    /// the origin would feed the advisor a wrong board, so this is refused.
    #[error("robber has not been placed on any tile")]
    RobberNotPlaced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilePayload {
    pub coordinate: CubeCoord,
    pub resource: Option<Resource>,
    pub number: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortPayload {
    pub coordinate: CubeCoord,
    pub direction: Direction,
    pub resource: Option<Resource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingPayload {
    pub node_id: NodeId,
    pub color: Color,
    pub building: BuildingKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadPayload {
    pub edge_id: (NodeId, NodeId),
    pub color: Color,
}

/// Body of `POST /api/advisor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub num_players: u8,
    pub advised_player: Color,
    pub tiles: Vec<TilePayload>,
    pub ports: Vec<PortPayload>,
    pub buildings: Vec<BuildingPayload>,
    pub roads: Vec<RoadPayload>,
    pub robber_coordinate: CubeCoord,
    pub player_resources: BTreeMap<Resource, u8>,
    pub player_dev_cards: BTreeMap<DevelopmentCard, u8>,
    pub players_knights: BTreeMap<Color, u8>,
}

impl AdvisorRequest {
    /// Serialize the store's current snapshot. The tile list covers every
    /// template land tile; desert and unset both encode as a null resource,
    /// which is how the service spells desert.
    pub fn from_store(store: &BoardStore) -> Result<Self, SnapshotError> {
        let robber_coordinate = store.robber().ok_or(SnapshotError::RobberNotPlaced)?;

        let tiles = store
            .template()
            .land_coords()
            .iter()
            .map(|coord| {
                let config = store.tile(*coord);
                let resource = match config.kind {
                    Some(TileKind::Resource(resource)) => Some(resource),
                    _ => None,
                };
                let number = resource.and(config.number);
                TilePayload {
                    coordinate: *coord,
                    resource,
                    number,
                }
            })
            .collect();

        let ports = store
            .template()
            .port_tiles()
            .map(|port| PortPayload {
                coordinate: port.coordinate,
                direction: port.direction,
                resource: store.port(port.coordinate),
            })
            .collect();

        let buildings = store
            .buildings()
            .sorted_by_key(|(node_id, _)| *node_id)
            .map(|(node_id, building)| BuildingPayload {
                node_id,
                color: building.color,
                building: building.kind,
            })
            .collect();

        let roads = store
            .roads()
            .sorted_by_key(|(edge, _)| *edge)
            .map(|(edge_id, color)| RoadPayload { edge_id, color })
            .collect();

        let advised = store.advised();
        let hand = store.hand(advised);
        let player_resources = hand.resources.iter().collect();
        let player_dev_cards = hand.dev_cards.iter().collect();
        let players_knights = store
            .active_colors()
            .iter()
            .filter(|color| **color != advised)
            .map(|color| (*color, store.hand(*color).knights_played))
            .collect();

        Ok(Self {
            num_players: store.num_players(),
            advised_player: advised,
            tiles,
            ports,
            buildings,
            roads,
            robber_coordinate,
            player_resources,
            player_dev_cards,
            players_knights,
        })
    }
}

/// The recommendation payload. Its shape depends on the action tag: a node
/// id for settlement/city, a node pair for roads, arbitrary JSON otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Node(NodeId),
    Edge(NodeId, NodeId),
    Other(serde_json::Value),
}

/// Body of the advisory response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub success: bool,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub action_value: Option<ActionValue>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub victory_points: Option<BTreeMap<Color, u8>>,
    #[serde(default)]
    pub all_actions: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Advice {
    /// The action tag parsed against the known vocabulary. Unknown tags
    /// yield `None` and simply carry no board highlight.
    pub fn action(&self) -> Option<ActionType> {
        self.action_type.as_deref().and_then(|tag| tag.parse().ok())
    }

    pub fn recommended_node(&self) -> Option<NodeId> {
        match self.action()? {
            ActionType::BuildSettlement | ActionType::BuildCity => match self.action_value {
                Some(ActionValue::Node(node)) => Some(node),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn recommended_edge(&self) -> Option<(NodeId, NodeId)> {
        match self.action()? {
            ActionType::BuildRoad => match self.action_value {
                Some(ActionValue::Edge(a, b)) => Some((a, b)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::BoardTemplate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn complete_store() -> BoardStore {
        let mut store = BoardStore::new(BoardTemplate::standard(), 2, Color::Red);
        let coords: Vec<CubeCoord> = store.template().land_coords().to_vec();
        for (idx, coord) in coords.iter().enumerate() {
            if idx == 0 {
                store.set_tile(*coord, Some(TileKind::Desert), None);
            } else {
                store.set_tile(*coord, Some(TileKind::Resource(Resource::Sheep)), Some(5));
            }
        }
        store
    }

    #[test]
    fn snapshot_requires_a_robber() {
        let store = BoardStore::new(BoardTemplate::standard(), 2, Color::Red);
        assert!(matches!(
            AdvisorRequest::from_store(&store),
            Err(SnapshotError::RobberNotPlaced)
        ));
    }

    #[test]
    fn one_settlement_no_roads_serializes_exactly() {
        let mut store = complete_store();
        store.toggle_node(7, Color::Red, BuildingKind::Settlement);
        let request = AdvisorRequest::from_store(&store).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["buildings"],
            json!([{"node_id": 7, "color": "RED", "building": "SETTLEMENT"}])
        );
        assert_eq!(value["roads"], json!([]));
    }

    #[test]
    fn desert_and_unset_tiles_encode_as_null_resource() {
        let store = complete_store();
        let request = AdvisorRequest::from_store(&store).unwrap();
        let desert = &request.tiles[0];
        assert_eq!(desert.resource, None);
        assert_eq!(desert.number, None);
        // The desert tile carries the robber.
        assert_eq!(request.robber_coordinate, desert.coordinate);
    }

    #[test]
    fn knights_cover_active_colors_except_the_advised() {
        let mut store = BoardStore::new(BoardTemplate::standard(), 3, Color::Blue);
        let coords: Vec<CubeCoord> = store.template().land_coords().to_vec();
        for (idx, coord) in coords.iter().enumerate() {
            if idx == 0 {
                store.set_tile(*coord, Some(TileKind::Desert), None);
            } else {
                store.set_tile(*coord, Some(TileKind::Resource(Resource::Ore)), Some(10));
            }
        }
        store.adjust_knights(Color::Red, 2);
        let request = AdvisorRequest::from_store(&store).unwrap();
        assert_eq!(
            request.players_knights,
            BTreeMap::from([(Color::Red, 2), (Color::Orange, 0)])
        );
    }

    #[test]
    fn road_action_yields_an_edge_and_no_node() {
        let advice: Advice = serde_json::from_value(json!({
            "success": true,
            "action_type": "BUILD_ROAD",
            "action_value": [3, 9],
            "explanation": "Build a road at edge (3, 9)."
        }))
        .unwrap();
        assert_eq!(advice.recommended_edge(), Some((3, 9)));
        assert_eq!(advice.recommended_node(), None);
    }

    #[test]
    fn settlement_action_yields_a_node() {
        let advice: Advice = serde_json::from_value(json!({
            "success": true,
            "action_type": "BUILD_SETTLEMENT",
            "action_value": 12,
            "explanation": "Build a settlement at node 12."
        }))
        .unwrap();
        assert_eq!(advice.recommended_node(), Some(12));
        assert_eq!(advice.recommended_edge(), None);
    }

    #[test]
    fn unknown_action_tags_are_tolerated() {
        let advice: Advice = serde_json::from_value(json!({
            "success": true,
            "action_type": "NO_ACTIONS",
            "action_value": null,
            "explanation": "No legal actions available in this state.",
            "victory_points": {"RED": 2, "BLUE": 3},
            "all_actions": []
        }))
        .unwrap();
        assert_eq!(advice.action(), None);
        assert_eq!(advice.recommended_node(), None);
        assert_eq!(advice.recommended_edge(), None);
        assert_eq!(
            advice.victory_points,
            Some(BTreeMap::from([(Color::Red, 2), (Color::Blue, 3)]))
        );
    }

    #[test]
    fn structured_values_fall_through_to_other() {
        let advice: Advice = serde_json::from_value(json!({
            "success": true,
            "action_type": "MOVE_ROBBER",
            "action_value": [[0, 0, 0], "BLUE"],
            "explanation": "Move the robber."
        }))
        .unwrap();
        assert!(matches!(advice.action_value, Some(ActionValue::Other(_))));
        assert_eq!(advice.recommended_edge(), None);
    }
}
