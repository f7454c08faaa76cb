//! End-to-end flow without a network: template → store → snapshot JSON,
//! and advisory responses back into recommendations.

use catan_advisor::advisor::{Advice, AdvisorRequest};
use catan_advisor::scenario;
use catan_advisor::store::{BoardStore, TileKind};
use catan_advisor::template::BoardTemplate;
use catan_advisor::types::{BuildingKind, Color, Resource};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

#[test]
fn generated_scenario_serializes_into_a_full_request() {
    let mut store = BoardStore::new(BoardTemplate::standard(), 3, Color::Blue);
    let mut rng = StdRng::seed_from_u64(99);
    scenario::generate(&mut store, &mut rng);
    assert!(store.is_complete());

    let request = AdvisorRequest::from_store(&store).unwrap();
    assert_eq!(request.num_players, 3);
    assert_eq!(request.advised_player, Color::Blue);
    assert_eq!(request.tiles.len(), 19);
    assert_eq!(request.ports.len(), 9);
    // Two settlements and two roads per active color.
    assert_eq!(request.buildings.len(), 6);
    assert_eq!(request.roads.len(), 6);
    // Exactly one desert, encoded as a null resource, carrying the robber.
    let deserts: Vec<_> = request
        .tiles
        .iter()
        .filter(|tile| tile.resource.is_none())
        .collect();
    assert_eq!(deserts.len(), 1);
    assert_eq!(request.robber_coordinate, deserts[0].coordinate);
    assert_eq!(
        request.tiles.iter().filter(|t| t.number.is_some()).count(),
        18
    );
    // Knight counts cover the two non-advised colors only.
    assert_eq!(request.players_knights.len(), 2);
    assert!(request.players_knights.keys().all(|c| *c != Color::Blue));

    let value = serde_json::to_value(&request).unwrap();
    assert!(value["robber_coordinate"].is_array());
    assert!(value["player_resources"].is_object());
    for building in value["buildings"].as_array().unwrap() {
        assert!(building["node_id"].is_u64());
        assert!(building["color"].is_string());
        assert!(building["building"].is_string());
    }
}

#[test]
fn manual_setup_matches_the_service_schema() {
    let mut store = BoardStore::new(BoardTemplate::standard(), 2, Color::Red);
    let coords = store.template().land_coords().to_vec();
    for (idx, coord) in coords.iter().enumerate() {
        if idx == 9 {
            store.set_tile(*coord, Some(TileKind::Desert), None);
        } else {
            store.set_tile(*coord, Some(TileKind::Resource(Resource::Wheat)), Some(8));
        }
    }
    assert!(store.is_complete());
    store.toggle_node(7, Color::Red, BuildingKind::Settlement);

    let value = serde_json::to_value(AdvisorRequest::from_store(&store).unwrap()).unwrap();
    assert_eq!(
        value["buildings"],
        json!([{"node_id": 7, "color": "RED", "building": "SETTLEMENT"}])
    );
    assert_eq!(value["roads"], json!([]));
    assert_eq!(value["num_players"], json!(2));
    assert_eq!(value["advised_player"], json!("RED"));

    // The request survives a wire round trip.
    let text = value.to_string();
    let back: AdvisorRequest = serde_json::from_str(&text).unwrap();
    assert_eq!(back.buildings.len(), 1);
    assert_eq!(back.tiles.len(), 19);
}

#[test]
fn responses_drive_board_recommendations() {
    let mut store = BoardStore::new(BoardTemplate::standard(), 2, Color::Red);

    let city: Advice = serde_json::from_value(json!({
        "success": true,
        "action_type": "BUILD_CITY",
        "action_value": 12,
        "explanation": "Upgrade settlement at node 12 to a city.",
        "victory_points": {"RED": 3, "BLUE": 2},
        "all_actions": ["BUILD_CITY: 12", "END_TURN"]
    }))
    .unwrap();
    store.set_advice(city);
    assert_eq!(store.recommended_node(), Some(12));
    assert_eq!(store.recommended_edge(), None);

    let road: Advice = serde_json::from_value(json!({
        "success": true,
        "action_type": "BUILD_ROAD",
        "action_value": [3, 9],
        "explanation": "Build a road at edge (3, 9)."
    }))
    .unwrap();
    store.set_advice(road);
    assert_eq!(store.recommended_edge(), Some((3, 9)));
    assert_eq!(store.recommended_node(), None);

    store.clear_advice();
    assert_eq!(store.recommended_edge(), None);
}

#[test]
fn failed_responses_keep_the_server_text() {
    let advice: Advice = serde_json::from_str(
        r#"{"success": false, "error": "Missing or invalid JSON body", "trace": "..."}"#,
    )
    .unwrap();
    assert!(!advice.success);
    assert_eq!(advice.error.as_deref(), Some("Missing or invalid JSON body"));
}
