//! Read-only board topology, either decoded from the advisory service's
//! `GET /api/advisor/board-template` response or stitched together locally
//! for offline use. All mutable configuration lives in the store; the
//! template never changes after load.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::coords::{CubeCoord, Direction};
use crate::types::{EdgeRef, NodeRef, Resource};

pub type NodeId = u16;
pub type EdgeId = (NodeId, NodeId);

/// Direction-independent edge identity.
pub fn canonical_edge(a: NodeId, b: NodeId) -> EdgeId {
    (a.min(b), a.max(b))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandTile {
    pub id: u16,
    pub coordinate: CubeCoord,
    #[serde(default)]
    pub resource: Option<Resource>,
    #[serde(default)]
    pub number: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortTile {
    pub id: u16,
    pub coordinate: CubeCoord,
    pub direction: Direction,
    #[serde(default)]
    pub resource: Option<Resource>,
}

/// One tile entry of the template response. The service tags land tiles as
/// `RESOURCE_TILE` or `DESERT` depending on the shuffle it happened to
/// serve; the client treats both as plain land and ignores the embedded
/// resource/number content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateTile {
    ResourceTile(LandTile),
    Desert(LandTile),
    Port(PortTile),
}

impl TemplateTile {
    pub fn as_land(&self) -> Option<&LandTile> {
        match self {
            TemplateTile::ResourceTile(tile) | TemplateTile::Desert(tile) => Some(tile),
            TemplateTile::Port(_) => None,
        }
    }

    pub fn as_port(&self) -> Option<&PortTile> {
        match self {
            TemplateTile::Port(port) => Some(port),
            _ => None,
        }
    }
}

/// A vertex shared by up to three land tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateNode {
    pub id: NodeId,
    pub tile_coordinates: Vec<CubeCoord>,
    pub direction: NodeRef,
}

/// A side shared by up to two land tiles, referencing its endpoint nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEdge {
    pub node_ids: (NodeId, NodeId),
    pub tile_coordinate: CubeCoord,
    pub direction: EdgeRef,
}

/// Raw body of the template endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub tiles: Vec<TemplateTile>,
    #[serde(default)]
    pub nodes: Vec<TemplateNode>,
    #[serde(default)]
    pub edges: Vec<TemplateEdge>,
}

#[derive(Debug, Clone)]
pub struct BoardTemplate {
    pub tiles: Vec<TemplateTile>,
    pub nodes: Vec<TemplateNode>,
    pub edges: Vec<TemplateEdge>,
    land_coords: Vec<CubeCoord>,
    port_coords: Vec<CubeCoord>,
    node_neighbors: HashMap<NodeId, SmallVec<[NodeId; 3]>>,
    node_edges: HashMap<NodeId, SmallVec<[EdgeId; 3]>>,
}

impl BoardTemplate {
    pub fn new(
        tiles: Vec<TemplateTile>,
        nodes: Vec<TemplateNode>,
        edges: Vec<TemplateEdge>,
    ) -> Self {
        let land_coords = tiles
            .iter()
            .filter_map(|tile| tile.as_land().map(|land| land.coordinate))
            .collect();
        let port_coords = tiles
            .iter()
            .filter_map(|tile| tile.as_port().map(|port| port.coordinate))
            .collect();

        let mut node_neighbors: HashMap<NodeId, SmallVec<[NodeId; 3]>> = HashMap::new();
        let mut node_edges: HashMap<NodeId, SmallVec<[EdgeId; 3]>> = HashMap::new();
        for edge in &edges {
            let (a, b) = edge.node_ids;
            let id = canonical_edge(a, b);
            for (from, to) in [(a, b), (b, a)] {
                let neighbors = node_neighbors.entry(from).or_default();
                if !neighbors.contains(&to) {
                    neighbors.push(to);
                }
                let incident = node_edges.entry(from).or_default();
                if !incident.contains(&id) {
                    incident.push(id);
                }
            }
        }

        Self {
            tiles,
            nodes,
            edges,
            land_coords,
            port_coords,
            node_neighbors,
            node_edges,
        }
    }

    pub fn from_response(response: TemplateResponse) -> Self {
        Self::new(response.tiles, response.nodes, response.edges)
    }

    /// Land tile coordinates in template order.
    pub fn land_coords(&self) -> &[CubeCoord] {
        &self.land_coords
    }

    /// Port tile coordinates in template order.
    pub fn port_coords(&self) -> &[CubeCoord] {
        &self.port_coords
    }

    pub fn land_tiles(&self) -> impl Iterator<Item = &LandTile> {
        self.tiles.iter().filter_map(TemplateTile::as_land)
    }

    pub fn port_tiles(&self) -> impl Iterator<Item = &PortTile> {
        self.tiles.iter().filter_map(TemplateTile::as_port)
    }

    pub fn port_at(&self, coordinate: CubeCoord) -> Option<&PortTile> {
        self.port_tiles().find(|port| port.coordinate == coordinate)
    }

    /// Ids of every node touching a land tile.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|node| node.id)
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.node_neighbors
            .get(&node)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn incident_edges(&self, node: NodeId) -> &[EdgeId] {
        self.node_edges
            .get(&node)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// The base 19-land/9-port board, stitched offline. Topology only:
    /// land tiles carry no resource or number.
    pub fn standard() -> Self {
        build_standard()
    }
}

#[derive(Debug, Clone, Copy)]
enum TopologyKind {
    Land,
    Water,
    Port(Direction),
}

fn standard_topology() -> Vec<(CubeCoord, TopologyKind)> {
    use TopologyKind::*;
    vec![
        (CubeCoord::new(0, 0, 0), Land),
        (CubeCoord::new(1, -1, 0), Land),
        (CubeCoord::new(0, -1, 1), Land),
        (CubeCoord::new(-1, 0, 1), Land),
        (CubeCoord::new(-1, 1, 0), Land),
        (CubeCoord::new(0, 1, -1), Land),
        (CubeCoord::new(1, 0, -1), Land),
        (CubeCoord::new(2, -2, 0), Land),
        (CubeCoord::new(1, -2, 1), Land),
        (CubeCoord::new(0, -2, 2), Land),
        (CubeCoord::new(-1, -1, 2), Land),
        (CubeCoord::new(-2, 0, 2), Land),
        (CubeCoord::new(-2, 1, 1), Land),
        (CubeCoord::new(-2, 2, 0), Land),
        (CubeCoord::new(-1, 2, -1), Land),
        (CubeCoord::new(0, 2, -2), Land),
        (CubeCoord::new(1, 1, -2), Land),
        (CubeCoord::new(2, 0, -2), Land),
        (CubeCoord::new(2, -1, -1), Land),
        (CubeCoord::new(3, -3, 0), Port(Direction::West)),
        (CubeCoord::new(2, -3, 1), Water),
        (CubeCoord::new(1, -3, 2), Port(Direction::Northwest)),
        (CubeCoord::new(0, -3, 3), Water),
        (CubeCoord::new(-1, -2, 3), Port(Direction::Northwest)),
        (CubeCoord::new(-2, -1, 3), Water),
        (CubeCoord::new(-3, 0, 3), Port(Direction::Northeast)),
        (CubeCoord::new(-3, 1, 2), Water),
        (CubeCoord::new(-3, 2, 1), Port(Direction::East)),
        (CubeCoord::new(-3, 3, 0), Water),
        (CubeCoord::new(-2, 3, -1), Port(Direction::East)),
        (CubeCoord::new(-1, 3, -2), Water),
        (CubeCoord::new(0, 3, -3), Port(Direction::Southeast)),
        (CubeCoord::new(1, 2, -3), Water),
        (CubeCoord::new(2, 1, -3), Port(Direction::Southwest)),
        (CubeCoord::new(3, 0, -3), Water),
        (CubeCoord::new(3, -1, -2), Port(Direction::Southwest)),
        (CubeCoord::new(3, -2, -1), Water),
    ]
}

/// Which of this tile's corners coincide with corners of the neighbor in a
/// given direction, and which side they share. Drives node/edge adoption
/// when tiles are stitched in topology order.
const ADOPTIONS: [(Direction, [(NodeRef, NodeRef); 2], (EdgeRef, EdgeRef)); 6] = [
    (
        Direction::East,
        [
            (NodeRef::Northeast, NodeRef::Northwest),
            (NodeRef::Southeast, NodeRef::Southwest),
        ],
        (EdgeRef::East, EdgeRef::West),
    ),
    (
        Direction::Southeast,
        [
            (NodeRef::South, NodeRef::Northwest),
            (NodeRef::Southeast, NodeRef::North),
        ],
        (EdgeRef::Southeast, EdgeRef::Northwest),
    ),
    (
        Direction::Southwest,
        [
            (NodeRef::South, NodeRef::Northeast),
            (NodeRef::Southwest, NodeRef::North),
        ],
        (EdgeRef::Southwest, EdgeRef::Northeast),
    ),
    (
        Direction::West,
        [
            (NodeRef::Northwest, NodeRef::Northeast),
            (NodeRef::Southwest, NodeRef::Southeast),
        ],
        (EdgeRef::West, EdgeRef::East),
    ),
    (
        Direction::Northwest,
        [
            (NodeRef::North, NodeRef::Southeast),
            (NodeRef::Northwest, NodeRef::South),
        ],
        (EdgeRef::Northwest, EdgeRef::Southeast),
    ),
    (
        Direction::Northeast,
        [
            (NodeRef::North, NodeRef::Southwest),
            (NodeRef::Northeast, NodeRef::South),
        ],
        (EdgeRef::Northeast, EdgeRef::Southwest),
    ),
];

fn edge_corners(edge: EdgeRef) -> (NodeRef, NodeRef) {
    match edge {
        EdgeRef::East => (NodeRef::Northeast, NodeRef::Southeast),
        EdgeRef::Southeast => (NodeRef::Southeast, NodeRef::South),
        EdgeRef::Southwest => (NodeRef::South, NodeRef::Southwest),
        EdgeRef::West => (NodeRef::Southwest, NodeRef::Northwest),
        EdgeRef::Northwest => (NodeRef::Northwest, NodeRef::North),
        EdgeRef::Northeast => (NodeRef::North, NodeRef::Northeast),
    }
}

#[derive(Debug, Clone, Default)]
struct StitchedTile {
    nodes: HashMap<NodeRef, NodeId>,
    edges: HashMap<EdgeRef, (NodeId, NodeId)>,
}

/// Assign node and edge ids for a tile, adopting ids from already-placed
/// neighbors so shared corners resolve to a single node.
fn stitch_tile(
    placed: &HashMap<CubeCoord, StitchedTile>,
    coordinate: CubeCoord,
    next_node: &mut NodeId,
) -> StitchedTile {
    let mut nodes: HashMap<NodeRef, NodeId> = HashMap::new();
    let mut edges: HashMap<EdgeRef, (NodeId, NodeId)> = HashMap::new();

    for (direction, corner_pairs, (own_edge, their_edge)) in ADOPTIONS {
        let Some(neighbor) = placed.get(&coordinate.neighbor(direction)) else {
            continue;
        };
        for (own_corner, their_corner) in corner_pairs {
            if let Some(id) = neighbor.nodes.get(&their_corner) {
                nodes.insert(own_corner, *id);
            }
        }
        if let Some(pair) = neighbor.edges.get(&their_edge) {
            edges.insert(own_edge, *pair);
        }
    }

    for corner in NodeRef::iter() {
        nodes.entry(corner).or_insert_with(|| {
            let id = *next_node;
            *next_node += 1;
            id
        });
    }

    for edge in EdgeRef::iter() {
        let (a_ref, b_ref) = edge_corners(edge);
        edges.entry(edge).or_insert((nodes[&a_ref], nodes[&b_ref]));
    }

    StitchedTile { nodes, edges }
}

fn build_standard() -> BoardTemplate {
    let topology = standard_topology();
    let mut placed: HashMap<CubeCoord, StitchedTile> = HashMap::new();
    let mut next_node: NodeId = 0;

    let mut tiles: Vec<TemplateTile> = Vec::new();
    let mut land_autoinc: u16 = 0;
    let mut port_autoinc: u16 = 0;
    let mut node_touches: HashMap<NodeId, Vec<(CubeCoord, NodeRef)>> = HashMap::new();
    let mut edges: Vec<TemplateEdge> = Vec::new();
    let mut seen_edges: HashSet<EdgeId> = HashSet::new();

    for (coordinate, kind) in topology {
        let stitched = stitch_tile(&placed, coordinate, &mut next_node);

        match kind {
            TopologyKind::Land => {
                for corner in NodeRef::iter() {
                    node_touches
                        .entry(stitched.nodes[&corner])
                        .or_default()
                        .push((coordinate, corner));
                }
                for edge_ref in EdgeRef::iter() {
                    let pair = stitched.edges[&edge_ref];
                    let id = canonical_edge(pair.0, pair.1);
                    if seen_edges.insert(id) {
                        edges.push(TemplateEdge {
                            node_ids: pair,
                            tile_coordinate: coordinate,
                            direction: edge_ref,
                        });
                    }
                }
                tiles.push(TemplateTile::ResourceTile(LandTile {
                    id: land_autoinc,
                    coordinate,
                    resource: None,
                    number: None,
                }));
                land_autoinc += 1;
            }
            TopologyKind::Port(direction) => {
                tiles.push(TemplateTile::Port(PortTile {
                    id: port_autoinc,
                    coordinate,
                    direction,
                    resource: None,
                }));
                port_autoinc += 1;
            }
            TopologyKind::Water => {}
        }

        placed.insert(coordinate, stitched);
    }

    let mut nodes: Vec<TemplateNode> = node_touches
        .into_iter()
        .map(|(id, touches)| {
            let direction = touches[0].1;
            TemplateNode {
                id,
                tile_coordinates: touches.into_iter().map(|(coord, _)| coord).collect(),
                direction,
            }
        })
        .collect();
    nodes.sort_by_key(|node| node.id);

    BoardTemplate::new(tiles, nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_shape() {
        let template = BoardTemplate::standard();
        assert_eq!(template.land_coords().len(), 19);
        assert_eq!(template.port_coords().len(), 9);
        assert_eq!(template.nodes.len(), 54);
        assert_eq!(template.edges.len(), 72);
    }

    #[test]
    fn stitched_neighbors_share_nodes() {
        let template = BoardTemplate::standard();
        // Each interior edge appears once; its two endpoint nodes are
        // reachable from one another.
        for edge in &template.edges {
            let (a, b) = edge.node_ids;
            assert!(template.neighbors(a).contains(&b));
            assert!(template.neighbors(b).contains(&a));
        }
    }

    #[test]
    fn interior_node_touches_three_tiles() {
        let template = BoardTemplate::standard();
        let center_touching = template
            .nodes
            .iter()
            .filter(|node| node.tile_coordinates.contains(&CubeCoord::new(0, 0, 0)))
            .collect::<Vec<_>>();
        assert_eq!(center_touching.len(), 6);
        for node in center_touching {
            assert_eq!(node.tile_coordinates.len(), 3);
        }
    }

    #[test]
    fn every_node_has_two_or_three_incident_edges() {
        let template = BoardTemplate::standard();
        for node in &template.nodes {
            let incident = template.incident_edges(node.id).len();
            assert!((2..=3).contains(&incident), "node {}: {incident}", node.id);
        }
    }

    #[test]
    fn decodes_the_service_template_shape() {
        let body = r#"{
            "success": true,
            "tiles": [
                {"coordinate": [0, 0, 0], "id": 0, "type": "RESOURCE_TILE", "resource": "WOOD", "number": 5},
                {"coordinate": [1, -1, 0], "id": 1, "type": "DESERT", "resource": null, "number": null},
                {"coordinate": [3, -3, 0], "id": 0, "type": "PORT", "direction": "WEST", "resource": null}
            ],
            "nodes": [
                {"id": 0, "tile_coordinates": [[0, 0, 0], [1, -1, 0]], "direction": "NORTHEAST"}
            ],
            "edges": [
                {"node_ids": [0, 1], "tile_coordinate": [0, 0, 0], "direction": "EAST"}
            ]
        }"#;
        let response: TemplateResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        let template = BoardTemplate::from_response(response);
        assert_eq!(template.land_coords().len(), 2);
        assert_eq!(template.port_coords(), &[CubeCoord::new(3, -3, 0)]);
        let port = template.port_at(CubeCoord::new(3, -3, 0)).unwrap();
        assert_eq!(port.direction, Direction::West);
        assert_eq!(template.neighbors(0), &[1]);
        assert_eq!(template.incident_edges(1), &[(0, 1)]);
    }
}
