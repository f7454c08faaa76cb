//! ASCII rendering of the standard board from the store's configuration.
//! The fixed-art template mirrors the service's node numbering; filled
//! cells, node labels, road tracing, and the recommendation overlay are
//! computed per render.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::coords::CubeCoord;
use crate::store::{BoardStore, TileKind};
use crate::template::NodeId;
use crate::types::{BuildingKind, Color, Resource};

/// Marker used to trace a recommended road edge that has no road yet.
pub const RECOMMENDED_EDGE_CHAR: char = '*';
/// Marker appended to a tile's number cell when the robber sits there.
pub const ROBBER_CHAR: char = '#';

const LAND_TILE_SLOTS: usize = 19;
const MAX_TEMPLATE_NODE_ID: NodeId = 53;
const PLACEHOLDER_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GridPos {
    row: usize,
    col: usize,
}

/// Position of a node label in the rendered text, for span styling.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpan {
    pub row: usize,
    pub col_start: usize,
    pub len: usize,
}

#[derive(Debug, Clone)]
pub struct RenderedBoard {
    pub text: String,
    pub node_spans: Vec<(NodeId, NodeSpan)>,
}

pub fn render_board(store: &BoardStore, selected_tile: Option<CubeCoord>) -> RenderedBoard {
    let coord_to_pos = display_positions(store.template().land_coords());

    let mut resource_strings = vec!["     ".to_string(); LAND_TILE_SLOTS];
    let mut number_strings = vec!["     ".to_string(); LAND_TILE_SLOTS];

    for (coord, &pos) in &coord_to_pos {
        if pos >= LAND_TILE_SLOTS {
            continue;
        }
        let config = store.tile(*coord);
        let letter = match config.kind {
            Some(TileKind::Resource(resource)) => resource_char(resource),
            Some(TileKind::Desert) => 'D',
            None => '.',
        };
        resource_strings[pos] = if selected_tile == Some(*coord) {
            format!("( {letter} )")
        } else {
            format!("  {letter}  ")
        };

        let mut cell = config.number.map(|n| n.to_string()).unwrap_or_default();
        if store.robber() == Some(*coord) {
            cell.push(ROBBER_CHAR);
        }
        let padding = " ".repeat(PLACEHOLDER_LEN.saturating_sub(cell.chars().count()));
        number_strings[pos] = format!("{cell}{padding}");
    }

    // Node labels: building markers where pieces stand, ids elsewhere.
    let mut node_labels = default_node_labels();
    for (node_id, building) in store.buildings() {
        node_labels.insert(
            node_id,
            building_marker(building.color, building.kind).to_string(),
        );
    }

    let mut output = board_art().to_string();
    for i in 0..LAND_TILE_SLOTS {
        output = output.replace(&format!("{{r{i:02}}}"), &resource_strings[i]);
        output = output.replace(&format!("{{n{i:02}}}"), &number_strings[i]);
    }

    let mut grid: Vec<Vec<char>> = output.lines().map(|line| line.chars().collect()).collect();
    let mut node_positions: HashMap<NodeId, GridPos> = HashMap::new();
    let mut node_spans: Vec<(NodeId, NodeSpan)> = Vec::new();

    for (row_idx, line) in grid.iter_mut().enumerate() {
        replace_node_placeholders(
            row_idx,
            line,
            &node_labels,
            &mut node_positions,
            &mut node_spans,
        );
    }

    trace_roads(&mut grid, store, &node_positions);
    trace_recommended_edge(&mut grid, store, &node_positions);

    let text = grid
        .iter()
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    RenderedBoard { text, node_spans }
}

/// Display slot for each land coordinate. The art's visual rows run along
/// `x + 2z` (top row -4, bottom row 4) with tiles ordered left-to-right
/// by `x` within a row; this matches the fixed template's cell layout.
fn display_positions(coords: &[CubeCoord]) -> HashMap<CubeCoord, usize> {
    let mut sorted: Vec<CubeCoord> = coords.to_vec();
    sorted.sort_by_key(|coord| (coord.x + 2 * coord.z, coord.x));
    sorted
        .into_iter()
        .enumerate()
        .map(|(pos, coord)| (coord, pos))
        .collect()
}

pub fn resource_char(resource: Resource) -> char {
    match resource {
        Resource::Wood => 'W',
        Resource::Brick => 'B',
        Resource::Sheep => 'S',
        Resource::Wheat => 'H',
        Resource::Ore => 'O',
    }
}

pub fn color_char(color: Color) -> char {
    match color {
        Color::Red => 'R',
        Color::Blue => 'B',
        Color::Orange => 'O',
        Color::White => 'W',
    }
}

pub fn color_char_lower(color: Color) -> char {
    color_char(color).to_ascii_lowercase()
}

/// Settlements are lowercase, cities uppercase.
fn building_marker(color: Color, kind: BuildingKind) -> char {
    match kind {
        BuildingKind::Settlement => color_char_lower(color),
        BuildingKind::City => color_char(color),
    }
}

fn default_node_labels() -> HashMap<NodeId, String> {
    (0..=MAX_TEMPLATE_NODE_ID)
        .map(|node_id| (node_id, node_id.to_string()))
        .collect()
}

fn replace_node_placeholders(
    row_idx: usize,
    line: &mut Vec<char>,
    labels: &HashMap<NodeId, String>,
    node_positions: &mut HashMap<NodeId, GridPos>,
    node_spans: &mut Vec<(NodeId, NodeSpan)>,
) {
    let mut col: usize = 0;
    while col + PLACEHOLDER_LEN <= line.len() {
        if line[col] == '{' && line[col + 1] == 'v' && line[col + 4] == '}' {
            let tens = line[col + 2];
            let ones = line[col + 3];
            if tens.is_ascii_digit() && ones.is_ascii_digit() {
                let node_id = ((tens as u8 - b'0') * 10 + (ones as u8 - b'0')) as NodeId;
                let label = labels
                    .get(&node_id)
                    .cloned()
                    .unwrap_or_else(|| node_id.to_string());
                let replacement: Vec<char> = label.chars().collect();
                let center_col = col + replacement.len().saturating_sub(1) / 2;
                node_positions.insert(
                    node_id,
                    GridPos {
                        row: row_idx,
                        col: center_col,
                    },
                );
                node_spans.push((
                    node_id,
                    NodeSpan {
                        row: row_idx,
                        col_start: col,
                        len: replacement.len(),
                    },
                ));
                let inserted = replacement.len();
                line.splice(col..col + PLACEHOLDER_LEN, replacement);
                col += inserted;
                continue;
            }
        }
        col += 1;
    }
}

fn trace_roads(grid: &mut [Vec<char>], store: &BoardStore, positions: &HashMap<NodeId, GridPos>) {
    for ((a, b), color) in store.roads() {
        paint_edge(grid, positions, a, b, color_char_lower(color));
    }
}

fn trace_recommended_edge(
    grid: &mut [Vec<char>],
    store: &BoardStore,
    positions: &HashMap<NodeId, GridPos>,
) {
    if let Some((a, b)) = store.recommended_edge() {
        if store.road_at(a, b).is_none() {
            paint_edge(grid, positions, a, b, RECOMMENDED_EDGE_CHAR);
        }
    }
}

fn paint_edge(
    grid: &mut [Vec<char>],
    positions: &HashMap<NodeId, GridPos>,
    a: NodeId,
    b: NodeId,
    marker: char,
) {
    let (Some(start), Some(end)) = (positions.get(&a), positions.get(&b)) else {
        return;
    };
    if let Some(path) = find_edge_path(grid, *start, *end) {
        for pos in path {
            grid[pos.row][pos.col] = marker;
        }
    }
}

/// Walk the `_ / \` glyphs between two node positions.
fn find_edge_path(grid: &[Vec<char>], start: GridPos, end: GridPos) -> Option<Vec<GridPos>> {
    let mut queue = VecDeque::new();
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    let mut parent: HashMap<(usize, usize), (usize, usize)> = HashMap::new();

    for neighbor in edge_neighbors(start, grid) {
        let key = (neighbor.row, neighbor.col);
        visited.insert(key);
        parent.insert(key, (start.row, start.col));
        queue.push_back(neighbor);
    }

    while let Some(pos) = queue.pop_front() {
        if is_adjacent(pos, end) {
            return Some(reconstruct_path(pos, (start.row, start.col), &parent));
        }
        for neighbor in edge_neighbors(pos, grid) {
            let key = (neighbor.row, neighbor.col);
            if visited.insert(key) {
                parent.insert(key, (pos.row, pos.col));
                queue.push_back(neighbor);
            }
        }
    }

    None
}

fn edge_neighbors(origin: GridPos, grid: &[Vec<char>]) -> Vec<GridPos> {
    let mut neighbors = Vec::new();
    for dr in -1i32..=1 {
        for dc in -1i32..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let nr = origin.row as i32 + dr;
            let nc = origin.col as i32 + dc;
            if nr < 0 || nc < 0 {
                continue;
            }
            let (row, col) = (nr as usize, nc as usize);
            if row >= grid.len() || col >= grid[row].len() {
                continue;
            }
            if matches!(grid[row][col], '_' | '/' | '\\') {
                neighbors.push(GridPos { row, col });
            }
        }
    }
    neighbors
}

fn is_adjacent(pos: GridPos, node: GridPos) -> bool {
    let dr = pos.row as i32 - node.row as i32;
    let dc = pos.col as i32 - node.col as i32;
    dr.abs() <= 1 && dc.abs() <= 1
}

fn reconstruct_path(
    mut current: GridPos,
    start: (usize, usize),
    parent: &HashMap<(usize, usize), (usize, usize)>,
) -> Vec<GridPos> {
    let mut path = vec![current];
    while let Some(&(pr, pc)) = parent.get(&(current.row, current.col)) {
        if (pr, pc) == start {
            break;
        }
        current = GridPos { row: pr, col: pc };
        path.push(current);
    }
    path.reverse();
    path
}

/// The standard board with the service's node numbering. `{rNN}`/`{nNN}`
/// are the resource and number cells of tile NN in row-major display order;
/// `{vNN}` is the label slot for node NN.
fn board_art() -> &'static str {
    r#"
                               {v47}_____{v45}
                              /         \
                             /           \
                   {v44}______{v43}    {r00}    {v46}______{v48}
                  /         \    {n00}    /         \
                 /           \           /           \
       {v42}______{v40}    {r01}    {v21}_______{v19}    {r02}    {v49}______{v50}
      /         \    {n01}    /         \    {n02}    /         \
     /           \           /           \           /           \
   {v41}    {r03}    {v18}_______{v16}    {r04}    {v20}_______{v22}    {r05}    {v51}
    \    {n03}    /         \    {n04}    /         \    {n05}    /
     \           /           \           /           \           /
      {v39}_______{v17}    {r06}    {v05}_________{v00}   {r07}    {v23}_______{v52}
      /         \    {n06}    /         \    {n07}    /         \
     /           \           /           \           /           \
   {v38}    {r08}    {v15}________{v04}    {r09}    {v01}_________{v06}    {r10}    {v53}
    \    {n08}    /         \    {n09}    /         \    {n10}    /
     \           /           \           /           \           /
      {v37}_______{v14}    {r11}    {v03}_________{v02}    {r12}    {v07}________{v24}
      /         \    {n11}    /         \    {n12}    /         \
     /           \           /           \           /           \
   {v36}    {r13}    {v13}_______{v12}    {r14}    {v09}_________{v08}    {r15}    {v25}
    \    {n13}    /         \    {n14}    /         \    {n15}    /
     \           /           \           /           \           /
      {v35}_______{v34}    {r16}    {v11}_______{v10}    {r17}    {v27}_______{v26}
                \    {n16}    /         \    {n17}    /
                 \           /           \           /
                  {v33}_______{v32}    {r18}    {v29}_______{v28}
                            \    {n18}    /
                             \           /
                              {v31}_______{v30}
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::Advice;
    use crate::template::BoardTemplate;
    use serde_json::json;

    fn store() -> BoardStore {
        BoardStore::new(BoardTemplate::standard(), 2, Color::Red)
    }

    #[test]
    fn renders_every_node_slot() {
        let rendered = render_board(&store(), None);
        assert_eq!(rendered.node_spans.len(), 54);
        assert!(!rendered.text.contains("{v"));
        assert!(!rendered.text.contains("{r"));
        assert!(!rendered.text.contains("{n"));
    }

    #[test]
    fn unset_tiles_show_a_dot() {
        let rendered = render_board(&store(), None);
        assert!(rendered.text.contains('.'));
    }

    #[test]
    fn buildings_replace_node_labels() {
        let mut store = store();
        store.toggle_node(0, Color::Red, BuildingKind::Settlement);
        store.toggle_node(2, Color::Blue, BuildingKind::City);
        let rendered = render_board(&store, None);
        let red = rendered
            .node_spans
            .iter()
            .find(|(id, _)| *id == 0)
            .map(|(_, span)| *span)
            .unwrap();
        let line = rendered.text.lines().nth(red.row).unwrap();
        let label: String = line.chars().skip(red.col_start).take(red.len).collect();
        assert_eq!(label, "r");
    }

    #[test]
    fn robber_marks_the_desert_cell() {
        let mut store = store();
        let coord = store.template().land_coords()[0];
        store.set_tile(coord, Some(TileKind::Desert), None);
        let rendered = render_board(&store, None);
        assert!(rendered.text.contains(ROBBER_CHAR));
        assert!(rendered.text.contains('D'));
    }

    #[test]
    fn selection_parenthesizes_the_tile_cell() {
        let mut store = store();
        let coord = store.template().land_coords()[0];
        store.set_tile(coord, Some(TileKind::Resource(Resource::Wood)), Some(6));
        let rendered = render_board(&store, Some(coord));
        assert!(rendered.text.contains("( W )"));
    }

    #[test]
    fn tiles_land_in_their_art_slots() {
        let mut store = store();
        let coord = CubeCoord::new(2, 0, -2);
        store.set_tile(coord, Some(TileKind::Resource(Resource::Ore)), Some(5));
        let rendered = render_board(&store, Some(coord));
        // Tile (2, 0, -2) renders between its corner nodes 22 and 51.
        let line = rendered
            .text
            .lines()
            .find(|line| line.contains("( O )"))
            .unwrap();
        assert!(line.contains("22"));
        assert!(line.contains("51"));
    }

    #[test]
    fn roads_paint_the_connecting_glyphs() {
        let mut store = store();
        store.toggle_edge(0, 1, Color::Red);
        let rendered = render_board(&store, None);
        assert!(rendered.text.contains('r'));
    }

    #[test]
    fn recommended_edge_is_traced_with_the_marker() {
        let mut store = store();
        let advice: Advice = serde_json::from_value(json!({
            "success": true,
            "action_type": "BUILD_ROAD",
            "action_value": [0, 1],
            "explanation": "Build a road at edge (0, 1)."
        }))
        .unwrap();
        store.set_advice(advice);
        let rendered = render_board(&store, None);
        assert!(rendered.text.contains(RECOMMENDED_EDGE_CHAR));
    }
}
