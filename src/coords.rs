use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Direction from one tile to an adjacent tile. Wire names follow the
/// advisory service ("NORTHEAST", not "NORTH_EAST").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    East,
    Southeast,
    Southwest,
    West,
    Northwest,
    Northeast,
}

/// Cube coordinate of a hex tile. Structural equality makes it usable as a
/// map key directly; the wire form is a 3-element array `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32, i32)", into = "(i32, i32, i32)")]
pub struct CubeCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        debug_assert!(x + y + z == 0, "cube coordinates must sum to zero");
        Self { x, y, z }
    }

    pub fn add(self, other: CubeCoord) -> Self {
        CubeCoord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn neighbor(self, direction: Direction) -> Self {
        self.add(UNIT_VECTORS[&direction])
    }

    pub fn neighbors(self) -> impl Iterator<Item = CubeCoord> {
        UNIT_VECTORS.values().map(move |vec| self.add(*vec))
    }
}

impl Default for CubeCoord {
    fn default() -> Self {
        CubeCoord::new(0, 0, 0)
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for CubeCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        CubeCoord::new(x, y, z)
    }
}

impl From<CubeCoord> for (i32, i32, i32) {
    fn from(coord: CubeCoord) -> Self {
        (coord.x, coord.y, coord.z)
    }
}

pub static UNIT_VECTORS: Lazy<HashMap<Direction, CubeCoord>> = Lazy::new(|| {
    use Direction::*;
    HashMap::from([
        (Northeast, CubeCoord::new(1, 0, -1)),
        (Southwest, CubeCoord::new(-1, 0, 1)),
        (Northwest, CubeCoord::new(0, 1, -1)),
        (Southeast, CubeCoord::new(0, -1, 1)),
        (East, CubeCoord::new(1, -1, 0)),
        (West, CubeCoord::new(-1, 1, 0)),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_form_is_an_array() {
        let coord = CubeCoord::new(2, -3, 1);
        let json = serde_json::to_string(&coord).unwrap();
        assert_eq!(json, "[2,-3,1]");
        let back: CubeCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coord);
    }

    #[test]
    fn neighbors_stay_on_the_zero_plane() {
        let origin = CubeCoord::default();
        for neighbor in origin.neighbors() {
            assert_eq!(neighbor.x + neighbor.y + neighbor.z, 0);
        }
        assert_eq!(origin.neighbors().count(), 6);
    }

    #[test]
    fn neighbor_follows_the_unit_vector() {
        let coord = CubeCoord::new(1, -1, 0);
        assert_eq!(coord.neighbor(Direction::East), CubeCoord::new(2, -2, 0));
        assert_eq!(coord.neighbor(Direction::West), CubeCoord::new(0, 0, 0));
    }
}
