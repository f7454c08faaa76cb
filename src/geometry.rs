//! Pixel projection for pointy-top hexes. Pure functions shared by every
//! renderer that needs screen positions for tiles, nodes, and edges.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

use crate::coords::CubeCoord;
use crate::types::NodeRef;

pub type Point = (f64, f64);

/// Center of a tile in pixels, for a hex of the given size, offset from the
/// canvas origin.
pub fn tile_center(coord: CubeCoord, size: f64, origin: Point) -> Point {
    let sqrt3 = 3.0_f64.sqrt();
    let x = size * (sqrt3 * coord.x as f64 + sqrt3 / 2.0 * coord.z as f64);
    let y = size * (1.5 * coord.z as f64);
    (origin.0 + x, origin.1 + y)
}

/// Offset from a tile center to one of its six corners.
pub fn corner_offset(size: f64, corner: NodeRef) -> Point {
    let angle = corner_angle(corner);
    (size * angle.cos(), size * angle.sin())
}

/// Absolute position of a tile corner.
pub fn node_position(center: Point, size: f64, corner: NodeRef) -> Point {
    let (dx, dy) = corner_offset(size, corner);
    (center.0 + dx, center.1 + dy)
}

/// The six corners of a hex, clockwise from North.
pub fn hexagon_corners(center: Point, size: f64) -> [Point; 6] {
    const ORDER: [NodeRef; 6] = [
        NodeRef::North,
        NodeRef::Northeast,
        NodeRef::Southeast,
        NodeRef::South,
        NodeRef::Southwest,
        NodeRef::Northwest,
    ];
    ORDER.map(|corner| node_position(center, size, corner))
}

/// Midpoint of a segment, used to place road markers on edges.
pub fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

fn corner_angle(corner: NodeRef) -> f64 {
    match corner {
        NodeRef::North => -FRAC_PI_2,
        NodeRef::Northeast => -FRAC_PI_6,
        NodeRef::Southeast => FRAC_PI_6,
        NodeRef::South => FRAC_PI_2,
        NodeRef::Southwest => 5.0 * FRAC_PI_6,
        NodeRef::Northwest => -5.0 * FRAC_PI_6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const EPS: f64 = 1e-9;

    #[test]
    fn origin_tile_sits_at_the_canvas_origin() {
        let center = tile_center(CubeCoord::default(), 48.0, (300.0, 200.0));
        assert!((center.0 - 300.0).abs() < EPS);
        assert!((center.1 - 200.0).abs() < EPS);
    }

    #[test]
    fn east_neighbor_is_one_hex_width_away() {
        let size = 10.0;
        let a = tile_center(CubeCoord::new(0, 0, 0), size, (0.0, 0.0));
        let b = tile_center(CubeCoord::new(1, -1, 0), size, (0.0, 0.0));
        assert!((b.0 - a.0 - size * 3.0_f64.sqrt()).abs() < EPS);
        assert!((b.1 - a.1).abs() < EPS);
    }

    #[test]
    fn corners_lie_on_the_size_circle() {
        for corner in NodeRef::iter() {
            let (dx, dy) = corner_offset(7.0, corner);
            assert!(((dx * dx + dy * dy).sqrt() - 7.0).abs() < EPS);
        }
    }

    #[test]
    fn north_corner_points_straight_up() {
        let (dx, dy) = corner_offset(2.0, NodeRef::North);
        assert!(dx.abs() < EPS);
        assert!((dy + 2.0).abs() < EPS);
    }

    #[test]
    fn midpoint_is_halfway() {
        assert_eq!(midpoint((0.0, 0.0), (4.0, -2.0)), (2.0, -1.0));
    }
}
