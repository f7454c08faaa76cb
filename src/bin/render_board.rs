use std::collections::HashMap;
use std::io;

use clap::Parser;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use catan_advisor::coords::CubeCoord;
use catan_advisor::geometry::{hexagon_corners, midpoint, node_position, tile_center, Point};
use catan_advisor::scenario;
use catan_advisor::store::{BoardStore, TileKind};
use catan_advisor::template::{BoardTemplate, NodeId};
use catan_advisor::types::{BuildingKind, Color, Resource};

#[derive(Debug, Parser)]
#[command(name = "render-board")]
#[command(about = "Generate a random scenario offline and render it to a PNG")]
struct Args {
    /// Random seed for the scenario
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of seated players (2-4)
    #[arg(long, default_value_t = 2)]
    players: u8,

    /// Output file
    #[arg(long, default_value = "scenario.png")]
    out: String,

    /// Hex size in pixels
    #[arg(long, default_value_t = 48.0)]
    hex_size: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut store = BoardStore::new(BoardTemplate::standard(), args.players, Color::Red);
    let mut rng = StdRng::seed_from_u64(args.seed);
    scenario::generate(&mut store, &mut rng);

    render(&store, &args.out, args.hex_size)?;
    println!("Rendered scenario (seed {}) to {}", args.seed, args.out);
    Ok(())
}

fn render(store: &BoardStore, filename: &str, hex_size: f64) -> Result<(), Box<dyn std::error::Error>> {
    let template = store.template();

    // Gather geometry: tile centers and node positions in abstract pixels.
    let mut all_points: Vec<Point> = Vec::new();
    let mut land_centers: Vec<(CubeCoord, Point)> = Vec::new();
    let mut port_centers: Vec<(CubeCoord, Point)> = Vec::new();

    for coord in template.land_coords() {
        let center = tile_center(*coord, hex_size, (0.0, 0.0));
        all_points.extend(hexagon_corners(center, hex_size));
        land_centers.push((*coord, center));
    }
    for port in template.port_tiles() {
        let center = tile_center(port.coordinate, hex_size, (0.0, 0.0));
        all_points.extend(hexagon_corners(center, hex_size));
        port_centers.push((port.coordinate, center));
    }

    let mut node_points: HashMap<NodeId, Point> = HashMap::new();
    for node in &template.nodes {
        let anchor = tile_center(node.tile_coordinates[0], hex_size, (0.0, 0.0));
        node_points.insert(node.id, node_position(anchor, hex_size, node.direction));
    }

    let (min_x, max_x, min_y, max_y) = bounds(&all_points)?;
    let padding = hex_size * 1.5;
    let width = ((max_x - min_x) + 2.0 * padding).ceil() as u32;
    let height = ((max_y - min_y) + 2.0 * padding).ceil() as u32;

    let root = BitMapBackend::new(filename, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let to_canvas = |(x, y): Point| -> (i32, i32) {
        ((x - min_x + padding).round() as i32, (y - min_y + padding).round() as i32)
    };

    // Land tiles, then ports underneath their labels.
    for (coord, center) in &land_centers {
        let config = store.tile(*coord);
        let fill = match config.kind {
            Some(TileKind::Resource(resource)) => resource_color(resource),
            Some(TileKind::Desert) => RGBColor(0xD2, 0xB4, 0x8C),
            None => RGBColor(0xC8, 0xC8, 0xC8),
        };
        let corners: Vec<(i32, i32)> = hexagon_corners(*center, hex_size)
            .into_iter()
            .map(to_canvas)
            .collect();
        root.draw(&Polygon::new(corners, ShapeStyle::from(&fill).filled()))?;

        let (cx, cy) = to_canvas(*center);
        if let Some(number) = config.number {
            root.draw(&Circle::new(
                (cx, cy),
                (hex_size * 0.28) as i32,
                ShapeStyle::from(&WHITE).filled(),
            ))?;
            root.draw(&Text::new(
                number.to_string(),
                (cx - 5, cy - 7),
                ("sans-serif", 16).into_font().color(&BLACK),
            ))?;
        }
        if store.robber() == Some(*coord) {
            root.draw(&Circle::new(
                (cx, cy + (hex_size * 0.45) as i32),
                (hex_size * 0.15) as i32,
                ShapeStyle::from(&BLACK).filled(),
            ))?;
        }
    }

    for (coord, center) in &port_centers {
        let corners: Vec<(i32, i32)> = hexagon_corners(*center, hex_size)
            .into_iter()
            .map(to_canvas)
            .collect();
        root.draw(&Polygon::new(
            corners,
            ShapeStyle::from(&RGBColor(0xFF, 0xD7, 0x00)).filled(),
        ))?;
        let label = match store.port(*coord) {
            Some(resource) => format!("{resource:?} 2:1"),
            None => "Any 3:1".to_string(),
        };
        let (cx, cy) = to_canvas(*center);
        root.draw(&Text::new(
            label,
            (cx - (hex_size * 0.5) as i32, cy - 7),
            ("sans-serif", 12).into_font().color(&BLACK),
        ))?;
    }

    // Roads before buildings so settlements sit on top of their road ends.
    // Each road is drawn as a segment centered on the edge midpoint, leaving
    // the corners free for building markers.
    for ((a, b), color) in store.roads() {
        if let (Some(pa), Some(pb)) = (node_points.get(&a), node_points.get(&b)) {
            let mid = midpoint(*pa, *pb);
            let shrink = |p: Point| -> Point {
                (mid.0 + (p.0 - mid.0) * 0.7, mid.1 + (p.1 - mid.1) * 0.7)
            };
            root.draw(&PathElement::new(
                vec![to_canvas(shrink(*pa)), to_canvas(shrink(*pb))],
                ShapeStyle::from(&player_color(color)).stroke_width(5),
            ))?;
        }
    }

    for (node_id, building) in store.buildings() {
        if let Some(point) = node_points.get(&node_id) {
            let radius = match building.kind {
                BuildingKind::Settlement => (hex_size * 0.18).max(5.0) as i32,
                BuildingKind::City => (hex_size * 0.26).max(7.0) as i32,
            };
            root.draw(&Circle::new(
                to_canvas(*point),
                radius,
                ShapeStyle::from(&player_color(building.color)).filled().stroke_width(1),
            ))?;
        }
    }

    root.present()?;
    Ok(())
}

fn resource_color(resource: Resource) -> RGBColor {
    match resource {
        Resource::Wood => RGBColor(0x22, 0x8B, 0x22),
        Resource::Brick => RGBColor(0xB2, 0x22, 0x22),
        Resource::Sheep => RGBColor(0x90, 0xEE, 0x90),
        Resource::Wheat => RGBColor(0xDA, 0xA5, 0x20),
        Resource::Ore => RGBColor(0x70, 0x80, 0x90),
    }
}

fn player_color(color: Color) -> RGBColor {
    match color {
        Color::Red => RGBColor(0xDC, 0x14, 0x3C),
        Color::Blue => RGBColor(0x41, 0x69, 0xE1),
        Color::Orange => RGBColor(0xFF, 0x8C, 0x00),
        Color::White => RGBColor(0xF5, 0xF5, 0xF5),
    }
}

fn bounds(points: &[Point]) -> Result<(f64, f64, f64, f64), &'static str> {
    if points.is_empty() {
        return Err("no points");
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in points {
        min_x = min_x.min(*x);
        max_x = max_x.max(*x);
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }
    Ok((min_x, max_x, min_y, max_y))
}
