//! Places destinations on the schematic world map.
//!
//! Destinations with coordinates use an equirectangular projection onto the
//! 1200x600 canvas. The rest are spread on a small ring around their
//! continent's anchor so they do not overlap.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::types::listing::Destination;
use crate::types::map::{MapPoint, MAP_HEIGHT, MAP_WIDTH};

const FALLBACK_COLOR: &str = "#999";

struct Anchor {
    x: f64,
    y: f64,
    spread: f64,
}

const CANVAS_CENTRE: Anchor = Anchor {
    x: MAP_WIDTH / 2.0,
    y: MAP_HEIGHT / 2.0,
    spread: 50.0,
};

fn anchor(continent: &str) -> &'static Anchor {
    const EUROPE: Anchor = Anchor { x: 500.0, y: 200.0, spread: 60.0 };
    const ASIA: Anchor = Anchor { x: 800.0, y: 250.0, spread: 80.0 };
    const NORTH_AMERICA: Anchor = Anchor { x: 300.0, y: 220.0, spread: 70.0 };
    const SOUTH_AMERICA: Anchor = Anchor { x: 350.0, y: 400.0, spread: 60.0 };
    const AFRICA: Anchor = Anchor { x: 550.0, y: 300.0, spread: 70.0 };
    const OCEANIA: Anchor = Anchor { x: 950.0, y: 450.0, spread: 50.0 };

    match continent {
        "Europe" => &EUROPE,
        "Asie" => &ASIA,
        "Amérique du Nord" => &NORTH_AMERICA,
        "Amérique du Sud" => &SOUTH_AMERICA,
        "Afrique" => &AFRICA,
        "Océanie" => &OCEANIA,
        _ => &CANVAS_CENTRE,
    }
}

pub fn continent_color(continent: &str) -> &'static str {
    match continent {
        "Europe" => "#4CAF50",
        "Asie" => "#FF5722",
        "Amérique du Nord" => "#2196F3",
        "Amérique du Sud" => "#9C27B0",
        "Afrique" => "#FFC107",
        "Océanie" => "#009688",
        _ => FALLBACK_COLOR,
    }
}

/// Projects one destination. `slot` is the 1-based rank of this destination
/// among the coordinate-less ones of its continent; it is ignored when the
/// destination has usable coordinates.
pub fn project(destination: &Destination, slot: usize) -> MapPoint {
    let (x, y, projected) = match destination.coordinates {
        // A zero latitude or longitude is treated as missing.
        Some(c) if c.lat != 0.0 && c.lng != 0.0 => (
            (c.lng + 180.0) / 360.0 * MAP_WIDTH,
            (90.0 - c.lat) / 180.0 * MAP_HEIGHT,
            true,
        ),
        _ => {
            let base = anchor(&destination.continent);
            let angle = (slot as f64 * PI * 0.5) % (PI * 2.0);
            let radius = (20.0 + (slot % 5) as f64 * 10.0).min(base.spread);
            (
                base.x + angle.cos() * radius,
                base.y + angle.sin() * radius,
                false,
            )
        }
    };

    MapPoint {
        id: destination.id.clone(),
        label: if destination.country.is_empty() {
            destination.name.clone()
        } else {
            format!("{}, {}", destination.name, destination.country)
        },
        x,
        y,
        color: continent_color(&destination.continent).to_string(),
        projected,
    }
}

/// Projects a whole listing, numbering the coordinate-less destinations per
/// continent.
pub fn project_all(destinations: &[Destination]) -> Vec<MapPoint> {
    let mut counters: HashMap<&str, usize> = HashMap::new();
    destinations
        .iter()
        .map(|d| {
            let has_coordinates = matches!(d.coordinates, Some(c) if c.lat != 0.0 && c.lng != 0.0);
            let slot = if has_coordinates {
                0
            } else {
                let counter = counters.entry(d.continent.as_str()).or_insert(0);
                *counter += 1;
                *counter
            };
            project(d, slot)
        })
        .collect()
}
