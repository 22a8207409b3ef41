use serde::{Deserialize, Serialize};

use super::listing::ItemId;

/// Width of the schematic world map canvas.
pub const MAP_WIDTH: f64 = 1200.0;
/// Height of the schematic world map canvas.
pub const MAP_HEIGHT: f64 = 600.0;

/// A destination placed on the schematic map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapPoint {
    pub id: ItemId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    /// False when the point was spread around a continent anchor because the
    /// destination carried no coordinates.
    pub projected: bool,
}
