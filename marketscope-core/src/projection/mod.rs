//! Chart geometry
//!
//! Pure projections from records to 2D coordinates. Screen coordinates: x grows
//! right, y grows down.
//!
//! Global invariants enforced:
//! - No shared state between calls
//! - Identical input yields bit-identical coordinates

pub mod grid;
pub mod radar;
pub mod scatter;

pub use grid::{project_correlation_grid, GridCell, GridLayout, GridStyle};
pub use radar::{project_radar, RadarAxis, RadarLayout, RadarMetric, RadarPolygon, RadarStyle};
pub use scatter::{project_scatter, ScatterPoint, ScatterStyle};

use serde::{Deserialize, Serialize};

/// A point in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Polar offset from `self`
    pub fn polar(&self, angle: f64, radius: f64) -> Point {
        Point {
            x: self.x + angle.cos() * radius,
            y: self.y + angle.sin() * radius,
        }
    }
}
