//! Correlation heatmap layout
//!
//! Cell (row i, col j) of the matrix becomes a square at column j, row i.
//! Intensity is |r|; hue encodes the sign (green for positive, red otherwise).

use super::Point;
use crate::error::Result;
use crate::record::{Field, MarketRecord};
use crate::stats::{correlation_matrix, CorrelationMatrix};
use serde::{Deserialize, Serialize};

/// Hue for positive correlations (green)
pub const POSITIVE_HUE: f64 = 120.0;
/// Hue for zero or negative correlations (red)
pub const NEGATIVE_HUE: f64 = 0.0;

/// Grid canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    /// Top-left corner of cell (0, 0); leaves room for row and column labels
    pub origin: Point,
    pub cell_size: f64,
    /// Fill opacity at |r| = 1
    pub max_opacity: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        GridStyle {
            origin: Point::new(100.0, 50.0),
            cell_size: 40.0,
            max_opacity: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    /// Top-left corner
    pub position: Point,
    pub size: f64,
    pub intensity: f64,
    pub hue: f64,
    pub opacity: f64,
}

impl GridCell {
    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size / 2.0,
            self.position.y + self.size / 2.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub fields: Vec<Field>,
    pub labels: Vec<String>,
    /// Row-major
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        let n = self.fields.len();
        if row >= n || col >= n {
            return None;
        }
        self.cells.get(row * n + col)
    }
}

/// Fields shown in the default heatmap
pub const DEFAULT_GRID_FIELDS: [Field; 6] = [
    Field::GdpGrowth,
    Field::PerCapitaIncome,
    Field::InflationRate,
    Field::InternetPenetration,
    Field::EcommerceAdoption,
    Field::Coverage5g,
];

/// Lay out an already computed matrix
pub fn layout_matrix(matrix: &CorrelationMatrix, style: &GridStyle) -> GridLayout {
    let mut cells = Vec::with_capacity(matrix.size() * matrix.size());
    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let intensity = value.abs();
            cells.push(GridCell {
                row: i,
                col: j,
                value: *value,
                position: Point::new(
                    style.origin.x + j as f64 * style.cell_size,
                    style.origin.y + i as f64 * style.cell_size,
                ),
                size: style.cell_size,
                intensity,
                hue: if *value > 0.0 {
                    POSITIVE_HUE
                } else {
                    NEGATIVE_HUE
                },
                opacity: intensity * style.max_opacity,
            });
        }
    }

    GridLayout {
        fields: matrix.fields.clone(),
        labels: matrix.fields.iter().map(|f| f.display_name()).collect(),
        cells,
    }
}

/// Correlate `fields` over `records` and lay the matrix out as a grid
pub fn project_correlation_grid(
    records: &[MarketRecord],
    fields: &[Field],
    style: &GridStyle,
) -> Result<GridLayout> {
    let matrix = correlation_matrix(records, fields)?;
    Ok(layout_matrix(&matrix, style))
}
