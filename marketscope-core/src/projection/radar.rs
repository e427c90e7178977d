//! Radar (spider) chart layout
//!
//! K metrics become K equidistant axes. Axis 0 points up and the rest follow
//! clockwise on screen. A country's value on an axis is scaled by the metric's
//! maximum and clamped to [0, 1] before being placed along the axis.

use super::Point;
use crate::error::{AnalyticsError, Result};
use crate::record::{Field, MarketRecord};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One radar axis: which field, its label, and the value that reaches the rim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarMetric {
    pub field: Field,
    pub label: String,
    pub max: f64,
}

impl RadarMetric {
    /// Metric labelled with the field's display name
    pub fn new(field: Field, max: f64) -> Self {
        RadarMetric {
            label: field.display_name(),
            field,
            max,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// The six metrics of the country comparison view
    pub fn defaults() -> Vec<RadarMetric> {
        vec![
            RadarMetric::new(Field::GdpGrowth, 10.0).with_label("GDP Growth"),
            RadarMetric::new(Field::PerCapitaIncome, 70000.0).with_label("Income"),
            RadarMetric::new(Field::InternetPenetration, 100.0).with_label("Internet"),
            RadarMetric::new(Field::EcommerceAdoption, 100.0).with_label("E-commerce"),
            RadarMetric::new(Field::Coverage5g, 100.0).with_label("5G"),
            RadarMetric::new(Field::ExportVolume, 3000.0).with_label("Exports"),
        ]
    }
}

/// Radar canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarStyle {
    pub center: Point,
    pub radius: f64,
    /// Distance past the rim where axis labels sit
    pub label_offset: f64,
}

impl Default for RadarStyle {
    fn default() -> Self {
        RadarStyle {
            center: Point::new(200.0, 200.0),
            radius: 150.0,
            label_offset: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarAxis {
    pub field: Field,
    pub label: String,
    /// Radians, screen convention
    pub angle: f64,
    pub end: Point,
    pub label_anchor: Point,
}

/// A country's closed polygon, one vertex per axis in axis order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPolygon {
    pub country: String,
    pub vertices: Vec<Point>,
}

impl RadarPolygon {
    /// Polygon edges including the wrap-around from the last vertex to the first
    pub fn edges(&self) -> Vec<(Point, Point)> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// SVG path data, `M x y L x y ... Z`
    pub fn svg_path(&self) -> String {
        let mut path = String::new();
        for (i, p) in self.vertices.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            path.push_str(&format!("{} {} {} ", command, p.x, p.y));
        }
        path.push('Z');
        path
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarLayout {
    pub axes: Vec<RadarAxis>,
    pub polygons: Vec<RadarPolygon>,
}

/// Angle of axis `index` out of `count`: start at -90 degrees, step clockwise
pub fn axis_angle(index: usize, count: usize) -> f64 {
    (index as f64 * 2.0 * PI) / count as f64 - PI / 2.0
}

/// Lay out radar axes and one polygon per record
pub fn project_radar(
    records: &[MarketRecord],
    metrics: &[RadarMetric],
    style: &RadarStyle,
) -> Result<RadarLayout> {
    if metrics.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            context: "radar chart with no metrics",
        });
    }
    for metric in metrics {
        if !(metric.max > 0.0 && metric.max.is_finite()) {
            return Err(AnalyticsError::InvalidRange {
                field: format!("{}.max", metric.field),
                value: metric.max,
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
            });
        }
    }

    let k = metrics.len();
    let axes = metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| {
            let angle = axis_angle(i, k);
            RadarAxis {
                field: metric.field,
                label: metric.label.clone(),
                angle,
                end: style.center.polar(angle, style.radius),
                label_anchor: style.center.polar(angle, style.radius + style.label_offset),
            }
        })
        .collect();

    let polygons = records
        .iter()
        .map(|record| RadarPolygon {
            country: record.country.clone(),
            vertices: metrics
                .iter()
                .enumerate()
                .map(|(i, metric)| {
                    let fraction = (record.value(metric.field) / metric.max).clamp(0.0, 1.0);
                    style.center.polar(axis_angle(i, k), fraction * style.radius)
                })
                .collect(),
        })
        .collect();

    Ok(RadarLayout { axes, polygons })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_first_axis_points_up() {
        let layout = project_radar(&[], &RadarMetric::defaults(), &RadarStyle::default()).unwrap();
        let first = &layout.axes[0];
        assert!(close(first.end.x, 200.0));
        assert!(close(first.end.y, 50.0));
        assert!(close(first.label_anchor.y, 20.0));
        assert_eq!(first.label, "GDP Growth");
    }

    #[test]
    fn test_default_axis_labels() {
        let layout = project_radar(&[], &RadarMetric::defaults(), &RadarStyle::default()).unwrap();
        let labels: Vec<&str> = layout.axes.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["GDP Growth", "Income", "Internet", "E-commerce", "5G", "Exports"]
        );

        let custom = vec![RadarMetric::new(Field::TariffRate, 15.0)];
        let layout = project_radar(&[], &custom, &RadarStyle::default()).unwrap();
        assert_eq!(layout.axes[0].label, "Tariff Rate");
    }

    #[test]
    fn test_axes_proceed_clockwise() {
        let metrics = vec![
            RadarMetric::new(Field::GdpGrowth, 10.0),
            RadarMetric::new(Field::InflationRate, 15.0),
            RadarMetric::new(Field::TariffRate, 15.0),
            RadarMetric::new(Field::Individualism, 100.0),
        ];
        let layout = project_radar(&[], &metrics, &RadarStyle::default()).unwrap();
        // up, right, down, left on screen
        assert!(close(layout.axes[1].end.x, 350.0) && close(layout.axes[1].end.y, 200.0));
        assert!(close(layout.axes[2].end.x, 200.0) && close(layout.axes[2].end.y, 350.0));
        assert!(close(layout.axes[3].end.x, 50.0) && close(layout.axes[3].end.y, 200.0));
    }

    #[test]
    fn test_values_are_clamped_to_rim() {
        let dataset = Dataset::builtin();
        let usa = dataset.get("USA").unwrap().clone();
        // 70000 income on a 10000 max would overshoot without clamping
        let metrics = vec![RadarMetric::new(Field::PerCapitaIncome, 10000.0)];
        let layout = project_radar(&[usa], &metrics, &RadarStyle::default()).unwrap();
        let v = layout.polygons[0].vertices[0];
        assert!(close(v.x, 200.0));
        assert!(close(v.y, 50.0));
    }

    #[test]
    fn test_negative_values_collapse_to_center() {
        let mut record = Dataset::builtin().records()[0].clone();
        record.gdp_growth = -3.0;
        let metrics = vec![RadarMetric::new(Field::GdpGrowth, 10.0)];
        let layout = project_radar(&[record], &metrics, &RadarStyle::default()).unwrap();
        assert_eq!(layout.polygons[0].vertices[0], Point::new(200.0, 200.0));
    }

    #[test]
    fn test_polygon_closes() {
        let dataset = Dataset::builtin();
        let layout = project_radar(
            &dataset.records()[..2],
            &RadarMetric::defaults(),
            &RadarStyle::default(),
        )
        .unwrap();
        let polygon = &layout.polygons[0];
        assert_eq!(polygon.vertices.len(), 6);
        let edges = polygon.edges();
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[5].0, polygon.vertices[5]);
        assert_eq!(edges[5].1, polygon.vertices[0]);
        assert!(polygon.svg_path().starts_with("M "));
        assert!(polygon.svg_path().ends_with('Z'));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let dataset = Dataset::builtin();
        let a = project_radar(dataset.records(), &RadarMetric::defaults(), &RadarStyle::default())
            .unwrap();
        let b = project_radar(dataset.records(), &RadarMetric::defaults(), &RadarStyle::default())
            .unwrap();
        for (pa, pb) in a.polygons.iter().zip(&b.polygons) {
            for (va, vb) in pa.vertices.iter().zip(&pb.vertices) {
                assert_eq!(va.x.to_bits(), vb.x.to_bits());
                assert_eq!(va.y.to_bits(), vb.y.to_bits());
            }
        }
    }

    #[test]
    fn test_rejects_bad_metrics() {
        assert!(project_radar(&[], &[], &RadarStyle::default()).is_err());
        let zero = vec![RadarMetric::new(Field::GdpGrowth, 0.0)];
        assert!(matches!(
            project_radar(&[], &zero, &RadarStyle::default()),
            Err(AnalyticsError::InvalidRange { .. })
        ));
    }
}
