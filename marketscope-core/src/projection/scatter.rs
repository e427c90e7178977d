//! Score vs confidence scatter layout

use super::Point;
use crate::error::{AnalyticsError, Result};
use crate::ranking::RankingEntry;
use serde::{Deserialize, Serialize};

/// Plot frame of the scatter chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterStyle {
    /// Left edge of the plot area
    pub left: f64,
    pub width: f64,
    /// Bottom edge of the plot area (y grows down)
    pub bottom: f64,
    pub height: f64,
    pub min_radius: f64,
    /// Extra radius at the maximum score
    pub radius_span: f64,
}

impl Default for ScatterStyle {
    fn default() -> Self {
        ScatterStyle {
            left: 50.0,
            width: 300.0,
            bottom: 168.0,
            height: 128.0,
            min_radius: 4.0,
            radius_span: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub country: String,
    pub position: Point,
    pub radius: f64,
}

/// Place each ranked market by score (x) and confidence (y)
///
/// Both axes are normalized against the largest value present. A non-positive
/// maximum normalizes everything on that axis to 0.
pub fn project_scatter(rankings: &[RankingEntry], style: &ScatterStyle) -> Result<Vec<ScatterPoint>> {
    if rankings.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            context: "scatter chart with no rankings",
        });
    }

    let max_score = rankings
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);
    let max_confidence = rankings
        .iter()
        .map(|r| r.confidence)
        .fold(f64::NEG_INFINITY, f64::max);

    Ok(rankings
        .iter()
        .map(|entry| {
            let score_fraction = ratio(entry.score, max_score);
            let confidence_fraction = ratio(entry.confidence, max_confidence);
            ScatterPoint {
                country: entry.country.clone(),
                position: Point::new(
                    style.left + score_fraction * style.width,
                    style.bottom - confidence_fraction * style.height,
                ),
                radius: style.min_radius + score_fraction * style.radius_span,
            }
        })
        .collect())
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(country: &str, score: f64, confidence: f64) -> RankingEntry {
        RankingEntry {
            country: country.to_string(),
            score,
            confidence,
        }
    }

    #[test]
    fn test_maximum_lands_on_frame_corner() {
        let rankings = vec![entry("A", 80.0, 0.9), entry("B", 40.0, 0.45)];
        let points = project_scatter(&rankings, &ScatterStyle::default()).unwrap();

        assert_eq!(points[0].position, Point::new(350.0, 40.0));
        assert_eq!(points[0].radius, 12.0);
        assert_eq!(points[1].position, Point::new(200.0, 104.0));
        assert_eq!(points[1].radius, 8.0);
    }

    #[test]
    fn test_zero_maximum_does_not_divide() {
        let rankings = vec![entry("A", 0.0, 0.8)];
        let points = project_scatter(&rankings, &ScatterStyle::default()).unwrap();
        assert_eq!(points[0].position.x, 50.0);
        assert_eq!(points[0].radius, 4.0);
    }

    #[test]
    fn test_empty_is_error() {
        assert!(matches!(
            project_scatter(&[], &ScatterStyle::default()),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_scatter_is_idempotent() {
        let rankings = vec![entry("A", 85.0, 0.91), entry("B", 72.0, 0.77)];
        let a = project_scatter(&rankings, &ScatterStyle::default()).unwrap();
        let b = project_scatter(&rankings, &ScatterStyle::default()).unwrap();
        assert_eq!(a, b);
    }
}
