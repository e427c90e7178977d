//! Market rankings with simulated confidence
//!
//! Confidence is decorative: a uniform draw from a configured range, not a
//! statistical estimate. The random source is injected so callers choose
//! between live re-randomization and a seeded, reproducible sequence.

use crate::error::{AnalyticsError, Result};
use crate::record::MarketRecord;
use crate::stats::mean;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One ranked market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub country: String,
    pub score: f64,
    pub confidence: f64,
}

/// Half-open interval `[min, max)` that confidence values are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceRange {
    min: f64,
    max: f64,
}

impl ConfidenceRange {
    /// Requires `0 <= min < max <= 1`
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&min) {
            return Err(AnalyticsError::InvalidRange {
                field: "confidence.min".to_string(),
                value: min,
                min: 0.0,
                max: 1.0,
            });
        }
        if max.is_nan() || max <= min || max > 1.0 {
            return Err(AnalyticsError::InvalidRange {
                field: "confidence.max".to_string(),
                value: max,
                min,
                max: 1.0,
            });
        }
        Ok(ConfidenceRange { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

impl Default for ConfidenceRange {
    fn default() -> Self {
        ConfidenceRange { min: 0.7, max: 1.0 }
    }
}

/// Rank records by target score, descending
///
/// Each entry gets an independent confidence draw. Ties keep input order.
pub fn generate_rankings<R: Rng + ?Sized>(
    records: &[MarketRecord],
    confidence: ConfidenceRange,
    rng: &mut R,
) -> Vec<RankingEntry> {
    let mut rankings: Vec<RankingEntry> = records
        .iter()
        .map(|record| RankingEntry {
            country: record.country.clone(),
            score: record.market_attractiveness_score,
            confidence: rng.gen_range(confidence.min..confidence.max),
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rankings
}

/// Thresholds for the ranking summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryThresholds {
    /// Confidence strictly above this counts as high confidence
    pub high_confidence: f64,
    /// Scores strictly below this count as emerging markets
    pub emerging_below: f64,
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        SummaryThresholds {
            high_confidence: 0.8,
            emerging_below: 70.0,
        }
    }
}

/// Headline numbers for the rankings view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RankingSummary {
    pub top_market: Option<RankingEntry>,
    pub average_score: Option<f64>,
    pub high_confidence_count: usize,
    pub emerging_count: usize,
    pub total: usize,
}

/// Summarize sorted rankings
pub fn summarize_rankings(rankings: &[RankingEntry], thresholds: &SummaryThresholds) -> RankingSummary {
    let scores: Vec<f64> = rankings.iter().map(|r| r.score).collect();

    RankingSummary {
        top_market: rankings.first().cloned(),
        average_score: mean(&scores).ok(),
        high_confidence_count: rankings
            .iter()
            .filter(|r| r.confidence > thresholds.high_confidence)
            .count(),
        emerging_count: rankings
            .iter()
            .filter(|r| r.score < thresholds.emerging_below)
            .count(),
        total: rankings.len(),
    }
}
