//! Correlation-based feature importance
//!
//! Importance of a feature is |pearson(feature, target)|. The sign is
//! discarded so strong negative drivers (inflation, tariffs) rank by
//! magnitude alongside positive ones.

use crate::error::Result;
use crate::record::{column, FactorCategory, Field, MarketRecord};
use crate::stats::pearson_correlation;
use serde::{Deserialize, Serialize};

/// Importance of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: Field,
    /// |correlation| with the target, in [0, 1]
    pub importance: f64,
}

/// Rank candidate features by absolute correlation with the target score
///
/// Output is sorted descending by importance; ties keep candidate order.
/// With fewer than two records every importance is 0.
pub fn calculate_feature_importance(
    records: &[MarketRecord],
    candidates: &[Field],
) -> Result<Vec<FeatureImportance>> {
    if records.len() < 2 {
        log::warn!(
            "feature importance over {} record(s); all importances are 0",
            records.len()
        );
        return Ok(candidates
            .iter()
            .map(|feature| FeatureImportance {
                feature: *feature,
                importance: 0.0,
            })
            .collect());
    }

    let scores = column(records, Field::AttractivenessScore);
    let mut importance = candidates
        .iter()
        .map(|feature| {
            let values = column(records, *feature);
            let r = pearson_correlation(&values, &scores)?;
            Ok(FeatureImportance {
                feature: *feature,
                importance: r.abs(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Stable sort: equal importances keep candidate order
    importance.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    log::debug!(
        "feature importance computed for {} features over {} records",
        importance.len(),
        records.len()
    );
    Ok(importance)
}

/// Feature importance over the canonical ten features
pub fn default_feature_importance(records: &[MarketRecord]) -> Result<Vec<FeatureImportance>> {
    calculate_feature_importance(records, &Field::FEATURES)
}

/// Rollup of importance per factor family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryImportance {
    pub category: FactorCategory,
    pub feature_count: usize,
    pub total_importance: f64,
}

/// Headline numbers for the feature-analysis view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportanceSummary {
    pub top_feature: Option<FeatureImportance>,
    pub categories: Vec<CategoryImportance>,
}

/// Summarize an importance list by factor family
pub fn summarize_importance(importance: &[FeatureImportance]) -> ImportanceSummary {
    let categories = FactorCategory::ALL
        .iter()
        .map(|category| {
            let members: Vec<&FeatureImportance> = importance
                .iter()
                .filter(|fi| fi.feature.category() == Some(*category))
                .collect();
            CategoryImportance {
                category: *category,
                feature_count: members.len(),
                total_importance: members.iter().map(|fi| fi.importance).sum(),
            }
        })
        .collect();

    ImportanceSummary {
        top_feature: importance.first().cloned(),
        categories,
    }
}
