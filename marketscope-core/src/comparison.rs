//! Side-by-side country comparison
//!
//! The selection itself belongs to the caller; this module only bounds it and
//! summarizes whatever subset it is handed.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::ranking::RankingEntry;
use crate::record::{column, Field, MarketRecord};
use crate::stats::mean;
use serde::{Deserialize, Serialize};

/// Most countries that can be compared at once
pub const MAX_SELECTED: usize = 5;

/// Bounded, ordered set of selected countries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    countries: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// The top `n` ranked markets, capped at `MAX_SELECTED`
    pub fn top_ranked(rankings: &[RankingEntry], n: usize) -> Self {
        Selection {
            countries: rankings
                .iter()
                .take(n.min(MAX_SELECTED))
                .map(|r| r.country.clone())
                .collect(),
        }
    }

    /// Remove `country` if selected, otherwise add it when there is room
    ///
    /// Returns whether `country` is selected afterwards.
    pub fn toggle(&mut self, country: &str) -> bool {
        if let Some(pos) = self.countries.iter().position(|c| c == country) {
            self.countries.remove(pos);
            return false;
        }
        if self.is_full() {
            log::debug!("selection full, ignoring {}", country);
            return false;
        }
        self.countries.push(country.to_string());
        true
    }

    pub fn contains(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }

    pub fn is_full(&self) -> bool {
        self.countries.len() >= MAX_SELECTED
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Selected records, in table order
    pub fn records(&self, dataset: &Dataset) -> Vec<MarketRecord> {
        dataset.subset(&self.countries)
    }
}

/// Averages across the compared countries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComparisonSummary {
    pub countries: Vec<String>,
    pub avg_gdp_growth: f64,
    pub avg_per_capita_income: f64,
    pub avg_internet_penetration: f64,
    pub avg_ecommerce_adoption: f64,
}

/// Average the headline metrics over `records`
///
/// Fails with `EmptyInput` when nothing is selected.
pub fn compare(records: &[MarketRecord]) -> Result<ComparisonSummary> {
    Ok(ComparisonSummary {
        countries: records.iter().map(|r| r.country.clone()).collect(),
        avg_gdp_growth: mean(&column(records, Field::GdpGrowth))?,
        avg_per_capita_income: mean(&column(records, Field::PerCapitaIncome))?,
        avg_internet_penetration: mean(&column(records, Field::InternetPenetration))?,
        avg_ecommerce_adoption: mean(&column(records, Field::EcommerceAdoption))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;

    #[test]
    fn test_toggle_caps_at_five() {
        let mut selection = Selection::new();
        for country in ["USA", "Germany", "China", "Brazil", "India"] {
            assert!(selection.toggle(country));
        }
        assert!(selection.is_full());
        assert!(!selection.toggle("Japan"));
        assert!(!selection.contains("Japan"));

        assert!(!selection.toggle("China"));
        assert_eq!(selection.len(), 4);
        assert!(selection.toggle("Japan"));
    }

    #[test]
    fn test_top_ranked_selection() {
        let rankings: Vec<RankingEntry> = ["USA", "Canada", "UK", "Australia"]
            .iter()
            .map(|c| RankingEntry {
                country: c.to_string(),
                score: 80.0,
                confidence: 0.8,
            })
            .collect();
        let selection = Selection::top_ranked(&rankings, 3);
        assert_eq!(selection.countries(), &["USA", "Canada", "UK"]);
        assert_eq!(Selection::top_ranked(&rankings, 99).len(), 4);
    }

    #[test]
    fn test_compare_averages() {
        let dataset = Dataset::builtin();
        let mut selection = Selection::new();
        selection.toggle("USA");
        selection.toggle("Germany");
        let summary = compare(&selection.records(&dataset)).unwrap();

        assert_eq!(summary.countries, vec!["USA", "Germany"]);
        assert!((summary.avg_gdp_growth - 2.15).abs() < 1e-9);
        assert_eq!(summary.avg_per_capita_income, 60000.0);
        assert_eq!(summary.avg_internet_penetration, 89.0);
        assert_eq!(summary.avg_ecommerce_adoption, 82.5);
    }

    #[test]
    fn test_compare_nothing_selected() {
        assert!(matches!(
            compare(&[]),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }
}
