//! The market table handed to the engine
//!
//! A `Dataset` is built once (from the built-in table or a JSON file) and is
//! read-only afterwards. Country identifiers are unique.

use crate::error::{AnalyticsError, Result};
use crate::record::{Field, Industry, MarketRecord};
use anyhow::Context;
use std::collections::HashSet;
use std::path::Path;

/// Immutable, country-unique table of market records
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<MarketRecord>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate countries
    pub fn new(records: Vec<MarketRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.country.as_str()) {
                return Err(AnalyticsError::DuplicateCountry {
                    country: record.country.clone(),
                });
            }
        }
        Ok(Dataset { records })
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let records: Vec<MarketRecord> =
            serde_json::from_str(json).context("failed to parse market records")?;
        Ok(Dataset::new(records)?)
    }

    /// Load a JSON array of records from disk
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset: {}", path.display()))?;
        let dataset = Dataset::from_json_str(&content)
            .with_context(|| format!("invalid dataset in: {}", path.display()))?;
        log::debug!(
            "loaded {} market records from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// The ten-country reference table
    pub fn builtin() -> Self {
        use Industry::{Agriculture, It, Manufacturing};

        let records = vec![
            row("USA", [2.5, 70000.0, 3.0, 90.0, 85.0, 60.0, 91.0, 46.0, 2500.0, 2.0], It, 85.0),
            row("Germany", [1.8, 50000.0, 2.0, 88.0, 80.0, 50.0, 67.0, 65.0, 1500.0, 1.5], Manufacturing, 78.0),
            row("China", [6.0, 12000.0, 2.5, 70.0, 60.0, 40.0, 20.0, 30.0, 3000.0, 3.5], It, 72.0),
            row("Brazil", [1.2, 9000.0, 8.0, 65.0, 55.0, 20.0, 38.0, 76.0, 300.0, 8.0], Agriculture, 65.0),
            row("India", [5.5, 2500.0, 4.5, 50.0, 45.0, 15.0, 48.0, 40.0, 600.0, 6.0], It, 60.0),
            row("Japan", [1.0, 40000.0, 0.5, 92.0, 78.0, 70.0, 46.0, 92.0, 800.0, 2.5], Manufacturing, 80.0),
            row("UK", [2.0, 45000.0, 2.8, 95.0, 82.0, 55.0, 89.0, 35.0, 700.0, 1.8], It, 82.0),
            row("France", [1.5, 42000.0, 2.2, 90.0, 79.0, 45.0, 71.0, 86.0, 600.0, 1.7], Manufacturing, 79.0),
            row("Canada", [2.8, 48000.0, 3.1, 93.0, 87.0, 60.0, 80.0, 48.0, 500.0, 2.2], It, 83.0),
            row("Australia", [2.3, 55000.0, 2.7, 89.0, 84.0, 65.0, 90.0, 51.0, 400.0, 1.9], Agriculture, 81.0),
        ];

        Dataset { records }
    }

    pub fn records(&self) -> &[MarketRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by country
    pub fn get(&self, country: &str) -> Option<&MarketRecord> {
        self.records.iter().find(|r| r.country == country)
    }

    /// Target scores in table order
    pub fn scores(&self) -> Vec<f64> {
        crate::record::column(&self.records, Field::AttractivenessScore)
    }

    /// Records for the given countries, in table order
    ///
    /// Unknown country names are ignored.
    pub fn subset<S: AsRef<str>>(&self, countries: &[S]) -> Vec<MarketRecord> {
        self.records
            .iter()
            .filter(|r| countries.iter().any(|c| c.as_ref() == r.country))
            .cloned()
            .collect()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Dataset::builtin()
    }
}

// Feature order matches `Field::FEATURES`.
fn row(country: &str, features: [f64; 10], industry: Industry, score: f64) -> MarketRecord {
    MarketRecord {
        country: country.to_string(),
        gdp_growth: features[0],
        per_capita_income: features[1],
        inflation_rate: features[2],
        internet_penetration: features[3],
        ecommerce_adoption: features[4],
        coverage_5g: features[5],
        individualism: features[6],
        uncertainty_avoidance: features[7],
        export_volume: features[8],
        tariff_rate: features[9],
        sme_industry: industry,
        market_attractiveness_score: score,
    }
}
