//! Market record model
//!
//! One `MarketRecord` per country. Records are immutable input: no component
//! in this crate ever mutates a record it is handed.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SME industry label (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    #[serde(rename = "IT")]
    It,
    Manufacturing,
    Agriculture,
    #[serde(rename = "other")]
    Other,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::It => "IT",
            Industry::Manufacturing => "Manufacturing",
            Industry::Agriculture => "Agriculture",
            Industry::Other => "other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IT" | "it" => Ok(Industry::It),
            "Manufacturing" | "manufacturing" => Ok(Industry::Manufacturing),
            "Agriculture" | "agriculture" => Ok(Industry::Agriculture),
            "other" | "Other" => Ok(Industry::Other),
            _ => Err(AnalyticsError::UnknownFeature {
                name: format!("sme_industry={}", s),
            }),
        }
    }
}

/// Factor family a feature belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Economic,
    Technology,
    Cultural,
    Trade,
}

impl FactorCategory {
    pub const ALL: [FactorCategory; 4] = [
        FactorCategory::Economic,
        FactorCategory::Technology,
        FactorCategory::Cultural,
        FactorCategory::Trade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorCategory::Economic => "economic",
            FactorCategory::Technology => "technology",
            FactorCategory::Cultural => "cultural",
            FactorCategory::Trade => "trade",
        }
    }
}

/// Numeric field of a market record
///
/// The ten input features plus the target score. `country` and
/// `sme_industry` are not numeric and have no `Field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    GdpGrowth,
    PerCapitaIncome,
    InflationRate,
    InternetPenetration,
    EcommerceAdoption,
    #[serde(rename = "5g_coverage", alias = "coverage_5g")]
    Coverage5g,
    Individualism,
    UncertaintyAvoidance,
    ExportVolume,
    TariffRate,
    #[serde(rename = "market_attractiveness_score")]
    AttractivenessScore,
}

impl Field {
    /// Candidate features for importance analysis, in canonical order
    pub const FEATURES: [Field; 10] = [
        Field::GdpGrowth,
        Field::PerCapitaIncome,
        Field::InflationRate,
        Field::InternetPenetration,
        Field::EcommerceAdoption,
        Field::Coverage5g,
        Field::Individualism,
        Field::UncertaintyAvoidance,
        Field::ExportVolume,
        Field::TariffRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::GdpGrowth => "gdp_growth",
            Field::PerCapitaIncome => "per_capita_income",
            Field::InflationRate => "inflation_rate",
            Field::InternetPenetration => "internet_penetration",
            Field::EcommerceAdoption => "ecommerce_adoption",
            Field::Coverage5g => "5g_coverage",
            Field::Individualism => "individualism",
            Field::UncertaintyAvoidance => "uncertainty_avoidance",
            Field::ExportVolume => "export_volume",
            Field::TariffRate => "tariff_rate",
            Field::AttractivenessScore => "market_attractiveness_score",
        }
    }

    /// Title-cased label, e.g. `gdp_growth` -> `Gdp Growth`
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Factor family, or `None` for the target score
    pub fn category(&self) -> Option<FactorCategory> {
        match self {
            Field::GdpGrowth | Field::PerCapitaIncome | Field::InflationRate => {
                Some(FactorCategory::Economic)
            }
            Field::InternetPenetration | Field::EcommerceAdoption | Field::Coverage5g => {
                Some(FactorCategory::Technology)
            }
            Field::Individualism | Field::UncertaintyAvoidance => Some(FactorCategory::Cultural),
            Field::ExportVolume | Field::TariffRate => Some(FactorCategory::Trade),
            Field::AttractivenessScore => None,
        }
    }

    /// Parse a list of field names, failing on the first unknown one
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Field>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gdp_growth" => Ok(Field::GdpGrowth),
            "per_capita_income" => Ok(Field::PerCapitaIncome),
            "inflation_rate" => Ok(Field::InflationRate),
            "internet_penetration" => Ok(Field::InternetPenetration),
            "ecommerce_adoption" => Ok(Field::EcommerceAdoption),
            "5g_coverage" | "coverage_5g" => Ok(Field::Coverage5g),
            "individualism" => Ok(Field::Individualism),
            "uncertainty_avoidance" => Ok(Field::UncertaintyAvoidance),
            "export_volume" => Ok(Field::ExportVolume),
            "tariff_rate" => Ok(Field::TariffRate),
            "market_attractiveness_score" => Ok(Field::AttractivenessScore),
            _ => Err(AnalyticsError::UnknownFeature {
                name: s.to_string(),
            }),
        }
    }
}

/// One row of the market table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketRecord {
    pub country: String,
    /// Annual GDP growth, percent
    pub gdp_growth: f64,
    /// USD
    pub per_capita_income: f64,
    /// Percent
    pub inflation_rate: f64,
    /// Percent of population
    pub internet_penetration: f64,
    /// Percent of sales online
    pub ecommerce_adoption: f64,
    /// Percent of population
    #[serde(rename = "5g_coverage", alias = "coverage_5g")]
    pub coverage_5g: f64,
    /// Hofstede individualism score
    pub individualism: f64,
    /// Hofstede uncertainty avoidance score
    pub uncertainty_avoidance: f64,
    /// Billion USD
    pub export_volume: f64,
    /// Average tariff, percent
    pub tariff_rate: f64,
    pub sme_industry: Industry,
    /// Ground-truth target, 0-100
    pub market_attractiveness_score: f64,
}

impl MarketRecord {
    /// Read a numeric field
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::GdpGrowth => self.gdp_growth,
            Field::PerCapitaIncome => self.per_capita_income,
            Field::InflationRate => self.inflation_rate,
            Field::InternetPenetration => self.internet_penetration,
            Field::EcommerceAdoption => self.ecommerce_adoption,
            Field::Coverage5g => self.coverage_5g,
            Field::Individualism => self.individualism,
            Field::UncertaintyAvoidance => self.uncertainty_avoidance,
            Field::ExportVolume => self.export_volume,
            Field::TariffRate => self.tariff_rate,
            Field::AttractivenessScore => self.market_attractiveness_score,
        }
    }

    /// Read a numeric field by name
    pub fn value_of(&self, name: &str) -> Result<f64> {
        Ok(self.value(name.parse()?))
    }
}

/// Extract one column from a table
pub fn column(records: &[MarketRecord], field: Field) -> Vec<f64> {
    records.iter().map(|r| r.value(field)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trips_through_name() {
        for field in Field::FEATURES {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert_eq!(
            "coverage_5g".parse::<Field>().unwrap(),
            Field::Coverage5g
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = "sme_industry".parse::<Field>().unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::UnknownFeature {
                name: "sme_industry".to_string()
            }
        );
        assert!("country".parse::<Field>().is_err());
    }

    #[test]
    fn test_display_name_title_cases() {
        assert_eq!(Field::GdpGrowth.display_name(), "Gdp Growth");
        assert_eq!(Field::Coverage5g.display_name(), "5g Coverage");
        assert_eq!(
            Field::AttractivenessScore.display_name(),
            "Market Attractiveness Score"
        );
    }

    #[test]
    fn test_categories_cover_every_feature() {
        for field in Field::FEATURES {
            assert!(field.category().is_some(), "{} has no category", field);
        }
        assert_eq!(Field::AttractivenessScore.category(), None);
    }

    #[test]
    fn test_record_deserializes_5g_key() {
        let json = r#"{
            "country": "Testland",
            "gdp_growth": 1.0,
            "per_capita_income": 1000,
            "inflation_rate": 2.0,
            "internet_penetration": 50,
            "ecommerce_adoption": 40,
            "5g_coverage": 30,
            "individualism": 20,
            "uncertainty_avoidance": 10,
            "export_volume": 100,
            "tariff_rate": 4.0,
            "sme_industry": "Agriculture",
            "market_attractiveness_score": 55
        }"#;
        let record: MarketRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.coverage_5g, 30.0);
        assert_eq!(record.sme_industry, Industry::Agriculture);
        assert_eq!(record.value_of("5g_coverage").unwrap(), 30.0);
        assert!(record.value_of("population").is_err());
    }

    #[test]
    fn test_industry_parse() {
        assert_eq!("IT".parse::<Industry>().unwrap(), Industry::It);
        assert_eq!("other".parse::<Industry>().unwrap(), Industry::Other);
        assert!("Mining".parse::<Industry>().is_err());
    }
}
