//! Scenario prediction
//!
//! A fixed weighted-linear model over hypothetical market conditions.
//!
//! Global invariants enforced:
//! - Predicted score always lies in [0, 100]
//! - Identical parameters yield identical predictions
//! - Tier assignment is monotonic in the score

use crate::error::{AnalyticsError, Result};
use crate::record::{Field, Industry};
use serde::{Deserialize, Serialize};

/// Score every scenario starts from before weighted terms are added
pub const BASE_SCORE: f64 = 50.0;

/// Hypothetical market conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioParameters {
    pub gdp_growth: f64,
    pub per_capita_income: f64,
    pub inflation_rate: f64,
    pub internet_penetration: f64,
    pub ecommerce_adoption: f64,
    #[serde(rename = "5g_coverage", alias = "coverage_5g")]
    pub coverage_5g: f64,
    pub individualism: f64,
    pub uncertainty_avoidance: f64,
    pub export_volume: f64,
    pub tariff_rate: f64,
    pub sme_industry: Industry,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        ScenarioParameters {
            gdp_growth: 2.5,
            per_capita_income: 35000.0,
            inflation_rate: 3.0,
            internet_penetration: 80.0,
            ecommerce_adoption: 70.0,
            coverage_5g: 50.0,
            individualism: 60.0,
            uncertainty_avoidance: 50.0,
            export_volume: 1000.0,
            tariff_rate: 3.0,
            sme_industry: Industry::It,
        }
    }
}

/// Declared domain of each scenario input, in `Field::FEATURES` order
pub const PARAMETER_RANGES: [(Field, f64, f64); 10] = [
    (Field::GdpGrowth, 0.0, 10.0),
    (Field::PerCapitaIncome, 1000.0, 80000.0),
    (Field::InflationRate, 0.0, 15.0),
    (Field::InternetPenetration, 0.0, 100.0),
    (Field::EcommerceAdoption, 0.0, 100.0),
    (Field::Coverage5g, 0.0, 100.0),
    (Field::Individualism, 0.0, 100.0),
    (Field::UncertaintyAvoidance, 0.0, 100.0),
    (Field::ExportVolume, 0.0, 4000.0),
    (Field::TariffRate, 0.0, 15.0),
];

impl ScenarioParameters {
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::GdpGrowth => Some(self.gdp_growth),
            Field::PerCapitaIncome => Some(self.per_capita_income),
            Field::InflationRate => Some(self.inflation_rate),
            Field::InternetPenetration => Some(self.internet_penetration),
            Field::EcommerceAdoption => Some(self.ecommerce_adoption),
            Field::Coverage5g => Some(self.coverage_5g),
            Field::Individualism => Some(self.individualism),
            Field::UncertaintyAvoidance => Some(self.uncertainty_avoidance),
            Field::ExportVolume => Some(self.export_volume),
            Field::TariffRate => Some(self.tariff_rate),
            Field::AttractivenessScore => None,
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut f64> {
        match field {
            Field::GdpGrowth => Some(&mut self.gdp_growth),
            Field::PerCapitaIncome => Some(&mut self.per_capita_income),
            Field::InflationRate => Some(&mut self.inflation_rate),
            Field::InternetPenetration => Some(&mut self.internet_penetration),
            Field::EcommerceAdoption => Some(&mut self.ecommerce_adoption),
            Field::Coverage5g => Some(&mut self.coverage_5g),
            Field::Individualism => Some(&mut self.individualism),
            Field::UncertaintyAvoidance => Some(&mut self.uncertainty_avoidance),
            Field::ExportVolume => Some(&mut self.export_volume),
            Field::TariffRate => Some(&mut self.tariff_rate),
            Field::AttractivenessScore => None,
        }
    }

    /// Set a numeric input by field name
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        let field: Field = name.parse()?;
        match self.value_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AnalyticsError::UnknownFeature {
                name: name.to_string(),
            }),
        }
    }

    /// Reject any input outside its declared range (NaN included)
    pub fn validate(&self) -> Result<()> {
        for (field, min, max) in PARAMETER_RANGES {
            let value = self.value(field).unwrap_or(f64::NAN);
            if !(min..=max).contains(&value) {
                return Err(AnalyticsError::InvalidRange {
                    field: field.as_str().to_string(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Copy with every input pulled into its declared range
    ///
    /// NaN inputs become the lower bound.
    pub fn clamped(&self) -> Self {
        let mut out = self.clone();
        for (field, min, max) in PARAMETER_RANGES {
            if let Some(slot) = out.value_mut(field) {
                *slot = if slot.is_nan() { min } else { slot.clamp(min, max) };
            }
        }
        out
    }
}

/// What to do with inputs outside their declared range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Fail with `InvalidRange`
    #[default]
    Reject,
    /// Clamp into range before predicting
    Clamp,
}

/// Inputs rescaled onto a 0-100 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    pub gdp_growth: f64,
    pub per_capita_income: f64,
    pub inflation_rate: f64,
    pub internet_penetration: f64,
    pub ecommerce_adoption: f64,
    pub coverage_5g: f64,
    pub individualism: f64,
    pub uncertainty_avoidance: f64,
    pub export_volume: f64,
    pub tariff_rate: f64,
}

/// Rescale inputs
///
/// - gdp_growth / 10, per_capita_income / 70000, export_volume / 3000
/// - 1 - inflation_rate / 15, 1 - tariff_rate / 15
/// - individualism / 100, 1 - uncertainty_avoidance / 100
/// - percentages (internet, e-commerce, 5G) pass through
///
/// Ratio terms are multiplied by 100.
pub fn normalize(params: &ScenarioParameters) -> NormalizedInputs {
    NormalizedInputs {
        gdp_growth: params.gdp_growth / 10.0 * 100.0,
        per_capita_income: params.per_capita_income / 70000.0 * 100.0,
        inflation_rate: (1.0 - params.inflation_rate / 15.0) * 100.0,
        internet_penetration: params.internet_penetration,
        ecommerce_adoption: params.ecommerce_adoption,
        coverage_5g: params.coverage_5g,
        individualism: params.individualism / 100.0 * 100.0,
        uncertainty_avoidance: (1.0 - params.uncertainty_avoidance / 100.0) * 100.0,
        export_volume: params.export_volume / 3000.0 * 100.0,
        tariff_rate: (1.0 - params.tariff_rate / 15.0) * 100.0,
    }
}

/// Per-feature weights of the linear model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioWeights {
    pub gdp_growth: f64,
    pub per_capita_income: f64,
    pub inflation_rate: f64,
    pub internet_penetration: f64,
    pub ecommerce_adoption: f64,
    pub coverage_5g: f64,
    pub individualism: f64,
    pub uncertainty_avoidance: f64,
    pub export_volume: f64,
    pub tariff_rate: f64,
}

impl Default for ScenarioWeights {
    fn default() -> Self {
        ScenarioWeights {
            gdp_growth: 0.15,
            per_capita_income: 0.25,
            inflation_rate: -0.10,
            internet_penetration: 0.20,
            ecommerce_adoption: 0.15,
            coverage_5g: 0.10,
            individualism: 0.05,
            uncertainty_avoidance: -0.02,
            export_volume: 0.08,
            tariff_rate: -0.05,
        }
    }
}

impl ScenarioWeights {
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::GdpGrowth => Some(self.gdp_growth),
            Field::PerCapitaIncome => Some(self.per_capita_income),
            Field::InflationRate => Some(self.inflation_rate),
            Field::InternetPenetration => Some(self.internet_penetration),
            Field::EcommerceAdoption => Some(self.ecommerce_adoption),
            Field::Coverage5g => Some(self.coverage_5g),
            Field::Individualism => Some(self.individualism),
            Field::UncertaintyAvoidance => Some(self.uncertainty_avoidance),
            Field::ExportVolume => Some(self.export_volume),
            Field::TariffRate => Some(self.tariff_rate),
            Field::AttractivenessScore => None,
        }
    }
}

/// Flat bonus for the SME's industry
pub fn industry_bonus(industry: Industry) -> f64 {
    match industry {
        Industry::It => 5.0,
        Industry::Manufacturing => 2.0,
        Industry::Agriculture | Industry::Other => 0.0,
    }
}

/// Weighted contribution of each input to the final score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub feature: Field,
    pub contribution: f64,
}

/// Compute the weighted terms, in `Field::FEATURES` order
pub fn calculate_contributions(
    params: &ScenarioParameters,
    weights: &ScenarioWeights,
) -> Vec<ScoreContribution> {
    let n = normalize(params);
    let normalized = [
        n.gdp_growth,
        n.per_capita_income,
        n.inflation_rate,
        n.internet_penetration,
        n.ecommerce_adoption,
        n.coverage_5g,
        n.individualism,
        n.uncertainty_avoidance,
        n.export_volume,
        n.tariff_rate,
    ];

    Field::FEATURES
        .iter()
        .zip(normalized)
        .map(|(field, value)| ScoreContribution {
            feature: *field,
            contribution: value * weights.get(*field).unwrap_or(0.0),
        })
        .collect()
}

/// Predicted attractiveness with default weights
pub fn calculate_score(params: &ScenarioParameters) -> f64 {
    calculate_score_with_weights(params, &ScenarioWeights::default())
}

/// Predicted attractiveness with custom weights, clamped to [0, 100]
pub fn calculate_score_with_weights(params: &ScenarioParameters, weights: &ScenarioWeights) -> f64 {
    let raw = BASE_SCORE
        + calculate_contributions(params, weights)
            .iter()
            .map(|c| c.contribution)
            .sum::<f64>()
        + industry_bonus(params.sme_industry);
    clamp_score(raw)
}

fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

/// Attractiveness tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTier {
    LessAttractive,       // < 65
    ModeratelyAttractive, // 65-80
    HighlyAttractive,     // >= 80
}

impl MarketTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTier::HighlyAttractive => "Highly Attractive",
            MarketTier::ModeratelyAttractive => "Moderately Attractive",
            MarketTier::LessAttractive => "Less Attractive",
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        let (title, message, items): (&str, &str, [&str; 3]) = match self {
            MarketTier::HighlyAttractive => (
                "Excellent Market Potential",
                "This market shows outstanding potential for SME expansion. Consider it as a priority target for international growth.",
                [
                    "Conduct detailed market research",
                    "Identify local partners",
                    "Develop market entry strategy",
                ],
            ),
            MarketTier::ModeratelyAttractive => (
                "Moderate Market Potential",
                "This market has reasonable potential but requires careful analysis. Consider deeper research before expansion.",
                [
                    "Analyze competitive landscape",
                    "Assess regulatory requirements",
                    "Evaluate cost-benefit ratio",
                ],
            ),
            MarketTier::LessAttractive => (
                "Market Challenges",
                "This market may present significant challenges. Consider alternative markets or wait for improved conditions.",
                [
                    "Monitor market developments",
                    "Explore alternative markets",
                    "Consider future re-evaluation",
                ],
            ),
        };

        Recommendation {
            title: title.to_string(),
            message: message.to_string(),
            action_items: items.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Tier boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        TierThresholds {
            moderate: 65.0,
            high: 80.0,
        }
    }
}

/// Assign tier with default thresholds
pub fn assign_tier(score: f64) -> MarketTier {
    assign_tier_with_thresholds(score, &TierThresholds::default())
}

/// Assign tier with custom thresholds
pub fn assign_tier_with_thresholds(score: f64, thresholds: &TierThresholds) -> MarketTier {
    if score >= thresholds.high {
        MarketTier::HighlyAttractive
    } else if score >= thresholds.moderate {
        MarketTier::ModeratelyAttractive
    } else {
        MarketTier::LessAttractive
    }
}

/// Rank bucket among the reference markets
pub fn estimated_rank(score: f64) -> &'static str {
    if score >= 85.0 {
        "1"
    } else if score >= 80.0 {
        "2-3"
    } else if score >= 70.0 {
        "4-6"
    } else {
        "7-10"
    }
}

/// Position of a hypothetical market among existing ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeRank {
    pub rank: usize,
    pub out_of: usize,
}

/// 1 + number of existing scores strictly above `score`, out of `n + 1`
pub fn relative_rank(score: f64, existing: &[f64]) -> RelativeRank {
    RelativeRank {
        rank: existing.iter().filter(|s| **s > score).count() + 1,
        out_of: existing.len() + 1,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub message: String,
    pub action_items: Vec<String>,
}

/// Outcome of a scenario prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PredictionResult {
    pub score: f64,
    pub tier: MarketTier,
    pub status: String,
    pub recommendation: Recommendation,
    pub estimated_rank: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_rank: Option<RelativeRank>,
    pub industry_bonus: f64,
    pub contributions: Vec<ScoreContribution>,
}

/// Knobs for a full prediction
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictorSettings {
    pub weights: ScenarioWeights,
    pub thresholds: TierThresholds,
    pub policy: RangePolicy,
}

/// Predict with default weights and thresholds
///
/// Inputs are not range-checked; the score is still clamped to [0, 100].
pub fn predict_scenario(params: &ScenarioParameters) -> PredictionResult {
    build_prediction(params, &PredictorSettings::default(), None)
}

/// Predict under explicit settings, applying the range policy first
///
/// `reference_scores`, when given, produces a relative rank against them.
pub fn predict_scenario_with_settings(
    params: &ScenarioParameters,
    settings: &PredictorSettings,
    reference_scores: Option<&[f64]>,
) -> Result<PredictionResult> {
    let params = match settings.policy {
        RangePolicy::Reject => {
            params.validate()?;
            params.clone()
        }
        RangePolicy::Clamp => params.clamped(),
    };
    Ok(build_prediction(&params, settings, reference_scores))
}

fn build_prediction(
    params: &ScenarioParameters,
    settings: &PredictorSettings,
    reference_scores: Option<&[f64]>,
) -> PredictionResult {
    let score = calculate_score_with_weights(params, &settings.weights);
    let tier = assign_tier_with_thresholds(score, &settings.thresholds);
    log::debug!("scenario predicted {:.2} ({})", score, tier.as_str());

    PredictionResult {
        score,
        tier,
        status: tier.as_str().to_string(),
        recommendation: tier.recommendation(),
        estimated_rank: estimated_rank(score).to_string(),
        relative_rank: reference_scores.map(|scores| relative_rank(score, scores)),
        industry_bonus: industry_bonus(params.sme_industry),
        contributions: calculate_contributions(params, &settings.weights),
    }
}
