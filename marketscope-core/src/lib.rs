//! Marketscope core library - market attractiveness analytics
//!
//! Turns a table of per-country market records into feature importance,
//! rankings, scenario predictions and chart geometry.

// Global invariants enforced in this crate:
// - Input tables are never mutated
// - No global mutable state
// - Randomness only through an injected `Rng` (ranking confidence)
// - Sorts are stable; ties keep input order
// - Geometry is pure: identical input yields bit-identical coordinates

pub mod comparison;
pub mod config;
pub mod dataset;
pub mod error;
pub mod importance;
pub mod projection;
pub mod ranking;
pub mod record;
pub mod report;
pub mod scenario;
pub mod stats;

pub use config::ResolvedConfig;
pub use dataset::Dataset;
pub use error::{AnalyticsError, Result};
pub use importance::{calculate_feature_importance, FeatureImportance};
pub use projection::{project_correlation_grid, project_radar, project_scatter};
pub use ranking::{generate_rankings, RankingEntry};
pub use record::{Field, Industry, MarketRecord};
pub use scenario::{predict_scenario, PredictionResult, ScenarioParameters};

use comparison::{ComparisonSummary, Selection};
use importance::ImportanceSummary;
use projection::{GridLayout, GridStyle, RadarLayout, RadarMetric, RadarStyle, ScatterPoint, ScatterStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ranking::{ConfidenceRange, RankingSummary, SummaryThresholds};
use scenario::PredictorSettings;
use serde::{Deserialize, Serialize};

/// Illustrative model quality figures
///
/// Fixed configuration, not computed from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelMetrics {
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_mse: f64,
}

impl Default for ModelMetrics {
    fn default() -> Self {
        ModelMetrics {
            train_r2: 0.912,
            test_r2: 0.887,
            test_mse: 12.34,
        }
    }
}

/// Combined result of one analysis pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Analysis {
    pub rankings: Vec<RankingEntry>,
    pub feature_importance: Vec<FeatureImportance>,
    pub model_metrics: ModelMetrics,
    pub ranking_summary: RankingSummary,
    pub importance_summary: ImportanceSummary,
}

/// Analyze a table with default settings
pub fn analyze<R: Rng + ?Sized>(records: &[MarketRecord], rng: &mut R) -> Result<Analysis> {
    analyze_with_settings(records, &EngineSettings::default(), rng)
}

fn analyze_with_settings<R: Rng + ?Sized>(
    records: &[MarketRecord],
    settings: &EngineSettings,
    rng: &mut R,
) -> Result<Analysis> {
    let rankings = generate_rankings(records, settings.confidence, rng);
    let feature_importance = importance::default_feature_importance(records)?;

    Ok(Analysis {
        ranking_summary: ranking::summarize_rankings(&rankings, &settings.summary),
        importance_summary: importance::summarize_importance(&feature_importance),
        rankings,
        feature_importance,
        model_metrics: settings.model_metrics,
    })
}

/// Tunables the engine applies on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineSettings {
    /// `None` re-randomizes confidence on every call
    pub seed: Option<u64>,
    pub confidence: ConfidenceRange,
    pub model_metrics: ModelMetrics,
    pub predictor: PredictorSettings,
    pub summary: SummaryThresholds,
}

impl From<&ResolvedConfig> for EngineSettings {
    fn from(config: &ResolvedConfig) -> Self {
        EngineSettings {
            seed: config.seed,
            confidence: config.confidence,
            model_metrics: config.model_metrics,
            predictor: config.predictor,
            summary: config.summary,
        }
    }
}

/// Analytics over an injected, read-only dataset
#[derive(Debug, Clone)]
pub struct Engine {
    dataset: Dataset,
    settings: EngineSettings,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Self {
        Engine::with_settings(dataset, EngineSettings::default())
    }

    pub fn with_settings(dataset: Dataset, settings: EngineSettings) -> Self {
        Engine { dataset, settings }
    }

    /// Build from a resolved config, loading its dataset
    pub fn from_config(config: &ResolvedConfig) -> anyhow::Result<Self> {
        let dataset = config.load_dataset()?;
        Ok(Engine::with_settings(dataset, EngineSettings::from(config)))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Rankings and feature importance over the whole table
    ///
    /// With a configured seed every call returns the same confidences;
    /// without one each call draws fresh values.
    pub fn analyze(&self) -> Result<Analysis> {
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.analyze_with_rng(&mut rng)
    }

    pub fn analyze_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Analysis> {
        let analysis = analyze_with_settings(self.dataset.records(), &self.settings, rng)?;
        log::debug!(
            "analyzed {} markets, top market: {}",
            analysis.rankings.len(),
            analysis
                .rankings
                .first()
                .map(|r| r.country.as_str())
                .unwrap_or("none")
        );
        Ok(analysis)
    }

    /// Predict a hypothetical market, ranked against the dataset's scores
    pub fn predict_scenario(&self, params: &ScenarioParameters) -> Result<PredictionResult> {
        let scores = self.dataset.scores();
        scenario::predict_scenario_with_settings(params, &self.settings.predictor, Some(&scores))
    }

    /// Radar layout for the selected countries
    pub fn project_radar(&self, selection: &Selection, metrics: &[RadarMetric]) -> Result<RadarLayout> {
        let records = selection.records(&self.dataset);
        if records.len() < selection.len() {
            log::warn!(
                "{} selected countries are not in the dataset",
                selection.len() - records.len()
            );
        }
        project_radar(&records, metrics, &RadarStyle::default())
    }

    /// Correlation grid over named fields
    pub fn project_correlation_grid<S: AsRef<str>>(&self, fields: &[S]) -> Result<GridLayout> {
        let fields = Field::parse_list(fields)?;
        project_correlation_grid(self.dataset.records(), &fields, &GridStyle::default())
    }

    /// Scatter layout for a set of rankings
    pub fn project_scatter(&self, rankings: &[RankingEntry]) -> Result<Vec<ScatterPoint>> {
        project_scatter(rankings, &ScatterStyle::default())
    }

    /// Averages over the selected countries
    pub fn compare(&self, selection: &Selection) -> Result<ComparisonSummary> {
        comparison::compare(&selection.records(&self.dataset))
    }
}
