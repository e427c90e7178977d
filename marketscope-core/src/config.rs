//! Configuration file support for Marketscope
//!
//! Loads engine configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.marketscoperc.json` in the working directory
//! 3. `marketscope.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::dataset::Dataset;
use crate::ranking::{ConfidenceRange, SummaryThresholds};
use crate::record::Field;
use crate::scenario::{PredictorSettings, RangePolicy, ScenarioWeights, TierThresholds};
use crate::ModelMetrics;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Marketscope configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketscopeConfig {
    /// Path to a JSON array of market records (default: built-in table)
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Seed for ranking confidence (default: fresh entropy on every call)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Range simulated confidence is drawn from
    #[serde(default)]
    pub confidence: Option<ConfidenceConfig>,

    /// Reported model metrics
    #[serde(default)]
    pub model_metrics: Option<ModelMetricsConfig>,

    /// Scenario predictor weight overrides
    #[serde(default)]
    pub weights: Option<WeightConfig>,

    /// Scenario tier thresholds
    #[serde(default)]
    pub tiers: Option<TierConfig>,

    /// What to do with out-of-range scenario inputs
    #[serde(default)]
    pub scenario_policy: Option<RangePolicy>,

    /// Confidence above which a market counts as high confidence (default: 0.8)
    #[serde(default)]
    pub high_confidence: Option<f64>,

    /// Score below which a market counts as emerging (default: 70)
    #[serde(default)]
    pub emerging_below: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceConfig {
    /// Inclusive lower bound (default: 0.7)
    pub min: Option<f64>,
    /// Exclusive upper bound (default: 1.0)
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelMetricsConfig {
    pub train_r2: Option<f64>,
    pub test_r2: Option<f64>,
    pub test_mse: Option<f64>,
}

/// Per-feature predictor weights; unset entries keep their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    pub gdp_growth: Option<f64>,
    pub per_capita_income: Option<f64>,
    pub inflation_rate: Option<f64>,
    pub internet_penetration: Option<f64>,
    pub ecommerce_adoption: Option<f64>,
    #[serde(rename = "5g_coverage", alias = "coverage_5g")]
    pub coverage_5g: Option<f64>,
    pub individualism: Option<f64>,
    pub uncertainty_avoidance: Option<f64>,
    pub export_volume: Option<f64>,
    pub tariff_rate: Option<f64>,
}

impl WeightConfig {
    fn entries(&self) -> [(Field, Option<f64>); 10] {
        [
            (Field::GdpGrowth, self.gdp_growth),
            (Field::PerCapitaIncome, self.per_capita_income),
            (Field::InflationRate, self.inflation_rate),
            (Field::InternetPenetration, self.internet_penetration),
            (Field::EcommerceAdoption, self.ecommerce_adoption),
            (Field::Coverage5g, self.coverage_5g),
            (Field::Individualism, self.individualism),
            (Field::UncertaintyAvoidance, self.uncertainty_avoidance),
            (Field::ExportVolume, self.export_volume),
            (Field::TariffRate, self.tariff_rate),
        ]
    }

    fn apply(&self, base: ScenarioWeights) -> ScenarioWeights {
        ScenarioWeights {
            gdp_growth: self.gdp_growth.unwrap_or(base.gdp_growth),
            per_capita_income: self.per_capita_income.unwrap_or(base.per_capita_income),
            inflation_rate: self.inflation_rate.unwrap_or(base.inflation_rate),
            internet_penetration: self
                .internet_penetration
                .unwrap_or(base.internet_penetration),
            ecommerce_adoption: self.ecommerce_adoption.unwrap_or(base.ecommerce_adoption),
            coverage_5g: self.coverage_5g.unwrap_or(base.coverage_5g),
            individualism: self.individualism.unwrap_or(base.individualism),
            uncertainty_avoidance: self
                .uncertainty_avoidance
                .unwrap_or(base.uncertainty_avoidance),
            export_volume: self.export_volume.unwrap_or(base.export_volume),
            tariff_rate: self.tariff_rate.unwrap_or(base.tariff_rate),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Score at which a market becomes moderately attractive (default: 65)
    pub moderate: Option<f64>,
    /// Score at which a market becomes highly attractive (default: 80)
    pub high: Option<f64>,
}

/// Resolved configuration with every default applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub dataset_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub confidence: ConfidenceRange,
    pub model_metrics: ModelMetrics,
    pub predictor: PredictorSettings,
    pub summary: SummaryThresholds,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl MarketscopeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref c) = self.confidence {
            let min = c.min.unwrap_or(0.7);
            let max = c.max.unwrap_or(1.0);
            ConfidenceRange::new(min, max).context("invalid confidence range")?;
        }

        if let Some(ref m) = self.model_metrics {
            for (name, val) in [("train_r2", m.train_r2), ("test_r2", m.test_r2)] {
                if let Some(v) = val {
                    if v.is_nan() || v > 1.0 {
                        anyhow::bail!("model_metrics.{} must be at most 1.0 (got {})", name, v);
                    }
                }
            }
            if let Some(mse) = m.test_mse {
                if mse.is_nan() || mse < 0.0 {
                    anyhow::bail!("model_metrics.test_mse must be non-negative (got {})", mse);
                }
            }
        }

        // Weights are signed; keep them on the same scale as the defaults
        if let Some(ref w) = self.weights {
            for (field, val) in w.entries() {
                if let Some(v) = val {
                    if !(-1.0..=1.0).contains(&v) {
                        anyhow::bail!("weights.{} must be within [-1, 1] (got {})", field, v);
                    }
                }
            }
        }

        if let Some(ref t) = self.tiers {
            let moderate = t.moderate.unwrap_or(65.0);
            let high = t.high.unwrap_or(80.0);

            if moderate.is_nan() || moderate <= 0.0 {
                anyhow::bail!("tiers.moderate must be positive (got {})", moderate);
            }
            if high.is_nan() || high > 100.0 {
                anyhow::bail!("tiers.high must be at most 100 (got {})", high);
            }
            if moderate >= high {
                anyhow::bail!(
                    "tiers.moderate ({}) must be less than tiers.high ({})",
                    moderate,
                    high
                );
            }
        }

        if let Some(hc) = self.high_confidence {
            if !(0.0..=1.0).contains(&hc) {
                anyhow::bail!("high_confidence must be within [0, 1] (got {})", hc);
            }
        }

        if let Some(eb) = self.emerging_below {
            if !(0.0..=100.0).contains(&eb) {
                anyhow::bail!("emerging_below must be within [0, 100] (got {})", eb);
            }
        }

        Ok(())
    }

    /// Resolve config into a form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let confidence = match &self.confidence {
            Some(c) => ConfidenceRange::new(c.min.unwrap_or(0.7), c.max.unwrap_or(1.0))?,
            None => ConfidenceRange::default(),
        };

        let defaults = ModelMetrics::default();
        let model_metrics = match &self.model_metrics {
            Some(m) => ModelMetrics {
                train_r2: m.train_r2.unwrap_or(defaults.train_r2),
                test_r2: m.test_r2.unwrap_or(defaults.test_r2),
                test_mse: m.test_mse.unwrap_or(defaults.test_mse),
            },
            None => defaults,
        };

        let weights = match &self.weights {
            Some(w) => w.apply(ScenarioWeights::default()),
            None => ScenarioWeights::default(),
        };

        let thresholds = match &self.tiers {
            Some(t) => TierThresholds {
                moderate: t.moderate.unwrap_or(65.0),
                high: t.high.unwrap_or(80.0),
            },
            None => TierThresholds::default(),
        };

        let summary_defaults = SummaryThresholds::default();

        Ok(ResolvedConfig {
            dataset_path: self.dataset.clone(),
            seed: self.seed,
            confidence,
            model_metrics,
            predictor: PredictorSettings {
                weights,
                thresholds,
                policy: self.scenario_policy.unwrap_or_default(),
            },
            summary: SummaryThresholds {
                high_confidence: self
                    .high_confidence
                    .unwrap_or(summary_defaults.high_confidence),
                emerging_below: self
                    .emerging_below
                    .unwrap_or(summary_defaults.emerging_below),
            },
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        MarketscopeConfig::default().resolve()
    }

    /// Load the configured dataset, or the built-in table when none is set
    ///
    /// Relative dataset paths resolve against the config file's directory.
    pub fn load_dataset(&self) -> Result<Dataset> {
        match &self.dataset_path {
            Some(path) => {
                let path = match (&self.config_path, path.is_relative()) {
                    (Some(config), true) => config
                        .parent()
                        .map(|dir| dir.join(path))
                        .unwrap_or_else(|| path.clone()),
                    _ => path.clone(),
                };
                Dataset::load(&path)
            }
            None => Ok(Dataset::builtin()),
        }
    }
}

/// Discover and load a config file from a directory
///
/// Search order:
/// 1. `.marketscoperc.json`
/// 2. `marketscope.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(MarketscopeConfig, PathBuf)>> {
    for name in [".marketscoperc.json", "marketscope.config.json"] {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<MarketscopeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: MarketscopeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (MarketscopeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
