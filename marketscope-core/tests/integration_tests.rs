//! Integration tests for market analytics

use marketscope_core::comparison::Selection;
use marketscope_core::config;
use marketscope_core::projection::RadarMetric;
use marketscope_core::report::{render_analysis_text, render_json};
use marketscope_core::scenario::{MarketTier, ScenarioParameters};
use marketscope_core::{AnalyticsError, Dataset, Engine, EngineSettings, Field};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join("markets")
        .join(name)
}

fn seeded_engine(seed: u64) -> Engine {
    let settings = EngineSettings {
        seed: Some(seed),
        ..EngineSettings::default()
    };
    Engine::with_settings(Dataset::builtin(), settings)
}

#[test]
fn test_builtin_analysis() {
    let analysis = seeded_engine(1).analyze().unwrap();

    assert_eq!(analysis.rankings.len(), 10);
    assert_eq!(analysis.rankings[0].country, "USA");
    assert_eq!(analysis.rankings[0].score, 85.0);
    assert_eq!(analysis.feature_importance.len(), 10);
    assert_eq!(analysis.feature_importance[0].feature, Field::EcommerceAdoption);
    assert_eq!(analysis.model_metrics.train_r2, 0.912);
    assert_eq!(analysis.ranking_summary.total, 10);
    assert_eq!(
        analysis.ranking_summary.top_market.as_ref().map(|t| t.country.as_str()),
        Some("USA")
    );
}

#[test]
fn test_seeded_analysis_is_reproducible() {
    let first = seeded_engine(7).analyze().unwrap();
    let second = seeded_engine(7).analyze().unwrap();
    assert_eq!(first, second);
    assert_eq!(render_json(&first), render_json(&second));
    assert_eq!(render_analysis_text(&first, None), render_analysis_text(&second, None));
}

#[test]
fn test_analyze_with_injected_rng() {
    let engine = Engine::new(Dataset::builtin());
    let a = engine.analyze_with_rng(&mut StdRng::seed_from_u64(3)).unwrap();
    let b = engine.analyze_with_rng(&mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(a.rankings, b.rankings);
}

#[test]
fn test_config_with_relative_dataset() {
    let resolved = config::load_and_resolve(
        &std::env::temp_dir(),
        Some(&fixture_path("seeded.config.json")),
    )
    .unwrap();
    assert_eq!(resolved.seed, Some(42));

    let engine = Engine::from_config(&resolved).unwrap();
    assert_eq!(engine.dataset().len(), 3);

    let analysis = engine.analyze().unwrap();
    let order: Vec<&str> = analysis.rankings.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(order, vec!["Alpha", "Gamma", "Beta"]);
    for entry in &analysis.rankings {
        assert!(entry.confidence >= 0.75 && entry.confidence < 0.95);
    }
    assert_eq!(analysis, engine.analyze().unwrap());
}

#[test]
fn test_clamp_policy_from_config() {
    let resolved = config::load_and_resolve(
        &std::env::temp_dir(),
        Some(&fixture_path("seeded.config.json")),
    )
    .unwrap();
    let engine = Engine::from_config(&resolved).unwrap();

    let params = ScenarioParameters {
        gdp_growth: 50.0,
        ..ScenarioParameters::default()
    };
    let result = engine.predict_scenario(&params).unwrap();
    assert_eq!(result.score, 100.0);
    assert_eq!(result.tier, MarketTier::HighlyAttractive);
    let rank = result.relative_rank.unwrap();
    assert_eq!((rank.rank, rank.out_of), (1, 4));
}

#[test]
fn test_reject_policy_by_default() {
    let params = ScenarioParameters {
        tariff_rate: 40.0,
        ..ScenarioParameters::default()
    };
    let err = Engine::new(Dataset::builtin()).predict_scenario(&params).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidRange { ref field, .. } if field == "tariff_rate"));
}

#[test]
fn test_default_scenario_against_builtin() {
    let result = Engine::new(Dataset::builtin())
        .predict_scenario(&ScenarioParameters::default())
        .unwrap();
    assert!(result.score > 50.0 && result.score <= 100.0);
    assert_ne!(result.tier, MarketTier::LessAttractive);
    assert_eq!(result.relative_rank.unwrap().out_of, 11);
}

#[test]
fn test_duplicate_country_dataset_is_rejected() {
    let err = Dataset::load(&fixture_path("duplicate-country.json")).unwrap_err();
    assert!(format!("{:#}", err).contains("Alpha"));
}

#[test]
fn test_missing_dataset_file() {
    assert!(Dataset::load(&fixture_path("does-not-exist.json")).is_err());
}

#[test]
fn test_projections_are_idempotent() {
    let engine = seeded_engine(11);
    let analysis = engine.analyze().unwrap();
    let selection = Selection::top_ranked(&analysis.rankings, 3);

    let radar = engine.project_radar(&selection, &RadarMetric::defaults()).unwrap();
    assert_eq!(radar.polygons.len(), 3);
    assert_eq!(radar, engine.project_radar(&selection, &RadarMetric::defaults()).unwrap());

    let fields = ["gdp_growth", "per_capita_income", "internet_penetration"];
    let grid = engine.project_correlation_grid(&fields).unwrap();
    assert_eq!(grid.cells.len(), 9);
    assert_eq!(grid, engine.project_correlation_grid(&fields).unwrap());

    let scatter = engine.project_scatter(&analysis.rankings).unwrap();
    assert_eq!(scatter.len(), 10);
    assert_eq!(scatter, engine.project_scatter(&analysis.rankings).unwrap());
}

#[test]
fn test_compare_top_three() {
    let engine = seeded_engine(5);
    let analysis = engine.analyze().unwrap();
    let selection = Selection::top_ranked(&analysis.rankings, 3);
    let summary = engine.compare(&selection).unwrap();

    assert_eq!(summary.countries.len(), 3);
    assert!(summary.countries.contains(&"USA".to_string()));
    assert!(summary.avg_per_capita_income > 0.0);
}

#[test]
fn test_compare_empty_selection() {
    let engine = Engine::new(Dataset::builtin());
    let err = engine.compare(&Selection::new()).unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptyInput { .. }));
}
