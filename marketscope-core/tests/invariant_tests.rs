//! Invariant Tests
//!
//! Properties that must hold for any table and any seed.

use marketscope_core::ranking::ConfidenceRange;
use marketscope_core::record::column;
use marketscope_core::scenario::{predict_scenario, ScenarioParameters};
use marketscope_core::stats::{correlation_matrix, pearson_correlation};
use marketscope_core::{calculate_feature_importance, generate_rankings, Dataset, Field, Industry};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_pearson_self_and_symmetry() {
    let dataset = Dataset::builtin();
    for a in Field::FEATURES {
        let xs = column(dataset.records(), a);
        assert!((pearson_correlation(&xs, &xs).unwrap() - 1.0).abs() < 1e-9);
        for b in Field::FEATURES {
            let ys = column(dataset.records(), b);
            let r = pearson_correlation(&xs, &ys).unwrap();
            assert!((-1.0..=1.0).contains(&r));
            assert_eq!(r, pearson_correlation(&ys, &xs).unwrap());
        }
    }
}

#[test]
fn test_matrix_symmetric_unit_diagonal() {
    let dataset = Dataset::builtin();
    let matrix = correlation_matrix(dataset.records(), &Field::FEATURES).unwrap();
    for i in 0..matrix.size() {
        assert_eq!(matrix.get(i, i), Some(1.0));
        for j in 0..matrix.size() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }
}

#[test]
fn test_rankings_sorted_for_any_seed() {
    let dataset = Dataset::builtin();
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let rankings = generate_rankings(dataset.records(), ConfidenceRange::default(), &mut rng);
        assert_eq!(rankings.len(), dataset.len());
        for pair in rankings.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for entry in &rankings {
            assert!(entry.confidence >= 0.7 && entry.confidence < 1.0);
        }
    }
}

#[test]
fn test_importance_bounded_and_sorted() {
    let dataset = Dataset::builtin();
    let importance = calculate_feature_importance(dataset.records(), &Field::FEATURES).unwrap();
    assert_eq!(importance.len(), Field::FEATURES.len());
    for pair in importance.windows(2) {
        assert!(pair[0].importance >= pair[1].importance);
    }
    for fi in &importance {
        assert!((0.0..=1.0).contains(&fi.importance));
    }
}

#[test]
fn test_predictor_bounded_at_extremes() {
    let industries = [
        Industry::It,
        Industry::Manufacturing,
        Industry::Agriculture,
        Industry::Other,
    ];
    for industry in industries {
        for value in [-1e12, 0.0, 1e12] {
            let mut params = ScenarioParameters {
                sme_industry: industry,
                ..ScenarioParameters::default()
            };
            for field in Field::FEATURES {
                params.set(field.as_str(), value).unwrap();
            }
            let score = predict_scenario(&params).score;
            assert!((0.0..=100.0).contains(&score), "score {} out of bounds", score);
        }
    }
}
