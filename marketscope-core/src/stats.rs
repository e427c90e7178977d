//! Descriptive statistics
//!
//! Global invariants enforced:
//! - Pure functions, no state
//! - Correlation is exactly commutative: pearson(x, y) == pearson(y, x) bit for bit
//! - Constant series correlate to 0, never NaN

use crate::error::{AnalyticsError, Result};
use crate::record::{column, Field, MarketRecord};
use serde::{Deserialize, Serialize};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            context: "mean of an empty series",
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson product-moment correlation, in [-1, 1]
///
/// Returns exactly 0 when either series is constant (zero variance), and when
/// the inputs are too extreme to produce a finite coefficient.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(AnalyticsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    if is_constant(xs) || is_constant(ys) {
        log::warn!("constant series in correlation, returning 0");
        return Ok(0.0);
    }

    // Deviations are scaled into [-1, 1] so squaring cannot overflow
    let scale_x = max_deviation(xs, mean_x);
    let scale_y = max_deviation(ys, mean_y);

    let mut covariance = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = (x - mean_x) / scale_x;
        let dy = (y - mean_y) / scale_y;
        covariance += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if is_degenerate(denominator) {
        log::warn!("zero-variance series in correlation, returning 0");
        return Ok(0.0);
    }

    let r = covariance / denominator;
    if !r.is_finite() {
        log::warn!("non-finite correlation from extreme inputs, returning 0");
        return Ok(0.0);
    }
    Ok(r.clamp(-1.0, 1.0))
}

/// Every value equal to the first
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

fn max_deviation(values: &[f64], mean: f64) -> f64 {
    values
        .iter()
        .map(|v| (v - mean).abs())
        .fold(0.0, f64::max)
}

/// Zero or non-finite correlation denominator
fn is_degenerate(denominator: f64) -> bool {
    denominator == 0.0 || !denominator.is_finite()
}

/// Square correlation matrix over the given fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<Field>,
    /// Row-major, `fields.len()` x `fields.len()`
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Correlation between two named fields, if both are present
    pub fn between(&self, a: Field, b: Field) -> Option<f64> {
        let row = self.fields.iter().position(|f| *f == a)?;
        let col = self.fields.iter().position(|f| *f == b)?;
        self.get(row, col)
    }
}

/// Pairwise correlation matrix
///
/// Diagonal is exactly 1; the upper triangle is computed and mirrored so the
/// matrix is exactly symmetric.
pub fn correlation_matrix(records: &[MarketRecord], fields: &[Field]) -> Result<CorrelationMatrix> {
    if records.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            context: "correlation matrix over an empty table",
        });
    }

    let columns: Vec<Vec<f64>> = fields.iter().map(|f| column(records, *f)).collect();
    let n = fields.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson_correlation(&columns[i], &columns[j])?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        fields: fields.to_vec(),
        values,
    })
}

/// Correlation matrix over field names, rejecting unknown names
pub fn correlation_matrix_by_name<S: AsRef<str>>(
    records: &[MarketRecord],
    names: &[S],
) -> Result<CorrelationMatrix> {
    let fields = Field::parse_list(names)?;
    correlation_matrix(records, &fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(mean(&[7.0]).unwrap(), 7.0);
    }

    #[test]
    fn test_mean_empty_is_error() {
        assert!(matches!(
            mean(&[]),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_self_correlation_is_one() {
        let xs = [2.5, 1.8, 6.0, 1.2, 5.5, 1.0, 2.0, 1.5, 2.8, 2.3];
        let r = pearson_correlation(&xs, &xs).unwrap();
        assert!((r - 1.0).abs() < 1e-12, "got {}", r);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        let r = pearson_correlation(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_is_commutative() {
        let xs = [90.0, 88.0, 70.0, 65.0, 50.0];
        let ys = [85.0, 78.0, 72.0, 65.0, 60.0];
        let a = pearson_correlation(&xs, &ys).unwrap();
        let b = pearson_correlation(&ys, &xs).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_constant_series_correlates_to_zero() {
        let xs = [3.0, 3.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(pearson_correlation(&xs, &ys).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&ys, &xs).unwrap(), 0.0);
    }

    #[test]
    fn test_inexact_constant_series_correlates_to_zero() {
        // the mean of [0.1; 3] is not exactly 0.1
        let xs = [0.1, 0.1, 0.1];
        let ys = [1.0, 2.0, 4.0];
        assert_eq!(pearson_correlation(&xs, &ys).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&ys, &xs).unwrap(), 0.0);
        assert_eq!(pearson_correlation(&[0.7; 10], &[0.3; 10]).unwrap(), 0.0);
    }

    #[test]
    fn test_huge_values_stay_finite() {
        let xs = [1e200, 2e200, 4e200];
        let ys = [1.0, 2.0, 4.0];
        let r = pearson_correlation(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-9, "got {}", r);

        let overflow = [f64::MAX, f64::MAX, 1.0];
        let r = pearson_correlation(&overflow, &ys).unwrap();
        assert!((-1.0..=1.0).contains(&r), "got {}", r);
    }

    #[test]
    fn test_single_pair_correlates_to_zero() {
        assert_eq!(pearson_correlation(&[4.0], &[9.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_correlation_rejects_bad_shapes() {
        assert_eq!(
            pearson_correlation(&[1.0, 2.0], &[1.0]),
            Err(AnalyticsError::LengthMismatch { left: 2, right: 1 })
        );
        assert!(matches!(
            pearson_correlation(&[], &[]),
            Err(AnalyticsError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let dataset = Dataset::builtin();
        let matrix = correlation_matrix(dataset.records(), &Field::FEATURES).unwrap();
        assert_eq!(matrix.size(), 10);
        for i in 0..matrix.size() {
            assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..matrix.size() {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                assert!(matrix.values[i][j].abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_matrix_between_lookup() {
        let dataset = Dataset::builtin();
        let matrix = correlation_matrix(
            dataset.records(),
            &[Field::InternetPenetration, Field::EcommerceAdoption],
        )
        .unwrap();
        let r = matrix
            .between(Field::EcommerceAdoption, Field::InternetPenetration)
            .unwrap();
        assert!(r > 0.9, "internet and e-commerce move together, got {}", r);
        assert_eq!(matrix.between(Field::GdpGrowth, Field::TariffRate), None);
    }

    #[test]
    fn test_matrix_empty_table_is_error() {
        assert!(correlation_matrix(&[], &Field::FEATURES).is_err());
    }

    #[test]
    fn test_matrix_by_name_rejects_unknown() {
        let dataset = Dataset::builtin();
        let err = correlation_matrix_by_name(dataset.records(), &["gdp_growth", "population"])
            .unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::UnknownFeature {
                name: "population".to_string()
            }
        );
    }
}
