//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Output order follows the (already sorted) input
//! - Identical input renders to identical bytes

use crate::comparison::ComparisonSummary;
use crate::scenario::PredictionResult;
use crate::Analysis;
use serde::Serialize;

/// Render a full analysis as text
pub fn render_analysis_text(analysis: &Analysis, top_n: Option<usize>) -> String {
    let mut output = String::new();
    let limit = top_n.unwrap_or(usize::MAX);

    // Headline
    let summary = &analysis.ranking_summary;
    match &summary.top_market {
        Some(top) => output.push_str(&format!(
            "Top market: {} ({:.1})\n",
            top.country, top.score
        )),
        None => output.push_str("Top market: N/A\n"),
    }
    if let Some(avg) = summary.average_score {
        output.push_str(&format!("Average score: {:.1}\n", avg));
    }
    output.push_str(&format!(
        "High confidence: {}/{}\nEmerging markets: {}\n\n",
        summary.high_confidence_count, summary.total, summary.emerging_count
    ));

    // Rankings
    output.push_str(&format!(
        "{:<6} {:<20} {:<8} {}\n",
        "RANK", "COUNTRY", "SCORE", "CONFIDENCE"
    ));
    for (i, entry) in analysis.rankings.iter().take(limit).enumerate() {
        output.push_str(&format!(
            "{:<6} {:<20} {:<8} {:.0}%\n",
            i + 1,
            truncate_or_pad(&entry.country, 20),
            format!("{:.1}", entry.score),
            entry.confidence * 100.0
        ));
    }

    // Feature importance
    output.push_str(&format!("\n{:<28} {}\n", "FEATURE", "IMPORTANCE"));
    for fi in analysis.feature_importance.iter().take(limit) {
        output.push_str(&format!(
            "{:<28} {:.1}%\n",
            truncate_or_pad(&fi.feature.display_name(), 28),
            fi.importance * 100.0
        ));
    }

    let metrics = &analysis.model_metrics;
    output.push_str(&format!(
        "\nModel: train R2 {:.3}, test R2 {:.3}, test MSE {:.2}\n",
        metrics.train_r2, metrics.test_r2, metrics.test_mse
    ));

    output
}

/// Render a scenario prediction as text
pub fn render_prediction_text(result: &PredictionResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("Attractiveness score: {:.1} / 100\n", result.score));
    output.push_str(&format!("Market status: {}\n", result.status));
    output.push_str(&format!("Estimated rank: {}\n", result.estimated_rank));
    if let Some(rank) = result.relative_rank {
        output.push_str(&format!(
            "Rank among reference markets: {}/{}\n",
            rank.rank, rank.out_of
        ));
    }

    output.push_str(&format!("\n{}\n{}\n", result.recommendation.title, result.recommendation.message));
    for item in &result.recommendation.action_items {
        output.push_str(&format!("  - {}\n", item));
    }

    output.push_str(&format!("\n{:<28} {}\n", "FACTOR", "CONTRIBUTION"));
    for c in &result.contributions {
        output.push_str(&format!(
            "{:<28} {:+.2}\n",
            truncate_or_pad(&c.feature.display_name(), 28),
            c.contribution
        ));
    }
    output.push_str(&format!("{:<28} {:+.2}\n", "Industry Bonus", result.industry_bonus));

    output
}

/// Render a country comparison as text
pub fn render_comparison_text(summary: &ComparisonSummary) -> String {
    format!(
        "Countries: {}\nAvg GDP growth: {:.1}%\nAvg income: ${:.0}K\nAvg internet: {:.0}%\nAvg e-commerce: {:.0}%\n",
        summary.countries.join(", "),
        summary.avg_gdp_growth,
        summary.avg_per_capita_income / 1000.0,
        summary.avg_internet_penetration,
        summary.avg_ecommerce_adoption
    )
}

/// Render any result as pretty JSON
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Truncate or pad string to fixed width
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
