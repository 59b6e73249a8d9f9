use serde::{Deserialize, Serialize};

use crate::model::{DerivedPosition, OptionKind};

/// Portfolio-level metrics over a (possibly filtered) set of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_positions: usize,
    pub put_count: usize,
    pub call_count: usize,
    /// Sum of position values.
    pub total_exposure: f64,
    /// Mean over rows with a known expiry.
    pub avg_days_to_expiry: Option<f64>,
    pub avg_spread: Option<f64>,
}

impl PortfolioSummary {
    /// Puts and calls are counted among option rows only; every other
    /// metric covers all rows passed in.
    pub fn compute(rows: &[DerivedPosition]) -> Self {
        let count_kind = |kind: OptionKind| {
            rows.iter()
                .filter(|r| r.is_option() && r.kind() == Some(kind))
                .count()
        };

        let dtes: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.days_to_expiry)
            .map(|d| d as f64)
            .collect();

        Self {
            total_positions: rows.len(),
            put_count: count_kind(OptionKind::Put),
            call_count: count_kind(OptionKind::Call),
            total_exposure: rows.iter().map(|r| r.position_value).sum(),
            avg_days_to_expiry: mean(&dtes),
            avg_spread: mean(&rows.iter().map(|r| r.spread).collect::<Vec<_>>()),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// The `n` rows with the widest spread percentage, widest first.
///
/// Rows without a spread percentage (zero ask) are not ranked. The sort is
/// stable, so equal spreads keep their input order.
pub fn top_by_spread(rows: &[DerivedPosition], n: usize) -> Vec<&DerivedPosition> {
    let mut ranked: Vec<(&DerivedPosition, f64)> = rows
        .iter()
        .filter_map(|r| r.spread_pct.filter(|p| !p.is_nan()).map(|p| (r, p)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(n).map(|(r, _)| r).collect()
}
