//! Dashboard view model.
//!
//! `build_snapshot` is the whole interactive model: the loaded rows and the
//! current control values go in, everything the page renders comes out.
//! Nothing is cached between calls; every filter change or slider move runs
//! derivation, aggregation and payoff again.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::payoff::spot_range;
use crate::analytics::{DeriveConfig, PayoffPoint, PortfolioSummary, derive_all, payoff_at, payoff_curve, top_by_spread};
use crate::model::{DerivedPosition, OptionKind, PositionRow};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PutCallFilter {
    #[default]
    All,
    Put,
    Call,
}

impl PutCallFilter {
    fn accepts(&self, kind: Option<OptionKind>) -> bool {
        match self {
            Self::All => true,
            Self::Put => kind == Some(OptionKind::Put),
            Self::Call => kind == Some(OptionKind::Call),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Label,
    Symbol,
    Strike,
    Last,
    Bid,
    Ask,
    Spread,
    SpreadPct,
    PositionValue,
    DaysToExpiry,
    KeyLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Current state of every dashboard control.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    /// Symbols to keep; empty keeps all.
    pub symbols: Vec<String>,
    pub put_call: PutCallFilter,
    pub sort: Option<SortSpec>,
    /// Source row index of the row driving the payoff simulator.
    pub selected: Option<usize>,
    /// Slider value; defaults to the selected strike.
    pub spot: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub derive: DeriveConfig,
    pub top_n: usize,
    pub payoff_steps: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            derive: DeriveConfig::default(),
            top_n: 5,
            payoff_steps: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub label: String,
    pub spread_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub label: String,
    pub kind: Option<OptionKind>,
    pub days_to_expiry: i64,
    pub key_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffView {
    pub index: usize,
    pub label: String,
    pub kind: OptionKind,
    pub strike: f64,
    pub spot_min: f64,
    pub spot_max: f64,
    /// Requested spot, clamped into `[spot_min, spot_max]`.
    pub spot: f64,
    pub point: PayoffPoint,
    pub curve: Vec<PayoffPoint>,
}

/// Everything the dashboard renders for one set of control values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// All option symbols in the file, for the symbol filter.
    pub symbols: Vec<String>,
    pub metrics: PortfolioSummary,
    pub put_call_pie: Vec<PieSlice>,
    pub spread_bars: Vec<BarPoint>,
    pub expiry_scatter: Vec<ScatterPoint>,
    pub table: Vec<DerivedPosition>,
    pub high_cost: Vec<DerivedPosition>,
    pub payoff: Option<PayoffView>,
}

/// Recompute the dashboard from scratch.
pub fn build_snapshot(
    rows: &[PositionRow],
    req: &ViewRequest,
    today: NaiveDate,
    opts: &ViewOptions,
) -> DashboardSnapshot {
    let options: Vec<DerivedPosition> = derive_all(rows, today, &opts.derive)
        .into_iter()
        .filter(|p| p.is_option())
        .collect();

    let symbols: Vec<String> = options
        .iter()
        .map(|p| p.row.symbol.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut table: Vec<DerivedPosition> = options
        .into_iter()
        .filter(|p| req.symbols.is_empty() || req.symbols.iter().any(|s| s == &p.row.symbol))
        .filter(|p| req.put_call.accepts(p.kind()))
        .collect();

    let metrics = PortfolioSummary::compute(&table);
    let high_cost = top_by_spread(&table, opts.top_n).into_iter().cloned().collect();

    if let Some(sort) = req.sort {
        sort_rows(&mut table, sort);
    }

    let put_call_pie = vec![
        PieSlice {
            label: "Puts".to_string(),
            count: metrics.put_count,
        },
        PieSlice {
            label: "Calls".to_string(),
            count: metrics.call_count,
        },
    ];

    let spread_bars = table
        .iter()
        .filter_map(|p| {
            p.spread_pct.map(|spread_pct| BarPoint {
                label: p.label.clone(),
                spread_pct,
            })
        })
        .collect();

    let expiry_scatter = table
        .iter()
        .filter_map(|p| {
            Some(ScatterPoint {
                label: p.label.clone(),
                kind: p.kind(),
                days_to_expiry: p.days_to_expiry?,
                key_level: p.key_level?,
            })
        })
        .collect();

    let payoff = select_payoff(&table, req, opts);

    DashboardSnapshot {
        symbols,
        metrics,
        put_call_pie,
        spread_bars,
        expiry_scatter,
        table,
        high_cost,
        payoff,
    }
}

/// The selected row if it survived filtering, otherwise the first row of
/// the table. Rows without a put/call flag have no payoff.
fn select_payoff(table: &[DerivedPosition], req: &ViewRequest, opts: &ViewOptions) -> Option<PayoffView> {
    let selected = req
        .selected
        .and_then(|idx| table.iter().find(|p| p.index == idx))
        .or_else(|| table.first())?;
    let kind = selected.kind()?;
    let strike = selected.row.strike;
    if !strike.is_finite() || strike <= 0.0 {
        return None;
    }

    let (spot_min, spot_max) = spot_range(strike);
    let spot = req
        .spot
        .filter(|s| s.is_finite())
        .unwrap_or(strike)
        .clamp(spot_min, spot_max);
    let multiplier = opts.derive.contract_multiplier;

    Some(PayoffView {
        index: selected.index,
        label: selected.label.clone(),
        kind,
        strike,
        spot_min,
        spot_max,
        spot,
        point: payoff_at(kind, strike, spot, multiplier),
        curve: payoff_curve(kind, strike, opts.payoff_steps, multiplier),
    })
}

/// Stable sort on one column. Undefined values go last in either direction.
pub fn sort_rows(rows: &mut [DerivedPosition], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let ord = match sort.column {
            SortColumn::Label => a.label.cmp(&b.label),
            SortColumn::Symbol => a.row.symbol.cmp(&b.row.symbol),
            column => match (numeric_key(a, column), numeric_key(b, column)) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => return Ordering::Equal,
            },
        };
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn numeric_key(p: &DerivedPosition, column: SortColumn) -> Option<f64> {
    match column {
        SortColumn::Strike => Some(p.row.strike),
        SortColumn::Last => Some(p.row.last),
        SortColumn::Bid => Some(p.row.bid),
        SortColumn::Ask => Some(p.row.ask),
        SortColumn::Spread => Some(p.spread),
        SortColumn::SpreadPct => p.spread_pct,
        SortColumn::PositionValue => Some(p.position_value),
        SortColumn::DaysToExpiry => p.days_to_expiry.map(|d| d as f64),
        SortColumn::KeyLevel => p.key_level,
        SortColumn::Label | SortColumn::Symbol => None,
    }
    .filter(|v| !v.is_nan())
}
