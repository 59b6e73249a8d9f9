//! Per-row derived columns.
//!
//! Everything here is a pure function of one row and the reference date, so
//! the dashboard can re-derive the whole table on every interaction.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::{DerivedPosition, LevelType, OptionKind, PositionRow};

/// Standard equity option contract size.
pub const DEFAULT_CONTRACT_MULTIPLIER: f64 = 100.0;

/// Which calendar day a month-only (`YYYYMM`) expiry stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryConvention {
    /// Standard monthly expiration.
    #[default]
    ThirdFriday,
    /// A fixed day, clamped to the length of the month.
    DayOfMonth(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveConfig {
    pub contract_multiplier: f64,
    pub expiry: ExpiryConvention,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: DEFAULT_CONTRACT_MULTIPLIER,
            expiry: ExpiryConvention::default(),
        }
    }
}

/// Compute every derived column for one row.
pub fn derive(index: usize, row: &PositionRow, today: NaiveDate, cfg: &DeriveConfig) -> DerivedPosition {
    let spread = row.ask - row.bid;
    let spread_pct = if row.ask != 0.0 {
        Some(spread / row.ask * 100.0)
    } else {
        None
    };

    let expiry_date = parse_expiry(&row.expiry, cfg.expiry);
    let days_to_expiry = expiry_date.map(|d| (d - today).num_days());

    let (key_level, level_type) = match row.put_call {
        Some(kind) => (Some(key_level(kind, row.strike, row.last)), Some(LevelType::for_kind(kind))),
        None => (None, None),
    };

    DerivedPosition {
        index,
        row: row.clone(),
        spread,
        spread_pct,
        position_value: row.last * cfg.contract_multiplier,
        expiry_date,
        days_to_expiry,
        key_level,
        level_type,
        label: label(row),
    }
}

/// Derive all rows, preserving their order.
pub fn derive_all(rows: &[PositionRow], today: NaiveDate, cfg: &DeriveConfig) -> Vec<DerivedPosition> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| derive(i, row, today, cfg))
        .collect()
}

/// Assignment price for puts, break-even price for calls.
pub fn key_level(kind: OptionKind, strike: f64, last: f64) -> f64 {
    match kind {
        OptionKind::Put => strike,
        OptionKind::Call => strike + last,
    }
}

/// `"ABC 50 C"`. The flag is left off when it is unknown.
pub fn label(row: &PositionRow) -> String {
    match row.put_call {
        Some(kind) => format!("{} {} {}", row.symbol, row.strike, kind),
        None => format!("{} {}", row.symbol, row.strike),
    }
}

/// Parse `YYYYMM` (nominal day per `convention`) or `YYYYMMDD`.
///
/// Spreadsheet exports sometimes carry the number as `202501.0`; the
/// trailing zero fraction is ignored. Anything else yields `None`.
pub fn parse_expiry(raw: &str, convention: ExpiryConvention) -> Option<NaiveDate> {
    let s = raw.trim();
    let s = s
        .split_once('.')
        .filter(|(_, frac)| frac.chars().all(|c| c == '0'))
        .map(|(int, _)| int)
        .unwrap_or(s);
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    match s.len() {
        6 => {
            let year: i32 = s[..4].parse().ok()?;
            let month: u32 = s[4..].parse().ok()?;
            nominal_day(year, month, convention)
        }
        8 => {
            let year: i32 = s[..4].parse().ok()?;
            let month: u32 = s[4..6].parse().ok()?;
            let day: u32 = s[6..].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        _ => None,
    }
}

fn nominal_day(year: i32, month: u32, convention: ExpiryConvention) -> Option<NaiveDate> {
    match convention {
        ExpiryConvention::ThirdFriday => NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Fri, 3),
        ExpiryConvention::DayOfMonth(day) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let last = last_day_of_month(first)?;
            first.with_day(day.clamp(1, last.day()))
        }
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (y, m) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(y, m, 1)?.pred_opt()
}
