//! Turn raw string cells into typed position rows.
//!
//! Broker exports are messy: prices come through as `C2.50` (closing-price
//! marker), `$1,234.50`, or blank. The cleaner extracts the first number it
//! can find; a cell without one degrades to 0 and is recorded in the
//! [`ParseReport`] instead of stopping the batch.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use super::error::{ParseError, SchemaError};
use super::table::RawTable;
use crate::model::{OptionKind, PositionRow};

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("number regex is valid"));

/// Columns every portfolio export must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Symbol", "Type", "P/C", "Strike", "Last", "Bid", "Ask", "Expiry",
];

/// Extract the numeric part of a price-like cell.
pub fn clean_price(raw: &str) -> Option<f64> {
    let stripped: String = raw.chars().filter(|c| *c != ',').collect();
    NUMBER_RE
        .find(&stripped)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Column positions of the required fields inside a [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub symbol: usize,
    pub kind: usize,
    pub put_call: usize,
    pub strike: usize,
    pub last: usize,
    pub bid: usize,
    pub ask: usize,
    pub expiry: usize,
}

impl Schema {
    /// Locate every required column, reporting all missing ones at once.
    pub fn resolve(table: &RawTable) -> Result<Self, SchemaError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }

        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            symbol: idx("Symbol"),
            kind: idx("Type"),
            put_call: idx("P/C"),
            strike: idx("Strike"),
            last: idx("Last"),
            bid: idx("Bid"),
            ask: idx("Ask"),
            expiry: idx("Expiry"),
        })
    }
}

/// Soft failures collected during a lenient parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub errors: Vec<ParseError>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Type every row of `table`.
///
/// Strike, Last, Bid and Ask are cleaned with [`clean_price`]; a cell with
/// no number becomes 0. Blank cells on non-option rows (a stock has no
/// strike) are expected and not reported. Expiry stays text; it is
/// interpreted during derivation.
pub fn parse_rows(table: &RawTable, schema: &Schema) -> (Vec<PositionRow>, ParseReport) {
    let mut report = ParseReport::default();
    let mut rows = Vec::with_capacity(table.len());

    for i in 0..table.len() {
        let instrument = table.cell(i, schema.kind).trim().to_string();
        let is_option = instrument.eq_ignore_ascii_case("OPT");

        let mut price = |col: usize, column: &str| -> f64 {
            let raw = table.cell(i, col);
            if let Some(v) = clean_price(raw) {
                return v;
            }
            if is_option || !raw.trim().is_empty() {
                let err = ParseError {
                    row: i + 1,
                    column: column.to_string(),
                    value: raw.to_string(),
                };
                debug!("{err}; using 0");
                report.errors.push(err);
            }
            0.0
        };

        let strike = price(schema.strike, "Strike");
        let last = price(schema.last, "Last");
        let bid = price(schema.bid, "Bid");
        let ask = price(schema.ask, "Ask");

        rows.push(PositionRow {
            symbol: table.cell(i, schema.symbol).trim().to_string(),
            instrument,
            put_call: OptionKind::parse(table.cell(i, schema.put_call)),
            strike,
            last,
            bid,
            ask,
            expiry: table.cell(i, schema.expiry).trim().to_string(),
        });
    }

    if !report.is_clean() {
        warn!(
            "{} cell(s) could not be parsed and were set to 0",
            report.errors.len()
        );
    }

    (rows, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_price_markers() {
        assert_eq!(clean_price("2.50"), Some(2.5));
        assert_eq!(clean_price("C2.50"), Some(2.5));
        assert_eq!(clean_price("$1,234.50"), Some(1234.5));
        assert_eq!(clean_price("USD 3"), Some(3.0));
        assert_eq!(clean_price(" 7 "), Some(7.0));
        assert_eq!(clean_price(""), None);
        assert_eq!(clean_price("n/a"), None);
    }

    #[test]
    fn test_schema_reports_every_missing_column() {
        let table = RawTable::new(vec!["Symbol".into(), "strike".into(), "Last".into()]);
        let err = Schema::resolve(&table).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns(vec![
                "Type".into(),
                "P/C".into(),
                "Bid".into(),
                "Ask".into(),
                "Expiry".into(),
            ])
        );
    }

    fn table(rows: &[&[&str]]) -> RawTable {
        let mut t = RawTable::new(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect());
        for r in rows {
            t.push_padded(r.iter().map(|c| c.to_string()).collect());
        }
        t
    }

    #[test]
    fn test_blank_stock_strike_is_not_reported() {
        let t = table(&[&["QQQ", "STK", "", "", "410.5", "410.4", "410.6", ""]]);
        let schema = Schema::resolve(&t).unwrap();
        let (rows, report) = parse_rows(&t, &schema);
        assert_eq!(rows[0].strike, 0.0);
        assert_eq!(rows[0].last, 410.5);
        assert!(report.is_clean());
    }

    #[test]
    fn test_blank_option_cell_is_reported() {
        let t = table(&[
            &["ABC", "OPT", "C", "50", "2.5", "2.0", "", "202501"],
            &["QQQ", "STK", "", "n/a", "410.5", "410.4", "410.6", ""],
        ]);
        let schema = Schema::resolve(&t).unwrap();
        let (rows, report) = parse_rows(&t, &schema);
        assert_eq!(rows[0].ask, 0.0);
        assert_eq!(rows[1].strike, 0.0);
        let cols: Vec<(usize, &str)> = report.errors.iter().map(|e| (e.row, e.column.as_str())).collect();
        assert_eq!(cols, vec![(1, "Ask"), (2, "Strike")]);
    }
}
