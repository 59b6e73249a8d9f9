
use portfolio_lens::analytics::{DeriveConfig, PortfolioSummary, derive_all, top_by_spread};
use portfolio_lens::data::{LoadMode, load_bytes, positions_from_table};
use portfolio_lens::report::{render_summary, write_csv};
use portfolio_lens::PositionRow;

use portfolio_common::*;

fn sample_rows() -> Vec<PositionRow> {
    let table = load_bytes("sample.csv", SAMPLE_CSV.as_bytes().to_vec(), LoadMode::Strict).unwrap();
    positions_from_table(&table).unwrap().0
}

#[test]
fn test_summary_counts_options_only_for_put_call() {
    let derived = derive_all(&sample_rows(), today(), &DeriveConfig::default());
    let s = PortfolioSummary::compute(&derived);

    assert_eq!(s.total_positions, 5);
    assert_eq!(s.put_count, 2);
    assert_eq!(s.call_count, 2);
    // 250 + 410 + 120 + 41050 + 80
    assert!(approx(s.total_exposure, 41_910.0));
    // The stock row has no expiry and is left out of the DTE mean.
    assert!(s.avg_days_to_expiry.is_some());
}

#[test]
fn test_summary_of_nothing() {
    let s = PortfolioSummary::compute(&[]);
    assert_eq!(s.total_positions, 0);
    assert_eq!(s.total_exposure, 0.0);
    assert_eq!(s.avg_days_to_expiry, None);
    assert_eq!(s.avg_spread, None);
}

#[test]
fn test_mean_spread_and_dte() {
    let rows = vec![
        row("A", Some(portfolio_lens::OptionKind::Call), 10.0, 1.0, 1.0, 2.0, "20250111"),
        row("B", Some(portfolio_lens::OptionKind::Put), 10.0, 1.0, 1.0, 4.0, "20250121"),
    ];
    let derived = derive_all(&rows, today(), &DeriveConfig::default());
    let s = PortfolioSummary::compute(&derived);
    assert!(approx(s.avg_spread.unwrap(), 2.0));
    assert!(approx(s.avg_days_to_expiry.unwrap(), 15.0));
}

#[test]
fn test_top_by_spread_is_descending_and_stable() {
    let rows = vec![
        call("LOW", 10.0, 1.0, 0.95, 1.0),   // 5%
        call("TIE1", 10.0, 1.0, 0.75, 1.0),  // 25%
        put("ZERO", 10.0, 0.0, 0.0, 0.0),    // undefined
        call("HIGH", 10.0, 1.0, 0.5, 1.0),   // 50%
        put("TIE2", 10.0, 1.0, 1.5, 2.0),    // 25%
    ];
    let derived = derive_all(&rows, today(), &DeriveConfig::default());

    let top: Vec<&str> = top_by_spread(&derived, 3).iter().map(|d| d.row.symbol.as_str()).collect();
    assert_eq!(top, vec!["HIGH", "TIE1", "TIE2"]);

    // Never more than the eligible rows; zero-ask rows are not eligible.
    let all = top_by_spread(&derived, 10);
    assert_eq!(all.len(), 4);
    assert!(all.iter().all(|d| d.row.symbol != "ZERO"));
    assert!(all.windows(2).all(|w| w[0].spread_pct >= w[1].spread_pct));

    assert!(top_by_spread(&derived, 0).is_empty());
}

#[test]
fn test_zero_ask_row_does_not_abort_the_batch() {
    let csv = format!("{HEADER}\nABC,OPT,C,50,2.5,2.0,,202501\nXYZ,OPT,P,100,4.1,4.0,4.4,202503\n");
    let table = load_bytes("gap.csv", csv.into_bytes(), LoadMode::Lenient).unwrap();
    let (rows, report) = positions_from_table(&table).unwrap();
    assert_eq!(report.errors.len(), 1);

    let derived = derive_all(&rows, today(), &DeriveConfig::default());
    assert_eq!(derived[0].row.ask, 0.0);
    assert_eq!(derived[0].spread_pct, None);

    let top = top_by_spread(&derived, 3);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].row.symbol, "XYZ");
}

#[test]
fn test_render_summary_layout() {
    let derived = derive_all(&sample_rows(), today(), &DeriveConfig::default());
    let summary = PortfolioSummary::compute(&derived);
    let top = top_by_spread(&derived, 3);
    let text = render_summary(&summary, &top);

    let expected = "\
--- PORTFOLIO REPORT ---

Total Positions: 5
Puts: 2 | Calls: 2

⚠️ HIGH COST TRADES (Wide Spreads):
XYZ (50.0% Spread)
ABC (37.5% Spread)
ABC (33.3% Spread)

--- END OF REPORT ---
";
    assert_eq!(text, expected);
}

#[test]
fn test_csv_export_has_derived_columns() {
    let derived = derive_all(&sample_rows(), today(), &DeriveConfig::default());
    let mut buf = Vec::new();
    write_csv(&derived, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();

    let header = lines.next().unwrap();
    assert!(header.starts_with("Symbol,Type,P/C,Strike,Last,Bid,Ask,Expiry,Spread,Spread_Pct"));
    assert!(header.ends_with("Key_Level,Level_Type,Label"));
    assert_eq!(lines.count(), 5);
    assert!(text.contains("Break-Even Price"));
}

#[test]
fn test_report_runs_on_blank_stock_and_option_cells() {
    let csv = format!(
        "{HEADER}\nQQQ,STK,,,410.5,410.4,410.6,\nABC,OPT,C,50,2.5,2.0,,202501\nXYZ,OPT,P,100,4.1,4.0,4.4,202503\n"
    );
    let path = write_temp("report_blanks.csv", csv.as_bytes());
    let cfg = portfolio_lens::AppConfig::default();
    portfolio_lens::report::run(&path, &cfg, false, today()).unwrap();
    portfolio_lens::report::run(&path, &cfg, true, today()).unwrap();
}

#[test]
fn test_report_still_rejects_ragged_files() {
    let csv = format!("{HEADER}\nABC,OPT,C,50,2.5,2.0,3.0,202501\nXYZ,OPT,P,100\n");
    let path = write_temp("report_ragged.csv", csv.as_bytes());
    let err = portfolio_lens::report::run(&path, &portfolio_lens::AppConfig::default(), false, today());
    assert!(err.is_err());
}
