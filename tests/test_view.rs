
use portfolio_lens::data::{LoadMode, load_bytes, positions_from_table};
use portfolio_lens::view::{PutCallFilter, SortColumn, SortDirection, SortSpec, ViewOptions, ViewRequest};
use portfolio_lens::{OptionKind, PositionRow, build_snapshot};

use portfolio_common::*;

fn sample_rows() -> Vec<PositionRow> {
    let table = load_bytes("sample.csv", SAMPLE_CSV.as_bytes().to_vec(), LoadMode::Lenient).unwrap();
    positions_from_table(&table).unwrap().0
}

fn labels(rows: &[portfolio_lens::DerivedPosition]) -> Vec<&str> {
    rows.iter().map(|r| r.label.as_str()).collect()
}

#[test]
fn test_default_view_shows_options_only() {
    let snap = build_snapshot(&sample_rows(), &ViewRequest::default(), today(), &ViewOptions::default());

    assert_eq!(snap.table.len(), 4);
    assert!(snap.table.iter().all(|p| p.is_option()));
    assert_eq!(snap.symbols, vec!["ABC", "XYZ"]);
    assert_eq!(snap.metrics.total_positions, 4);
    assert_eq!(snap.put_call_pie[0].count, 2);
    assert_eq!(snap.put_call_pie[1].count, 2);
    assert_eq!(snap.spread_bars.len(), 4);
    assert_eq!(snap.expiry_scatter.len(), 4);
    assert_eq!(labels(&snap.high_cost), vec!["XYZ 120 C", "ABC 45 P", "ABC 50 C", "XYZ 100 P"]);

    // First row drives the payoff when nothing is selected.
    let payoff = snap.payoff.unwrap();
    assert_eq!(payoff.label, "ABC 50 C");
    assert_eq!(payoff.spot, 50.0);
    assert_eq!(payoff.point.intrinsic, 0.0);
    assert_eq!(payoff.curve.len(), 101);
}

#[test]
fn test_filters_by_symbol_and_kind() {
    let req = ViewRequest {
        symbols: vec!["XYZ".to_string()],
        put_call: PutCallFilter::Put,
        ..Default::default()
    };
    let snap = build_snapshot(&sample_rows(), &req, today(), &ViewOptions::default());
    assert_eq!(labels(&snap.table), vec!["XYZ 100 P"]);
    assert_eq!(snap.metrics.put_count, 1);
    assert_eq!(snap.metrics.call_count, 0);
    assert!(approx(snap.metrics.total_exposure, 410.0));
    // Filter choices still list every symbol.
    assert_eq!(snap.symbols.len(), 2);
}

#[test]
fn test_filter_with_no_matches() {
    let req = ViewRequest {
        symbols: vec!["NOPE".to_string()],
        ..Default::default()
    };
    let snap = build_snapshot(&sample_rows(), &req, today(), &ViewOptions::default());
    assert!(snap.table.is_empty());
    assert!(snap.payoff.is_none());
    assert_eq!(snap.metrics.avg_spread, None);
}

#[test]
fn test_sort_descending_and_undefined_last() {
    let mut rows = sample_rows();
    rows.push(row("ZERO", Some(OptionKind::Call), 10.0, 0.0, 0.0, 0.0, "202506"));

    let req = ViewRequest {
        sort: Some(SortSpec {
            column: SortColumn::SpreadPct,
            direction: SortDirection::Desc,
        }),
        ..Default::default()
    };
    let snap = build_snapshot(&rows, &req, today(), &ViewOptions::default());
    assert_eq!(
        labels(&snap.table),
        vec!["XYZ 120 C", "ABC 45 P", "ABC 50 C", "XYZ 100 P", "ZERO 10 C"]
    );

    let req = ViewRequest {
        sort: Some(SortSpec {
            column: SortColumn::SpreadPct,
            direction: SortDirection::Asc,
        }),
        ..Default::default()
    };
    let snap = build_snapshot(&rows, &req, today(), &ViewOptions::default());
    assert_eq!(snap.table.last().unwrap().label, "ZERO 10 C");
    assert_eq!(snap.table.first().unwrap().label, "XYZ 100 P");
}

#[test]
fn test_sort_by_strike_is_stable() {
    let rows = vec![call("B", 10.0, 1.0, 0.9, 1.0), put("A", 10.0, 1.0, 0.9, 1.0), call("C", 5.0, 1.0, 0.9, 1.0)];
    let req = ViewRequest {
        sort: Some(SortSpec {
            column: SortColumn::Strike,
            direction: SortDirection::Asc,
        }),
        ..Default::default()
    };
    let snap = build_snapshot(&rows, &req, today(), &ViewOptions::default());
    assert_eq!(labels(&snap.table), vec!["C 5 C", "B 10 C", "A 10 P"]);
}

#[test]
fn test_selected_row_and_spot_are_clamped() {
    let req = ViewRequest {
        selected: Some(1),
        spot: Some(10.0),
        ..Default::default()
    };
    let snap = build_snapshot(&sample_rows(), &req, today(), &ViewOptions::default());
    let payoff = snap.payoff.unwrap();
    assert_eq!(payoff.label, "XYZ 100 P");
    assert_eq!(payoff.kind, OptionKind::Put);
    assert_eq!((payoff.spot_min, payoff.spot_max), (50.0, 150.0));
    assert_eq!(payoff.spot, 50.0);
    assert_eq!(payoff.point.intrinsic, 50.0);
    assert_eq!(payoff.point.contract_value, 5000.0);
}

#[test]
fn test_selection_filtered_out_falls_back_to_first_row() {
    let req = ViewRequest {
        selected: Some(1),
        put_call: PutCallFilter::Call,
        ..Default::default()
    };
    let snap = build_snapshot(&sample_rows(), &req, today(), &ViewOptions::default());
    assert_eq!(snap.payoff.unwrap().label, "ABC 50 C");
}

#[test]
fn test_view_request_from_json() {
    let req: ViewRequest = serde_json::from_str(
        r#"{"symbols":["ABC"],"put_call":"call","sort":{"column":"days_to_expiry"},"spot":55}"#,
    )
    .unwrap();
    assert_eq!(req.put_call, PutCallFilter::Call);
    assert_eq!(req.sort.unwrap().direction, SortDirection::Asc);
    assert_eq!(req.spot, Some(55.0));
    assert_eq!(req.selected, None);
}
