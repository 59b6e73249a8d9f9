//! Text rendering of an analysis: the one-shot portfolio report, the
//! derived-row table, and CSV export.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{self, PortfolioSummary, payoff_at, payoff_curve, top_by_spread};
use crate::config::AppConfig;
use crate::data::{LoadMode, ParseReport};
use crate::model::{DerivedPosition, OptionKind};

/// Entry point for the `report` command.
///
/// A file that cannot be read, has ragged records or lacks a required column
/// aborts before anything is printed. Unreadable prices count as 0 and are
/// listed on stderr.
pub fn run(file: &Path, cfg: &AppConfig, json: bool, today: NaiveDate) -> Result<()> {
    let analysis = analytics::analyze_path(
        file,
        LoadMode::Strict,
        today,
        &cfg.analysis.derive_config(),
    )
    .with_context(|| format!("analyzing {}", file.display()))?;
    print_warnings(&analysis.parse_report);

    let summary = PortfolioSummary::compute(&analysis.positions);
    let top = top_by_spread(&analysis.positions, cfg.analysis.top_n);

    if json {
        let out = ReportJson {
            summary: &summary,
            high_cost_trades: top,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_summary(&summary, &top));
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportJson<'a> {
    summary: &'a PortfolioSummary,
    high_cost_trades: Vec<&'a DerivedPosition>,
}

/// The fixed-layout portfolio report.
pub fn render_summary(summary: &PortfolioSummary, top: &[&DerivedPosition]) -> String {
    let mut expensive = String::new();
    for row in top {
        if let Some(pct) = row.spread_pct {
            expensive.push_str(&format!("{} ({:.1}% Spread)\n", row.row.symbol, pct));
        }
    }

    format!(
        "--- PORTFOLIO REPORT ---\n\n\
         Total Positions: {}\n\
         Puts: {} | Calls: {}\n\n\
         ⚠️ HIGH COST TRADES (Wide Spreads):\n\
         {}\n\
         --- END OF REPORT ---\n",
        summary.total_positions, summary.put_count, summary.call_count, expensive
    )
}

/// Entry point for the `table` command.
pub fn run_table(
    file: &Path,
    cfg: &AppConfig,
    options_only: bool,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<()> {
    let analysis = analytics::analyze_path(
        file,
        LoadMode::Lenient,
        today,
        &cfg.analysis.derive_config(),
    )
    .with_context(|| format!("analyzing {}", file.display()))?;
    print_warnings(&analysis.parse_report);

    let rows: Vec<DerivedPosition> = if options_only {
        analysis.options().cloned().collect()
    } else {
        analysis.positions
    };

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(&rows, file)?;
            println!("Wrote {} row(s) to {}", rows.len(), path.display());
        }
        None => print_table(&rows),
    }
    Ok(())
}

fn print_warnings(report: &ParseReport) {
    for err in &report.errors {
        eprintln!("  warning: {err}; using 0");
    }
}

fn opt(v: Option<f64>, prec: usize) -> String {
    v.map(|x| format!("{x:.prec$}")).unwrap_or_else(|| "-".to_string())
}

pub fn print_table(rows: &[DerivedPosition]) {
    println!("\n{}", "═".repeat(118));
    println!("  Positions");
    println!("{}", "═".repeat(118));
    println!(
        "  {:<22} {:>4} {:>9} {:>9} {:>9} {:>8} {:>8} {:>10} {:>6} {:>10}  {:<16}",
        "Label", "Type", "Last", "Bid", "Ask", "Spread", "Sprd%", "Value", "DTE", "Key Lvl", "Level Type",
    );
    println!("  {}", "-".repeat(112));
    for r in rows {
        println!(
            "  {:<22} {:>4} {:>9.2} {:>9.2} {:>9.2} {:>8.2} {:>8} {:>10.2} {:>6} {:>10}  {:<16}",
            r.label,
            r.row.instrument,
            r.row.last,
            r.row.bid,
            r.row.ask,
            r.spread,
            opt(r.spread_pct, 1),
            r.position_value,
            r.days_to_expiry.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
            opt(r.key_level, 2),
            r.level_type.map(|l| l.as_str()).unwrap_or("-"),
        );
    }
    println!("{}", "═".repeat(118));
    println!("  {} row(s)", rows.len());
}

/// Flat record for CSV export; the csv writer cannot serialize nested rows.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Symbol")]
    symbol: &'a str,
    #[serde(rename = "Type")]
    instrument: &'a str,
    #[serde(rename = "P/C")]
    put_call: &'a str,
    #[serde(rename = "Strike")]
    strike: f64,
    #[serde(rename = "Last")]
    last: f64,
    #[serde(rename = "Bid")]
    bid: f64,
    #[serde(rename = "Ask")]
    ask: f64,
    #[serde(rename = "Expiry")]
    expiry: &'a str,
    #[serde(rename = "Spread")]
    spread: f64,
    #[serde(rename = "Spread_Pct")]
    spread_pct: Option<f64>,
    #[serde(rename = "Position_Value")]
    position_value: f64,
    #[serde(rename = "Expiry_Date")]
    expiry_date: Option<NaiveDate>,
    #[serde(rename = "Days_To_Expiry")]
    days_to_expiry: Option<i64>,
    #[serde(rename = "Key_Level")]
    key_level: Option<f64>,
    #[serde(rename = "Level_Type")]
    level_type: &'a str,
    #[serde(rename = "Label")]
    label: &'a str,
}

/// Write derived rows as CSV with the original column names plus the
/// computed ones. Undefined values are left empty.
pub fn write_csv<W: Write>(rows: &[DerivedPosition], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(ExportRow {
            symbol: &r.row.symbol,
            instrument: &r.row.instrument,
            put_call: r.kind().map(|k| k.as_str()).unwrap_or(""),
            strike: r.row.strike,
            last: r.row.last,
            bid: r.row.bid,
            ask: r.row.ask,
            expiry: &r.row.expiry,
            spread: r.spread,
            spread_pct: r.spread_pct,
            position_value: r.position_value,
            expiry_date: r.expiry_date,
            days_to_expiry: r.days_to_expiry,
            key_level: r.key_level,
            level_type: r.level_type.map(|l| l.as_str()).unwrap_or(""),
            label: &r.label,
        })
        .context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

/// Entry point for the `payoff` command.
pub fn run_payoff(kind: OptionKind, strike: f64, spot: Option<f64>, steps: usize, cfg: &AppConfig) -> Result<()> {
    if !strike.is_finite() || strike <= 0.0 {
        anyhow::bail!("Strike must be a positive number, got {strike}");
    }
    let multiplier = cfg.analysis.contract_multiplier;
    print!("{}", render_payoff(kind, strike, spot, steps, multiplier));
    Ok(())
}

pub fn render_payoff(kind: OptionKind, strike: f64, spot: Option<f64>, steps: usize, multiplier: f64) -> String {
    let mut out = format!("Payoff for {} {strike} at expiry\n", kind_name(kind));
    if let Some(spot) = spot {
        let p = payoff_at(kind, strike, spot, multiplier);
        out.push_str(&format!(
            "  Spot {:.2}: intrinsic {:.2}, contract value {:.2}\n",
            p.spot, p.intrinsic, p.contract_value
        ));
    }
    out.push_str(&format!("  {:>10} {:>10} {:>12}\n", "Spot", "Intrinsic", "Contract"));
    for p in payoff_curve(kind, strike, steps, multiplier) {
        out.push_str(&format!(
            "  {:>10.2} {:>10.2} {:>12.2}\n",
            p.spot, p.intrinsic, p.contract_value
        ));
    }
    out
}

fn kind_name(kind: OptionKind) -> &'static str {
    match kind {
        OptionKind::Call => "call",
        OptionKind::Put => "put",
    }
}
