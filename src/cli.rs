use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use portfolio_lens::OptionKind;

/// Inspect an options portfolio export (CSV or Excel): one-shot report,
/// derived-column table, payoff curves, and an interactive dashboard.
#[derive(Parser)]
#[command(name = "portfolio-lens", version, about)]
pub struct Cli {
    /// YAML config file (all settings optional)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the portfolio report; any bad file or cell aborts the run
    Report {
        /// Path to the CSV or Excel export
        file: PathBuf,

        /// Number of wide-spread trades to list
        #[arg(long)]
        top: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every row with its derived columns, or export them as CSV
    Table {
        /// Path to the CSV or Excel export
        file: PathBuf,

        /// Only rows with Type == OPT
        #[arg(long)]
        options_only: bool,

        /// Write CSV to this file instead of printing a table
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the expiry payoff of one option leg
    Payoff {
        /// Strike price
        #[arg(long)]
        strike: f64,

        /// Option type
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Spot price to evaluate
        #[arg(long)]
        spot: Option<f64>,

        /// Intervals between 0.5x and 1.5x strike
        #[arg(long, default_value = "10")]
        steps: usize,
    },

    /// Serve the interactive dashboard
    Serve {
        /// File to load at start-up (more can be uploaded from the page)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Call,
    Put,
}

impl From<KindArg> for OptionKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Call => OptionKind::Call,
            KindArg::Put => OptionKind::Put,
        }
    }
}
