use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use portfolio_lens::{AppConfig, api, report};

mod cli;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so report output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        cli::Command::Report { file, top, json } => {
            if let Some(n) = top {
                config.analysis.top_n = n;
            }
            report::run(&file, &config, json, today)
        }
        cli::Command::Table {
            file,
            options_only,
            output,
        } => report::run_table(&file, &config, options_only, output.as_deref(), today),
        cli::Command::Payoff {
            strike,
            kind,
            spot,
            steps,
        } => report::run_payoff(kind.into(), strike, spot, steps, &config),
        cli::Command::Serve { file, host, port } => {
            if let Some(host) = host {
                config.dashboard.host = host;
            }
            if let Some(port) = port {
                config.dashboard.port = port;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(api::serve(config, file.as_deref()))
        }
    }
}
