pub mod derive;
pub mod payoff;
pub mod summary;

use std::path::Path;

use chrono::NaiveDate;

pub use derive::{DeriveConfig, ExpiryConvention, derive, derive_all, parse_expiry};
pub use payoff::{PayoffPoint, intrinsic, payoff_at, payoff_curve};
pub use summary::{PortfolioSummary, top_by_spread};

use crate::data::{self, AnalysisError, LoadMode, ParseReport};
use crate::model::DerivedPosition;

/// Result of running the full pipeline on one file.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub positions: Vec<DerivedPosition>,
    pub parse_report: ParseReport,
}

impl Analysis {
    pub fn options(&self) -> impl Iterator<Item = &DerivedPosition> {
        self.positions.iter().filter(|p| p.is_option())
    }
}

/// Load, clean and derive a file in one call.
pub fn analyze_path(
    path: &Path,
    mode: LoadMode,
    today: NaiveDate,
    cfg: &DeriveConfig,
) -> Result<Analysis, AnalysisError> {
    let (rows, parse_report) = data::load_positions(path, mode)?;
    Ok(Analysis {
        positions: derive_all(&rows, today, cfg),
        parse_report,
    })
}
