use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::data::{self, AnalysisError, LoadMode, ParseReport};
use crate::model::PositionRow;
use crate::view::ViewOptions;

#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
}

pub struct AppStateInner {
    pub session: Option<Session>,
    /// Why the last load attempt failed, shown inline by the page.
    pub last_error: Option<String>,
    pub config: AppConfig,
}

/// One loaded file. Replaced wholesale on every upload.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub source_name: String,
    pub rows: Vec<PositionRow>,
    pub parse_report: ParseReport,
    pub loaded_at: DateTime<Local>,
}

impl Session {
    /// Lenient load: broken cells become zeros and are listed in the
    /// parse report instead of failing the upload.
    pub fn load(name: &str, bytes: Vec<u8>) -> Result<Self, AnalysisError> {
        let table = data::load_bytes(name, bytes, LoadMode::Lenient)?;
        let (rows, parse_report) = data::positions_from_table(&table)?;
        Ok(Self {
            id: Uuid::new_v4(),
            source_name: name.to_string(),
            rows,
            parse_report,
            loaded_at: Local::now(),
        })
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner {
                session: None,
                last_error: None,
                config,
            })),
        }
    }
}

impl AppStateInner {
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            derive: self.config.analysis.derive_config(),
            top_n: self.config.dashboard.top_n,
            payoff_steps: self.config.dashboard.payoff_steps,
        }
    }
}
