//! Load runtime configuration.
//!
//! Every section has defaults, so the file is optional and may be partial.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::{DeriveConfig, ExpiryConvention};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisCfg {
    pub contract_multiplier: f64,
    /// Rows listed under "high cost trades" in the text report.
    pub top_n: usize,
    /// Day of month a `YYYYMM` expiry stands for; unset means the third
    /// Friday.
    pub expiry_day: Option<u32>,
}

impl Default for AnalysisCfg {
    fn default() -> Self {
        Self {
            contract_multiplier: crate::analytics::derive::DEFAULT_CONTRACT_MULTIPLIER,
            top_n: 3,
            expiry_day: None,
        }
    }
}

impl AnalysisCfg {
    pub fn derive_config(&self) -> DeriveConfig {
        DeriveConfig {
            contract_multiplier: self.contract_multiplier,
            expiry: self.expiry_convention(),
        }
    }

    pub fn expiry_convention(&self) -> ExpiryConvention {
        match self.expiry_day {
            Some(day) => ExpiryConvention::DayOfMonth(day),
            None => ExpiryConvention::ThirdFriday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardCfg {
    pub host: String,
    pub port: u16,
    /// Intervals in the payoff curve.
    pub payoff_steps: usize,
    pub top_n: usize,
}

impl Default for DashboardCfg {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            payoff_steps: 100,
            top_n: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisCfg,
    pub dashboard: DashboardCfg,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        Self::from_yaml(&s).with_context(|| format!("parsing config at {}", path.display()))
    }

    pub fn from_yaml(s: &str) -> Result<Self> {
        // An empty document is a valid, all-default config.
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
