use std::fmt;

use serde::{Deserialize, Serialize};

/// Put/call flag of an option row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Accepts `C`/`CALL` and `P`/`PUT`, case-insensitive. Anything else is
    /// an unknown flag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" | "CALL" => Some(Self::Call),
            "P" | "PUT" => Some(Self::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "C",
            Self::Put => "P",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One holding from the portfolio export, after price cleanup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRow {
    pub symbol: String,
    /// Instrument type as exported (`OPT`, `STK`, ...).
    pub instrument: String,
    pub put_call: Option<OptionKind>,
    pub strike: f64,
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    /// Raw expiry text, normally `YYYYMM`.
    pub expiry: String,
}

impl PositionRow {
    pub fn is_option(&self) -> bool {
        self.instrument.trim().eq_ignore_ascii_case("OPT")
    }
}
