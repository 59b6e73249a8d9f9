use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::position::{OptionKind, PositionRow};

/// What the key level of a position means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelType {
    #[serde(rename = "Assignment Price")]
    AssignmentPrice,
    #[serde(rename = "Break-Even Price")]
    BreakEvenPrice,
}

impl LevelType {
    pub fn for_kind(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Put => Self::AssignmentPrice,
            OptionKind::Call => Self::BreakEvenPrice,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignmentPrice => "Assignment Price",
            Self::BreakEvenPrice => "Break-Even Price",
        }
    }
}

/// A position row together with every computed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedPosition {
    /// Position of the row in the source file (0-based).
    pub index: usize,
    #[serde(flatten)]
    pub row: PositionRow,
    pub spread: f64,
    /// `None` when ask is zero.
    pub spread_pct: Option<f64>,
    pub position_value: f64,
    pub expiry_date: Option<NaiveDate>,
    pub days_to_expiry: Option<i64>,
    pub key_level: Option<f64>,
    pub level_type: Option<LevelType>,
    pub label: String,
}

impl DerivedPosition {
    pub fn is_option(&self) -> bool {
        self.row.is_option()
    }

    pub fn kind(&self) -> Option<OptionKind> {
        self.row.put_call
    }
}
