use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::view::{DashboardSnapshot, ViewRequest};

// ── Request types ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    /// Session the client last saw; a mismatch means the file was replaced.
    pub session_id: Option<Uuid>,
    #[serde(flatten)]
    pub view: ViewRequest,
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Local>>,
    pub total_rows: usize,
    pub option_rows: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub session_id: Uuid,
    pub source_name: String,
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
}
