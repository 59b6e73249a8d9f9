use axum::Json;
use axum::extract::State;
use chrono::Local;
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::api::types::{ViewQuery, ViewResponse};
use crate::view::build_snapshot;

/// Recompute the whole dashboard for the given control values.
pub async fn view(
    State(state): State<AppState>,
    Json(query): Json<ViewQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let inner = state.inner.read().await;
    let session = inner
        .session
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("no portfolio file loaded".to_string()))?;

    if let Some(id) = query.session_id {
        if id != session.id {
            return Err(ApiError::Conflict(format!(
                "session {id} was replaced by {}; reload the page",
                session.id
            )));
        }
    }

    let today = Local::now().date_naive();
    let snapshot = build_snapshot(&session.rows, &query.view, today, &inner.view_options());
    debug!(
        "View recomputed: {} of {} row(s) shown",
        snapshot.table.len(),
        session.rows.len()
    );

    Ok(Json(ViewResponse {
        session_id: session.id,
        source_name: session.source_name.clone(),
        snapshot,
    }))
}
