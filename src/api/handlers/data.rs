use axum::Json;
use axum::extract::{Multipart, State};
use tracing::{info, warn};

use crate::api::error::ApiError;
use crate::api::state::{AppState, AppStateInner, Session};
use crate::api::types::SessionInfo;

/// Replace the session with an uploaded file.
///
/// On failure the previous session stays loaded and the error is returned
/// to the page.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionInfo>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("multipart error: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("reading {name}: {e}")))?;
        upload = Some((name, bytes.to_vec()));
        break;
    }
    let (name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("no file in upload".to_string()))?;

    let loaded = tokio::task::spawn_blocking({
        let name = name.clone();
        move || Session::load(&name, bytes)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("task join error: {e}")))?;

    let mut inner = state.inner.write().await;
    match loaded {
        Ok(session) => {
            info!(
                "Session {} loaded from {} ({} rows)",
                session.id,
                name,
                session.rows.len()
            );
            inner.session = Some(session);
            inner.last_error = None;
            Ok(Json(session_info(&inner)))
        }
        Err(e) => {
            warn!("Upload of {name} rejected: {e}");
            inner.last_error = Some(e.to_string());
            Err(e.into())
        }
    }
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionInfo> {
    let inner = state.inner.read().await;
    Json(session_info(&inner))
}

pub fn session_info(inner: &AppStateInner) -> SessionInfo {
    match &inner.session {
        Some(s) => SessionInfo {
            loaded: true,
            session_id: Some(s.id),
            source_name: Some(s.source_name.clone()),
            loaded_at: Some(s.loaded_at),
            total_rows: s.rows.len(),
            option_rows: s.rows.iter().filter(|r| r.is_option()).count(),
            warnings: s.parse_report.errors.iter().map(|e| e.to_string()).collect(),
            error: inner.last_error.clone(),
        },
        None => SessionInfo {
            loaded: false,
            session_id: None,
            source_name: None,
            loaded_at: None,
            total_rows: 0,
            option_rows: 0,
            warnings: Vec::new(),
            error: inner.last_error.clone(),
        },
    }
}
