//! Axum route handlers for layout sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::handlers::LayoutRequest;
use crate::sessions::{CommittedLayout, PassOutcome};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), AppError> {
    let session = state.sessions.create().await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    ))
}

/// POST /api/v1/sessions/:id/layout
///
/// Triggers a pass on the session. A pass overtaken by a newer one answers
/// `{"status": "superseded"}` with 200 and commits nothing.
pub async fn handle_session_layout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<PassOutcome>, AppError> {
    let session = state.sessions.get(session_id).await?;
    let outcome = session
        .run_pass(state.surface.as_ref(), &request.cv, &request.params)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/sessions/:id/layout
pub async fn handle_get_session_layout(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<CommittedLayout>, AppError> {
    let session = state.sessions.get(session_id).await?;
    session.committed().await.map(Json).ok_or_else(|| {
        AppError::NotFound(format!("No layout committed yet for session {session_id}"))
    })
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
