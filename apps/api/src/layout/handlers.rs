//! Axum route handlers for the stateless Layout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::blocks::ColumnId;
use crate::layout::budget::PageGeometry;
use crate::layout::run_layout_pass;
use crate::layout::LayoutResult;
use crate::models::cv::CvData;
use crate::models::params::TemplateParams;
use crate::state::AppState;
use crate::templates::images::ImageUrlCache;
use crate::templates::{template_for, TemplateId, ALL_TEMPLATES};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    #[serde(default)]
    pub cv: CvData,
    #[serde(default)]
    pub params: TemplateParams,
}

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub columns: Vec<ColumnId>,
    pub geometry: PageGeometry,
}

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<TemplateInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<TemplatesResponse> {
    let templates = ALL_TEMPLATES
        .iter()
        .map(|id| {
            let geometry = template_for(*id).geometry();
            TemplateInfo {
                id: *id,
                columns: geometry.columns.iter().map(|c| c.column).collect(),
                geometry,
            }
        })
        .collect();
    Json(TemplatesResponse { templates })
}

/// POST /api/v1/layout
///
/// One-shot layout pass. Nothing is kept: the image URL cache lives for this
/// request only.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResult>, AppError> {
    let images = ImageUrlCache::new(state.config.storage_public_url.clone());
    let result =
        run_layout_pass(state.surface.as_ref(), &request.cv, &request.params, &images).await?;
    Ok(Json(result))
}
