//! Layout pass: runs the whole pipeline for one CV and template.
//!
//! # Architecture
//! - `run_layout_pass` is the async entry point. It generates blocks, awaits
//!   the measurement surface, then runs `compute_layout` via `spawn_blocking`.
//! - `compute_layout` is the synchronous core: measure, balance, paginate,
//!   assemble. Same inputs, same pages.
//! - `PassTracker` hands out generations so a caller can drop the result of a
//!   pass that was superseded while it ran.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::layout::assembler::{assemble_pages, Page};
use crate::layout::balancer::{balance_columns, BalanceDecision};
use crate::layout::blocks::{ColumnId, ContentBlock, MeasuredBlock};
use crate::layout::budget::{PageBudget, PageGeometry};
use crate::layout::fill::FillVerdict;
use crate::layout::measurer::{BlockMeasurer, MeasurementSurface};
use crate::layout::paginator::paginate;
use crate::layout::LayoutError;
use crate::models::cv::CvData;
use crate::models::params::TemplateParams;
use crate::templates::images::ImageUrlCache;
use crate::templates::render_context::RenderContext;
use crate::templates::{template_for, TemplateBlocks, TemplateId};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// A complete page list plus what produced it. Replaced wholesale on every pass.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutResult {
    pub template: TemplateId,
    pub params: TemplateParams,
    pub geometry: PageGeometry,
    pub budget: PageBudget,
    pub page_count: usize,
    /// Only for templates with a relocatable section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceDecision>,
    pub pages: Vec<Page>,
}

/// Output of the synchronous core.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub budget: PageBudget,
    pub balance: Option<BalanceDecision>,
    pub pages: Vec<Page>,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Runs one layout pass.
///
/// Steps:
/// 1. Validate params and generate blocks for the template
/// 2. Await the measurement surface's ready signal (no guessing on zero heights)
/// 3. `spawn_blocking` → `compute_layout`
pub async fn run_layout_pass(
    surface: &dyn MeasurementSurface,
    cv: &CvData,
    params: &TemplateParams,
    images: &ImageUrlCache,
) -> Result<LayoutResult, AppError> {
    params.validate()?;

    let template = template_for(params.template);
    let geometry = template.geometry();
    let blocks = template.generate(cv, &RenderContext::new(params, images));

    surface.ready().await?;
    let measurer = BlockMeasurer::new(surface)?;

    let task_geometry = geometry.clone();
    let plan = tokio::task::spawn_blocking(move || {
        compute_layout(&measurer, &task_geometry, blocks)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout pass: {e}")))??;

    let overflowing: Vec<usize> = plan
        .pages
        .iter()
        .filter(|page| page.overflows())
        .map(|page| page.index)
        .collect();
    if !overflowing.is_empty() {
        let oversized: Vec<&str> = plan
            .pages
            .iter()
            .flat_map(|page| page.slots.iter())
            .filter(|slot| slot.fill.verdict == FillVerdict::Overflow)
            .flat_map(|slot| slot.blocks.iter().map(MeasuredBlock::key))
            .collect();
        warn!(
            pages = ?overflowing,
            blocks = ?oversized,
            "Layout pass: oversized blocks overflow their pages"
        );
    }

    info!(
        template = ?template.id(),
        pages = plan.pages.len(),
        relocated = plan.balance.as_ref().map(|b| b.relocated),
        "Layout pass complete"
    );

    Ok(LayoutResult {
        template: template.id(),
        params: params.clone(),
        geometry,
        budget: plan.budget,
        page_count: plan.pages.len(),
        balance: plan.balance,
        pages: plan.pages,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Synchronous core (runs inside spawn_blocking)
// ────────────────────────────────────────────────────────────────────────────

/// Measures every block at the width of the column it will occupy, makes the
/// one balance decision, paginates each column and zips the pages.
pub fn compute_layout(
    measurer: &BlockMeasurer,
    geometry: &PageGeometry,
    blocks: TemplateBlocks,
) -> Result<LayoutPlan, LayoutError> {
    let header = blocks
        .header
        .map(|header| measurer.measure(header, geometry.content_width()));
    let header_height = header.as_ref().map_or(0.0, |h| h.height);
    let budget = PageBudget::new(geometry, header_height);

    let relocation = blocks.relocation;
    let mut relocatable_at_target: Vec<MeasuredBlock> = Vec::new();
    let mut columns: Vec<(ColumnId, Vec<MeasuredBlock>)> = Vec::with_capacity(blocks.columns.len());

    for (column, column_blocks) in blocks.columns {
        let width = column_width(geometry, column)?;
        if let Some(relocation) = relocation.filter(|r| r.from == column) {
            let target_width = column_width(geometry, relocation.to)?;
            let section: Vec<ContentBlock> = column_blocks
                .iter()
                .filter(|b| b.section == relocation.section)
                .cloned()
                .collect();
            relocatable_at_target = measurer.measure_all(section, target_width);
        }
        columns.push((column, measurer.measure_all(column_blocks, width)));
    }

    let balance = match relocation {
        Some(relocation) => {
            let from = column_index(&columns, relocation.from)?;
            let to = column_index(&columns, relocation.to)?;
            let source = std::mem::take(&mut columns[from].1);
            let target = std::mem::take(&mut columns[to].1);
            let balanced = balance_columns(
                source,
                target,
                relocation.section,
                relocatable_at_target,
                budget.first_page,
            );
            columns[from].1 = balanced.sidebar;
            columns[to].1 = balanced.main;
            Some(balanced.decision)
        }
        None => None,
    };

    let paginated = columns
        .into_iter()
        .map(|(column, column_blocks)| (column, paginate(column_blocks, |i| budget.for_page(i))))
        .collect();

    Ok(LayoutPlan {
        budget,
        balance,
        pages: assemble_pages(paginated, header, &budget),
    })
}

fn column_width(geometry: &PageGeometry, column: ColumnId) -> Result<f32, LayoutError> {
    geometry
        .column(column)
        .map(|c| c.width)
        .ok_or(LayoutError::MissingColumn(column))
}

fn column_index(
    columns: &[(ColumnId, Vec<MeasuredBlock>)],
    column: ColumnId,
) -> Result<usize, LayoutError> {
    columns
        .iter()
        .position(|(id, _)| *id == column)
        .ok_or(LayoutError::MissingColumn(column))
}

// ────────────────────────────────────────────────────────────────────────────
// Pass generations
// ────────────────────────────────────────────────────────────────────────────

/// Hands out increasing generations; only the latest one is current.
#[derive(Debug, Default)]
pub struct PassTracker {
    latest: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket {
    pub generation: u64,
}

impl PassTracker {
    /// Starts a pass, superseding every earlier one.
    pub fn begin(&self) -> PassTicket {
        PassTicket {
            generation: self.latest.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
