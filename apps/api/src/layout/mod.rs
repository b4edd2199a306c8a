// Pagination engine: measure → balance → paginate → assemble.
// CPU-bound work runs inside tokio::task::spawn_blocking (see `pass`).

pub mod assembler;
pub mod balancer;
pub mod blocks;
pub mod budget;
pub mod fill;
pub mod font_metrics;
pub mod handlers;
pub mod measurer;
pub mod paginator;
pub mod pass;

use thiserror::Error;

use crate::layout::blocks::ColumnId;

// Re-export the API consumed by handlers and sessions.
pub use measurer::{metric_table_surface, MeasurementSurface};
pub use pass::{run_layout_pass, LayoutResult, PassTracker};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Measurement surface is not ready")]
    SurfaceNotReady,

    #[error("Measurement surface closed before becoming ready")]
    SurfaceClosed,

    #[error("Template has no geometry for the {0:?} column")]
    MissingColumn(ColumnId),
}
