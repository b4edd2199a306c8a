use std::sync::Arc;

use crate::config::Config;
use crate::layout::MeasurementSurface;
use crate::sessions::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where text gets measured. Default: the static font metric tables.
    pub surface: Arc<dyn MeasurementSurface>,
    pub sessions: SessionRegistry,
}
