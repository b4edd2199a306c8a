pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::layout::handlers as layout;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless layout
        .route("/api/v1/templates", get(layout::handle_list_templates))
        .route("/api/v1/layout", post(layout::handle_layout))
        // Preview sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id/layout",
            post(sessions::handle_session_layout).get(sessions::handle_get_session_layout),
        )
        .route("/api/v1/sessions/:id", delete(sessions::handle_delete_session))
        .with_state(state)
}
