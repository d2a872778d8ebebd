pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::services::ServeDir;

use crate::portfolio::handlers;
use crate::state::AppState;

/// Allowance for the text fields sent alongside an upload.
const FORM_HEADROOM_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_bytes + FORM_HEADROOM_BYTES;
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_home))
        .route("/design", get(handlers::handle_design))
        .route("/template/:n", get(handlers::handle_template))
        .route(
            "/template/:n/form",
            get(handlers::handle_form).post(handlers::handle_submit),
        )
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
