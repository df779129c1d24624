use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/archive/status",
            get(commands::archive::archive_status),
        )
        .route(
            "/api/admin/archive/invalidate",
            post(commands::archive::invalidate_registry),
        )
        .route(
            "/api/admin/archive/:kind/:year",
            post(commands::archive::run_archive),
        )
}
