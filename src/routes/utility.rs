use crate::commands;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/utility/greet/:name", get(commands::utility::greet))
        .route(
            "/api/utility/schema/:table_name",
            get(commands::utility::debug_db_schema),
        )
}
