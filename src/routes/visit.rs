use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/client_visits",
            post(commands::visit::create_client_visit).get(commands::visit::list_client_visits),
        )
        .route(
            "/api/client_visits/year/:year",
            get(commands::visit::list_visits_by_year),
        )
        .route(
            "/api/client_visits/:visit_id",
            get(commands::visit::get_client_visit),
        )
}
