use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/employee_inventory/update",
            put(commands::inventory::update_employee_inventory),
        )
        .route(
            "/api/employee_inventory/:employee_id",
            get(commands::inventory::get_employee_inventory),
        )
}
