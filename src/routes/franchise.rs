use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/franchise_orders",
            post(commands::franchise::create_franchise_order),
        )
        .route(
            "/api/franchise_orders/by_employee/:employee_id",
            get(commands::franchise::get_orders_by_employee),
        )
        .route(
            "/api/franchise_orders/unread/:employee_id",
            get(commands::franchise::get_unread_orders),
        )
        .route(
            "/api/franchise_orders/year/:year",
            get(commands::franchise::list_franchise_orders_by_year),
        )
        .route(
            "/api/franchise_orders/:order_id/read",
            post(commands::franchise::mark_order_read),
        )
        .route(
            "/api/franchise_orders/:order_id/transfer",
            post(commands::franchise::transfer_franchise_order),
        )
}
