use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/orders",
            post(commands::order::create_order).get(commands::order::list_orders),
        )
        .route(
            "/api/orders/year/:year",
            get(commands::order::list_orders_by_year),
        )
        .route(
            "/api/orders/year/:year/:order_id/items",
            get(commands::order::get_order_items_by_year),
        )
        .route(
            "/api/orders/:order_id",
            get(commands::order::get_order).delete(commands::order::delete_order),
        )
}
