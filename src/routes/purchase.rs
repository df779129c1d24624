use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/purchases",
            post(commands::purchase::create_purchase).get(commands::purchase::list_purchases),
        )
        .route(
            "/api/purchases/year/:year",
            get(commands::purchase::list_purchases_by_year),
        )
        .route(
            "/api/purchases/:purchase_id",
            delete(commands::purchase::delete_purchase),
        )
        .route(
            "/api/products/:product_id/purchases",
            get(commands::purchase::get_product_purchases),
        )
}
