use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(commands::product::create_product))
        .route(
            "/api/products/manage",
            get(commands::product::list_products_manage),
        )
        .route(
            "/api/products/public",
            get(commands::product::list_products_public),
        )
        .route(
            "/api/products/barcode/:barcode",
            get(commands::product::get_product_by_barcode),
        )
        .route(
            "/api/products/warehouse_stock",
            get(commands::product::get_warehouse_stock),
        )
        .route(
            "/api/products/cleanup_unused",
            post(commands::product::cleanup_unused_products),
        )
        .route(
            "/api/products/name/:product_name",
            delete(commands::product::delete_product_by_name),
        )
        .route(
            "/api/products/:product_id",
            put(commands::product::update_product).delete(commands::product::delete_product),
        )
        .route(
            "/api/products/:product_id/stock",
            put(commands::product::update_stock),
        )
        .route(
            "/api/products/:product_id/reserve",
            put(commands::product::reserve_stock),
        )
        .route(
            "/api/products/:product_id/cancel_reservation",
            put(commands::product::cancel_reservation),
        )
        .route(
            "/api/products/:product_id/purchase_prices",
            post(commands::product::create_purchase_price)
                .get(commands::product::list_purchase_prices),
        )
        .route(
            "/api/products/:product_id/purchase_prices/current",
            get(commands::product::get_purchase_price_at),
        )
}
