use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/brands",
            post(commands::brand::create_brand).get(commands::brand::list_brands),
        )
        .route(
            "/api/brands/:brand_id",
            axum::routing::put(commands::brand::update_brand)
                .delete(commands::brand::delete_brand),
        )
        .route(
            "/api/brands/:brand_id/products",
            get(commands::brand::get_brand_products),
        )
}
