use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/lents",
            post(commands::lent::create_lent).get(commands::lent::list_lents),
        )
        .route(
            "/api/lents/:lent_id",
            get(commands::lent::get_lent).delete(commands::lent::delete_lent),
        )
}
