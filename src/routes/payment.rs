use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/payments",
            post(commands::payment::create_payment).get(commands::payment::list_payments),
        )
        .route(
            "/api/payments/salary/:year/:month",
            get(commands::payment::calculate_salary),
        )
        .route(
            "/api/payments/:payment_id",
            get(commands::payment::get_payment)
                .put(commands::payment::update_payment)
                .delete(commands::payment::delete_payment),
        )
}
