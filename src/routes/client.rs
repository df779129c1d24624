use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/clients",
            post(commands::client::create_client).get(commands::client::list_clients),
        )
        .route(
            "/api/clients/:client_id",
            get(commands::client::get_client)
                .put(commands::client::update_client)
                .delete(commands::client::delete_client),
        )
}
