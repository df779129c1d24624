use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/company",
        get(commands::company::get_company_info).post(commands::company::save_company_info),
    )
}
