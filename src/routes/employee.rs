use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/employees",
            post(commands::employee::create_employee).get(commands::employee::list_employees),
        )
        .route(
            "/api/employees/:emp_id",
            get(commands::employee::get_employee)
                .put(commands::employee::update_employee)
                .delete(commands::employee::delete_employee),
        )
        .route(
            "/api/employees/:emp_id/clients",
            get(commands::employee::get_employee_clients).post(commands::employee::assign_client),
        )
        .route(
            "/api/employees/:emp_id/clients/:client_id",
            axum::routing::delete(commands::employee::release_client),
        )
        .route(
            "/api/employees/:emp_id/assignments",
            get(commands::employee::list_assignments),
        )
        .route(
            "/api/employees/:emp_id/fcm_token",
            post(commands::employee::save_fcm_token),
        )
        .route(
            "/api/employees/:emp_id/vehicle",
            get(commands::employee::get_vehicle).put(commands::employee::upsert_vehicle),
        )
}
