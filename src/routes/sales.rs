use crate::commands;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/sales",
            post(commands::sales::create_sales_record).get(commands::sales::list_sales_records),
        )
        .route(
            "/api/sales/employee/:employee_id",
            get(commands::sales::get_sales_by_employee),
        )
        .route(
            "/api/sales/date/:sale_date",
            get(commands::sales::get_sales_by_date),
        )
        .route(
            "/api/sales/year/:year",
            get(commands::sales::list_sales_by_year),
        )
        .route(
            "/api/sales/:sales_id",
            delete(commands::sales::delete_sales_record),
        )
        .route(
            "/api/monthly_sales",
            get(commands::sales::list_monthly_sales),
        )
        .route(
            "/api/monthly_sales/aggregate/:year/:month",
            post(commands::sales::aggregate_monthly_sales),
        )
        .route(
            "/api/monthly_sales/client/:client_id/:year",
            get(commands::sales::get_client_yearly_sales),
        )
        .route(
            "/api/monthly_sales/employee/:employee_id/:year",
            get(commands::sales::get_employee_yearly_sales),
        )
}
