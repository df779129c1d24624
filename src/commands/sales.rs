use crate::archive::ArchiveKind;
use crate::db::{MonthlySales, SalesRecord};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::parse_date_safe;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecordInput {
    pub employee_id: Option<i32>,
    pub client_id: i32,
    pub product_id: i32,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: i32,
    #[serde(default)]
    pub return_amount: i32,
    #[serde(default)]
    pub subsidy_amount: i32,
    #[serde(default)]
    pub total_amount: i32,
    pub sale_date: String,
}

pub async fn create_sales_record(
    State(state): State<AppState>,
    Json(input): Json<SalesRecordInput>,
) -> DomaeResult<Json<SalesRecord>> {
    let sale_date = parse_date_safe(&input.sale_date)
        .ok_or_else(|| DomaeError::Validation(format!("Invalid sale date: {}", input.sale_date)))?;

    let record: SalesRecord = sqlx::query_as(
        "INSERT INTO sales_records (
            employee_id, client_id, product_id, quantity, unit_price,
            return_amount, subsidy_amount, total_amount, sale_date
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(input.employee_id)
    .bind(input.client_id)
    .bind(input.product_id)
    .bind(input.quantity)
    .bind(input.unit_price)
    .bind(input.return_amount)
    .bind(input.subsidy_amount)
    .bind(input.total_amount)
    .bind(sale_date)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(record))
}

pub async fn list_sales_records(
    State(state): State<AppState>,
) -> DomaeResult<Json<Vec<SalesRecord>>> {
    let records =
        sqlx::query_as::<_, SalesRecord>("SELECT * FROM sales_records ORDER BY sale_date DESC")
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(records))
}

pub async fn get_sales_by_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> DomaeResult<Json<Vec<SalesRecord>>> {
    let records = sqlx::query_as::<_, SalesRecord>(
        "SELECT * FROM sales_records WHERE employee_id = $1 ORDER BY sale_date DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(records))
}

pub async fn get_sales_by_date(
    State(state): State<AppState>,
    Path(sale_date): Path<NaiveDate>,
) -> DomaeResult<Json<Vec<SalesRecord>>> {
    let records = sqlx::query_as::<_, SalesRecord>(
        "SELECT * FROM sales_records WHERE sale_date = $1 ORDER BY id",
    )
    .bind(sale_date)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(records))
}

pub async fn delete_sales_record(
    State(state): State<AppState>,
    Path(sales_id): Path<i64>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM sales_records WHERE id = $1")
        .bind(sales_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Sales record not found".into()));
    }
    Ok(Json(json!({ "detail": "Sales record deleted" })))
}

/// Sales records of a given year, routed to the live or archive table.
pub async fn list_sales_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> DomaeResult<Json<Vec<SalesRecord>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::SalesRecords, year)
        .await?;

    let records = sqlx::query_as::<_, SalesRecord>(&format!(
        "SELECT * FROM {} WHERE EXTRACT(YEAR FROM sale_date) = $1 ORDER BY sale_date DESC",
        tables.table
    ))
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(records))
}

/// Re-aggregate sales_records into monthly_sales for one (year, month).
/// Existing rows for the month are dropped first so re-runs are safe.
pub async fn aggregate_monthly_sales(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
) -> DomaeResult<Json<Value>> {
    if !(1..=12).contains(&month) {
        return Err(DomaeError::Validation(format!("잘못된 월입니다: {}", month)));
    }

    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM monthly_sales WHERE year = $1 AND month = $2")
        .bind(year)
        .bind(month)
        .execute(&mut *tx)
        .await?;

    let inserted = sqlx::query(
        "INSERT INTO monthly_sales (client_id, employee_id, year, month, total_sales, total_returns, total_subsidy)
         SELECT
             s.client_id,
             s.employee_id,
             $1,
             $2,
             COALESCE(SUM(s.quantity::BIGINT * p.default_price), 0),
             COALESCE(SUM(s.return_amount), 0),
             COALESCE(SUM(s.subsidy_amount), 0)
         FROM sales_records s
         JOIN products p ON p.id = s.product_id
         WHERE EXTRACT(YEAR FROM s.sale_date) = $1
         AND EXTRACT(MONTH FROM s.sale_date) = $2
         GROUP BY s.client_id, s.employee_id",
    )
    .bind(year)
    .bind(month)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    tracing::info!("aggregated {} monthly sales rows for {}-{:02}", inserted, year, month);
    Ok(Json(json!({
        "message": format!("{}-{:02} 매출 집계 완료", year, month),
        "rows": inserted,
    })))
}

pub async fn list_monthly_sales(
    State(state): State<AppState>,
) -> DomaeResult<Json<Vec<MonthlySales>>> {
    let rows = sqlx::query_as::<_, MonthlySales>(
        "SELECT * FROM monthly_sales ORDER BY year DESC, month DESC",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(rows))
}

pub async fn get_client_yearly_sales(
    State(state): State<AppState>,
    Path((client_id, year)): Path<(i32, i32)>,
) -> DomaeResult<Json<Vec<MonthlySales>>> {
    let rows = sqlx::query_as::<_, MonthlySales>(
        "SELECT * FROM monthly_sales WHERE client_id = $1 AND year = $2 ORDER BY month",
    )
    .bind(client_id)
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(rows))
}

pub async fn get_employee_yearly_sales(
    State(state): State<AppState>,
    Path((employee_id, year)): Path<(i32, i32)>,
) -> DomaeResult<Json<Vec<MonthlySales>>> {
    let rows = sqlx::query_as::<_, MonthlySales>(
        "SELECT * FROM monthly_sales WHERE employee_id = $1 AND year = $2 ORDER BY month",
    )
    .bind(employee_id)
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(rows))
}
