use crate::db::Payment;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::utils::{kst_now, parse_datetime_safe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub client_id: i32,
    pub payment_date: Option<String>,
    #[serde(default)]
    pub amount: i32,
    pub payment_method: Option<String>,
    pub note: Option<String>,
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(input): Json<PaymentInput>,
) -> DomaeResult<Json<Payment>> {
    let payment_date = input
        .payment_date
        .as_deref()
        .and_then(parse_datetime_safe)
        .unwrap_or_else(kst_now);

    let payment: Payment = sqlx::query_as(
        "INSERT INTO payments (client_id, payment_date, amount, payment_method, note)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(input.client_id)
    .bind(payment_date)
    .bind(input.amount)
    .bind(
        input
            .payment_method
            .clone()
            .unwrap_or_else(|| "cash".to_string()),
    )
    .bind(&input.note)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(payment))
}

pub async fn list_payments(State(state): State<AppState>) -> DomaeResult<Json<Vec<Payment>>> {
    let payments =
        sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY payment_date DESC")
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(payments))
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> DomaeResult<Json<Payment>> {
    let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
        .bind(payment_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Payment record not found".into()))?;
    Ok(Json(payment))
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
    Json(input): Json<PaymentInput>,
) -> DomaeResult<Json<Payment>> {
    let payment_date = input
        .payment_date
        .as_deref()
        .and_then(parse_datetime_safe)
        .unwrap_or_else(kst_now);

    let payment = sqlx::query_as::<_, Payment>(
        "UPDATE payments SET
            client_id = $1, payment_date = $2, amount = $3,
            payment_method = $4, note = $5, updated_at = NOW()
         WHERE id = $6 RETURNING *",
    )
    .bind(input.client_id)
    .bind(payment_date)
    .bind(input.amount)
    .bind(
        input
            .payment_method
            .clone()
            .unwrap_or_else(|| "cash".to_string()),
    )
    .bind(&input.note)
    .bind(payment_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("Payment record not found".into()))?;
    Ok(Json(payment))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<i64>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM payments WHERE id = $1")
        .bind(payment_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Payment record not found".into()));
    }
    Ok(Json(json!({ "detail": "Payment record deleted" })))
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeMonthlyTotal {
    emp_name: String,
    total_sales: Option<i64>,
}

/// Per-employee sales totals for a month, as { name: amount }.
pub async fn calculate_salary(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, i32)>,
) -> DomaeResult<Json<Map<String, Value>>> {
    if !(1..=12).contains(&month) {
        return Err(DomaeError::Validation(format!("잘못된 월입니다: {}", month)));
    }

    let rows: Vec<EmployeeMonthlyTotal> = sqlx::query_as(
        "SELECT
            e.name AS emp_name,
            SUM(p.default_price::BIGINT * s.quantity) AS total_sales
         FROM sales_records s
         JOIN employees e ON e.id = s.employee_id
         JOIN products p ON p.id = s.product_id
         WHERE s.sale_date >= make_date($1, $2, 1)
         AND s.sale_date < make_date($1, $2, 1) + INTERVAL '1 month'
         GROUP BY e.name",
    )
    .bind(year)
    .bind(month)
    .fetch_all(&state.pool)
    .await?;

    let mut output = Map::new();
    for row in rows {
        output.insert(row.emp_name, json!(row.total_sales.unwrap_or(0)));
    }
    Ok(Json(output))
}
