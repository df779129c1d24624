use crate::archive::ArchiveKind;
use crate::db::{FranchiseOrder, FranchiseOrderItem, Order};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::utils::{kst_now, parse_date_safe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseOrderInput {
    pub client_id: i32,
    pub order_date: String,
    #[serde(default)]
    pub shipment_round: i32,
    pub items: Vec<FranchiseItemInput>,
}

#[derive(Serialize)]
pub struct FranchiseOrderOut {
    #[serde(flatten)]
    pub order: FranchiseOrder,
    pub items: Vec<FranchiseOrderItem>,
}

/// Create a franchise order. A resubmission for the same client, date and
/// shipment round replaces the earlier one.
pub async fn create_franchise_order(
    State(state): State<AppState>,
    Json(input): Json<FranchiseOrderInput>,
) -> DomaeResult<Json<FranchiseOrderOut>> {
    let order_date = parse_date_safe(&input.order_date)
        .ok_or_else(|| DomaeError::Validation(format!("Invalid order date: {}", input.order_date)))?;

    let mut tx = state.pool.begin().await?;

    let existing: Option<(i32,)> = sqlx::query_as(
        "SELECT id FROM franchise_orders
         WHERE client_id = $1 AND order_date = $2 AND shipment_round = $3",
    )
    .bind(input.client_id)
    .bind(order_date)
    .bind(input.shipment_round)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some((old_id,)) = existing {
        sqlx::query("DELETE FROM franchise_order_items WHERE order_id = $1")
            .bind(old_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM franchise_orders WHERE id = $1")
            .bind(old_id)
            .execute(&mut *tx)
            .await?;
    }

    // The order is routed to whichever employee covers this client.
    let emp_id: Option<(i32,)> = sqlx::query_as(
        "SELECT employee_id FROM employee_clients
         WHERE client_id = $1 AND end_date IS NULL LIMIT 1",
    )
    .bind(input.client_id)
    .fetch_optional(&mut *tx)
    .await?;
    let emp_id = emp_id
        .map(|r| r.0)
        .ok_or_else(|| DomaeError::NotFound("담당 영업사원을 찾을 수 없습니다.".into()))?;

    let order: FranchiseOrder = sqlx::query_as(
        "INSERT INTO franchise_orders (client_id, employee_id, order_date, shipment_round)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(input.client_id)
    .bind(emp_id)
    .bind(order_date)
    .bind(input.shipment_round)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let row: FranchiseOrderItem = sqlx::query_as(
            "INSERT INTO franchise_order_items (order_id, product_id, quantity)
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .fetch_one(&mut *tx)
        .await?;
        items.push(row);
    }

    tx.commit().await?;
    Ok(Json(FranchiseOrderOut { order, items }))
}

pub async fn get_orders_by_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> DomaeResult<Json<Vec<FranchiseOrder>>> {
    let orders = sqlx::query_as::<_, FranchiseOrder>(
        "SELECT * FROM franchise_orders
         WHERE employee_id = $1 AND is_transferred = FALSE
         ORDER BY order_date DESC, shipment_round DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(orders))
}

pub async fn get_unread_orders(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> DomaeResult<Json<Vec<FranchiseOrder>>> {
    let orders = sqlx::query_as::<_, FranchiseOrder>(
        "SELECT * FROM franchise_orders
         WHERE employee_id = $1 AND is_transferred = FALSE AND is_read = FALSE
         ORDER BY order_date DESC, shipment_round DESC",
    )
    .bind(employee_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(orders))
}

pub async fn mark_order_read(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("UPDATE franchise_orders SET is_read = TRUE WHERE id = $1")
        .bind(order_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Franchise order not found".into()));
    }
    Ok(Json(json!({ "detail": "Order marked as read" })))
}

/// Turn a franchise order into a regular order with its items.
pub async fn transfer_franchise_order(
    State(state): State<AppState>,
    Path(franchise_order_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    let f_order: Option<FranchiseOrder> =
        sqlx::query_as("SELECT * FROM franchise_orders WHERE id = $1 FOR UPDATE")
            .bind(franchise_order_id)
            .fetch_optional(&mut *tx)
            .await?;

    let f_order = match f_order {
        Some(o) if !o.is_transferred => o,
        _ => {
            return Err(DomaeError::Validation(
                "유효하지 않거나 이미 전송된 주문입니다.".into(),
            ))
        }
    };

    let order: Order = sqlx::query_as(
        "INSERT INTO orders (client_id, employee_id, order_date, status, shipment_round)
         VALUES ($1, $2, $3, 'pending', $4) RETURNING *",
    )
    .bind(f_order.client_id)
    .bind(f_order.employee_id)
    .bind(
        f_order
            .order_date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(kst_now),
    )
    .bind(f_order.shipment_round)
    .fetch_one(&mut *tx)
    .await?;

    let items: Vec<FranchiseOrderItem> =
        sqlx::query_as("SELECT * FROM franchise_order_items WHERE order_id = $1 ORDER BY id")
            .bind(franchise_order_id)
            .fetch_all(&mut *tx)
            .await?;

    let mut total_amount = 0;
    for item in &items {
        let price: i32 = sqlx::query_scalar("SELECT default_price FROM products WHERE id = $1")
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, line_total)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(price)
        .bind(price * item.quantity)
        .execute(&mut *tx)
        .await?;
        total_amount += price * item.quantity;
    }

    sqlx::query("UPDATE orders SET total_amount = $1, updated_at = NOW() WHERE id = $2")
        .bind(total_amount)
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE franchise_orders SET is_transferred = TRUE WHERE id = $1")
        .bind(franchise_order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Json(json!({ "message": "주문 전송 완료", "order_id": order.id })))
}

/// Franchise orders of a given year, routed to the live or archive table.
pub async fn list_franchise_orders_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> DomaeResult<Json<Vec<FranchiseOrder>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::FranchiseOrders, year)
        .await?;

    let orders = sqlx::query_as::<_, FranchiseOrder>(&format!(
        "SELECT * FROM {} WHERE EXTRACT(YEAR FROM order_date) = $1 ORDER BY order_date DESC",
        tables.table
    ))
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(orders))
}
