use crate::archive::ArchiveKind;
use crate::db::{Order, OrderItem};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::utils::kst_now;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: i32,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: i32,
    #[serde(default)]
    pub line_total: i32,
    #[serde(default)]
    pub incentive: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub client_id: i32,
    pub employee_id: i32,
    #[serde(default)]
    pub shipment_round: i32,
    pub items: Vec<OrderItemInput>,
}

#[derive(Serialize)]
pub struct OrderOut {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<OrderInput>,
) -> DomaeResult<Json<OrderOut>> {
    if input.items.is_empty() {
        return Err(DomaeError::Validation("주문 품목이 비어 있습니다.".into()));
    }

    let mut tx = state.pool.begin().await?;

    let order: Order = sqlx::query_as(
        "INSERT INTO orders (client_id, employee_id, order_date, status, shipment_round)
         VALUES ($1, $2, $3, 'pending', $4) RETURNING *",
    )
    .bind(input.client_id)
    .bind(input.employee_id)
    .bind(kst_now())
    .bind(input.shipment_round)
    .fetch_one(&mut *tx)
    .await?;

    let mut total_amount = 0;
    let mut items = Vec::with_capacity(input.items.len());
    for item in &input.items {
        total_amount += item.line_total;
        let row: OrderItem = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price, line_total, incentive)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.line_total)
        .bind(item.incentive)
        .fetch_one(&mut *tx)
        .await?;
        items.push(row);
    }

    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET total_amount = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(total_amount)
    .bind(order.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(OrderOut { order, items }))
}

pub async fn list_orders(State(state): State<AppState>) -> DomaeResult<Json<Vec<Order>>> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY order_date DESC")
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> DomaeResult<Json<OrderOut>> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Order not found".into()))?;

    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(OrderOut { order, items }))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> DomaeResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Order not found".into()));
    }

    tx.commit().await?;
    Ok(Json(json!({ "detail": "Order and items deleted" })))
}

/// Orders of a given year, routed to the live or archive table.
pub async fn list_orders_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> DomaeResult<Json<Vec<Order>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::Orders, year)
        .await?;

    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT * FROM {} WHERE EXTRACT(YEAR FROM order_date) = $1 ORDER BY order_date DESC",
        tables.table
    ))
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(orders))
}

/// Items of one order, wherever that order's year currently lives.
pub async fn get_order_items_by_year(
    State(state): State<AppState>,
    Path((year, order_id)): Path<(i32, i64)>,
) -> DomaeResult<Json<Vec<OrderItem>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::Orders, year)
        .await?;
    let items_table = tables
        .companion
        .as_deref()
        .ok_or_else(|| DomaeError::Internal("orders resolver has no item table".into()))?;

    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "SELECT * FROM {} WHERE order_id = $1 ORDER BY id",
        items_table
    ))
    .bind(order_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(items))
}
