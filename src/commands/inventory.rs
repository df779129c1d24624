use crate::db::EmployeeInventory;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn get_employee_inventory(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> DomaeResult<Json<Vec<EmployeeInventory>>> {
    let inventory = sqlx::query_as::<_, EmployeeInventory>(
        "SELECT * FROM employee_inventory WHERE employee_id = $1 ORDER BY product_id",
    )
    .bind(employee_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(inventory))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdateInput {
    pub employee_id: i32,
    pub items: Vec<InventoryItemInput>,
}

/// Set vehicle stock levels for an employee. Unknown products are added.
pub async fn update_employee_inventory(
    State(state): State<AppState>,
    Json(input): Json<InventoryUpdateInput>,
) -> DomaeResult<Json<Value>> {
    if input.items.is_empty() {
        return Err(DomaeError::Validation("재고 항목이 비어 있습니다.".into()));
    }

    let mut tx = state.pool.begin().await?;

    for item in &input.items {
        sqlx::query(
            "INSERT INTO employee_inventory (employee_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (employee_id, product_id)
             DO UPDATE SET quantity = EXCLUDED.quantity",
        )
        .bind(input.employee_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Json(json!({ "message": "차량 재고 업데이트 완료" })))
}
