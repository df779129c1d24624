use crate::archive::ArchiveKind;
use crate::db::Purchase;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::utils::{kst_today, parse_date_safe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    pub product_id: i32,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: i32,
    pub purchase_date: Option<String>,
}

pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<PurchaseInput>,
) -> DomaeResult<Json<Purchase>> {
    let purchase_date = input
        .purchase_date
        .as_deref()
        .and_then(parse_date_safe)
        .unwrap_or_else(kst_today);

    let purchase: Purchase = sqlx::query_as(
        "INSERT INTO purchases (product_id, quantity, unit_price, purchase_date)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(input.product_id)
    .bind(input.quantity)
    .bind(input.unit_price)
    .bind(purchase_date)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(purchase))
}

pub async fn list_purchases(State(state): State<AppState>) -> DomaeResult<Json<Vec<Purchase>>> {
    let purchases =
        sqlx::query_as::<_, Purchase>("SELECT * FROM purchases ORDER BY purchase_date DESC")
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(purchases))
}

pub async fn get_product_purchases(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> DomaeResult<Json<Vec<Purchase>>> {
    let purchases = sqlx::query_as::<_, Purchase>(
        "SELECT * FROM purchases WHERE product_id = $1 ORDER BY purchase_date DESC",
    )
    .bind(product_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(purchases))
}

/// Purchases of a given year, routed to the live or archive table.
pub async fn list_purchases_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> DomaeResult<Json<Vec<Purchase>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::Purchases, year)
        .await?;

    let purchases = sqlx::query_as::<_, Purchase>(&format!(
        "SELECT * FROM {} WHERE EXTRACT(YEAR FROM purchase_date) = $1 ORDER BY purchase_date DESC",
        tables.table
    ))
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(purchases))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<i32>,
) -> DomaeResult<Json<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
        .bind(purchase_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Purchase not found".into()));
    }
    Ok(Json(serde_json::json!({ "detail": "Purchase deleted" })))
}
