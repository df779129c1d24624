use crate::db::{Product, ProductPurchasePrice};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::utils::{kst_today, parse_date_safe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub brand_id: i32,
    pub product_name: String,
    #[serde(default)]
    pub default_price: i32,
    #[serde(default)]
    pub incentive: i32,
    #[serde(default)]
    pub stock: i32,
    pub is_active: Option<i32>,
    pub box_quantity: Option<i32>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_fixed_price: bool,
    #[serde(default)]
    pub barcodes: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub brand_id: Option<i32>,
    pub name: Option<String>,
    pub barcode: Option<String>,
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> DomaeResult<Json<Product>> {
    let mut tx = state.pool.begin().await?;

    let product: Product = sqlx::query_as(
        "INSERT INTO products (
            brand_id, product_name, default_price, incentive, stock,
            is_active, box_quantity, category, is_fixed_price
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(input.brand_id)
    .bind(&input.product_name)
    .bind(input.default_price)
    .bind(input.incentive)
    .bind(input.stock)
    .bind(input.is_active.unwrap_or(1))
    .bind(input.box_quantity.unwrap_or(1))
    .bind(&input.category)
    .bind(input.is_fixed_price)
    .fetch_one(&mut *tx)
    .await?;

    for code in &input.barcodes {
        if !code.trim().is_empty() {
            sqlx::query("INSERT INTO product_barcodes (product_id, barcode) VALUES ($1, $2)")
                .bind(product.id)
                .bind(code.trim())
                .execute(&mut *tx)
                .await?;
        }
    }

    tx.commit().await?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> DomaeResult<Json<Product>> {
    let mut tx = state.pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET
            brand_id = $1, product_name = $2, default_price = $3, incentive = $4,
            stock = $5, is_active = $6, box_quantity = $7, category = $8,
            is_fixed_price = $9, updated_at = NOW()
         WHERE id = $10 RETURNING *",
    )
    .bind(input.brand_id)
    .bind(&input.product_name)
    .bind(input.default_price)
    .bind(input.incentive)
    .bind(input.stock)
    .bind(input.is_active.unwrap_or(1))
    .bind(input.box_quantity.unwrap_or(1))
    .bind(&input.category)
    .bind(input.is_fixed_price)
    .bind(product_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DomaeError::NotFound("상품을 찾을 수 없습니다.".into()))?;

    // Barcodes are replaced wholesale when provided.
    if !input.barcodes.is_empty() {
        sqlx::query("DELETE FROM product_barcodes WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;
        for code in &input.barcodes {
            if !code.trim().is_empty() {
                sqlx::query("INSERT INTO product_barcodes (product_id, barcode) VALUES ($1, $2)")
                    .bind(product_id)
                    .bind(code.trim())
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }

    tx.commit().await?;
    Ok(Json(product))
}

async fn list_products_grouped(
    state: &AppState,
    params: &ProductListQuery,
    active_only: bool,
) -> DomaeResult<Map<String, Value>> {
    let mut sql = if active_only {
        "SELECT p.* FROM products p WHERE p.is_active = 1".to_string()
    } else {
        "SELECT p.* FROM products p WHERE 1 = 1".to_string()
    };

    let mut bind_idx = 1;
    if params.brand_id.is_some() {
        sql.push_str(&format!(" AND p.brand_id = ${}", bind_idx));
        bind_idx += 1;
    }
    if params.name.as_deref().is_some_and(|n| !n.trim().is_empty()) {
        sql.push_str(&format!(" AND p.product_name ILIKE ${}", bind_idx));
        bind_idx += 1;
    }
    if params.barcode.as_deref().is_some_and(|b| !b.trim().is_empty()) {
        sql.push_str(&format!(
            " AND p.id IN (SELECT product_id FROM product_barcodes WHERE barcode = ${})",
            bind_idx
        ));
    }
    sql.push_str(" ORDER BY p.product_name");

    let mut query = sqlx::query_as::<_, Product>(&sql);
    if let Some(brand_id) = params.brand_id {
        query = query.bind(brand_id);
    }
    if let Some(name) = params.name.as_deref().filter(|n| !n.trim().is_empty()) {
        query = query.bind(format!("%{}%", name.trim()));
    }
    if let Some(barcode) = params.barcode.as_deref().filter(|b| !b.trim().is_empty()) {
        query = query.bind(barcode.trim().to_string());
    }

    let products = query.fetch_all(&state.pool).await?;

    let mut grouped: Map<String, Value> = Map::new();
    for product in products {
        let category = product
            .category
            .clone()
            .unwrap_or_else(|| "미분류".to_string());
        let entry = grouped
            .entry(category)
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = entry {
            list.push(serde_json::to_value(&product).unwrap_or(Value::Null));
        }
    }
    Ok(grouped)
}

/// Management view: every product regardless of is_active, grouped by category.
pub async fn list_products_manage(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> DomaeResult<Json<Map<String, Value>>> {
    Ok(Json(list_products_grouped(&state, &params, false).await?))
}

/// Public view: active products only.
pub async fn list_products_public(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> DomaeResult<Json<Map<String, Value>>> {
    Ok(Json(list_products_grouped(&state, &params, true).await?))
}

pub async fn get_product_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> DomaeResult<Json<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT p.* FROM products p
         JOIN product_barcodes b ON b.product_id = p.id
         WHERE b.barcode = $1",
    )
    .bind(&barcode)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("해당 바코드의 상품이 없습니다.".into()))?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Product not found".into()));
    }
    Ok(Json(json!({ "detail": "Product deleted" })))
}

pub async fn delete_product_by_name(
    State(state): State<AppState>,
    Path(product_name): Path<String>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM products WHERE product_name = $1")
        .bind(&product_name)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound(
            "해당 상품명을 가진 상품을 찾을 수 없습니다.".into(),
        ));
    }
    Ok(Json(json!({ "detail": format!("상품 '{}' 삭제 완료", product_name) })))
}

#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct WarehouseStock {
    pub product_id: i32,
    pub product_name: String,
    pub quantity: i32,
}

pub async fn get_warehouse_stock(
    State(state): State<AppState>,
) -> DomaeResult<Json<Vec<WarehouseStock>>> {
    let stock = sqlx::query_as::<_, WarehouseStock>(
        "SELECT id AS product_id, product_name, stock AS quantity
         FROM products ORDER BY product_name",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(stock))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateInput {
    pub stock_change: i32,
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(input): Json<StockUpdateInput>,
) -> DomaeResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    let stock: i32 = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DomaeError::NotFound("상품을 찾을 수 없음".into()))?;

    let new_total = stock + input.stock_change;
    if new_total < 0 {
        return Err(DomaeError::Validation("재고 부족!".into()));
    }

    sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
        .bind(new_total)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Json(json!({ "message": "재고 업데이트 성공", "new_stock": new_total })))
}

#[derive(Deserialize)]
pub struct ReserveInput {
    pub quantity: i32,
}

pub async fn reserve_stock(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(input): Json<ReserveInput>,
) -> DomaeResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    let (stock, reserved): (i32, i32) =
        sqlx::query_as("SELECT stock, stock_reserved FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DomaeError::NotFound("상품을 찾을 수 없음".into()))?;

    if stock < input.quantity {
        return Err(DomaeError::Validation("재고 부족!".into()));
    }

    sqlx::query(
        "UPDATE products SET stock = stock - $1, stock_reserved = stock_reserved + $1,
         updated_at = NOW() WHERE id = $2",
    )
    .bind(input.quantity)
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(json!({
        "message": "예약 성공",
        "new_stock": stock - input.quantity,
        "reserved_stock": reserved + input.quantity,
    })))
}

pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(input): Json<ReserveInput>,
) -> DomaeResult<Json<Value>> {
    let mut tx = state.pool.begin().await?;

    let (stock, reserved): (i32, i32) =
        sqlx::query_as("SELECT stock, stock_reserved FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DomaeError::NotFound("상품을 찾을 수 없음".into()))?;

    if reserved < input.quantity {
        return Err(DomaeError::Validation("예약된 재고 부족!".into()));
    }

    sqlx::query(
        "UPDATE products SET stock = stock + $1, stock_reserved = stock_reserved - $1,
         updated_at = NOW() WHERE id = $2",
    )
    .bind(input.quantity)
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(json!({
        "message": "예약 취소 성공",
        "new_stock": stock + input.quantity,
        "reserved_stock": reserved - input.quantity,
    })))
}

/// Delete products with zero stock and no sales in the last six months.
pub async fn cleanup_unused_products(
    State(state): State<AppState>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query(
        "DELETE FROM products p
         WHERE p.stock = 0
         AND NOT EXISTS (
             SELECT 1 FROM sales_records s
             WHERE s.product_id = p.id
             AND s.sale_date >= $1::DATE - INTERVAL '6 months'
         )",
    )
    .bind(kst_today())
    .execute(&state.pool)
    .await?;

    let count = result.rows_affected();
    Ok(Json(json!({
        "deleted_count": count,
        "detail": format!("{}개 상품 삭제됨", count),
    })))
}

// --- Purchase price validity windows ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePriceInput {
    pub purchase_price: i32,
    pub start_date: Option<String>,
}

/// Open a new price window, closing the previous open one the day before.
pub async fn create_purchase_price(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Json(input): Json<PurchasePriceInput>,
) -> DomaeResult<Json<ProductPurchasePrice>> {
    let start = input
        .start_date
        .as_deref()
        .and_then(parse_date_safe)
        .unwrap_or_else(kst_today);

    let mut tx = state.pool.begin().await?;

    sqlx::query(
        "UPDATE product_purchase_prices
         SET end_date = $1::DATE - 1
         WHERE product_id = $2 AND end_date IS NULL AND start_date < $1",
    )
    .bind(start)
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    let price = sqlx::query_as::<_, ProductPurchasePrice>(
        "INSERT INTO product_purchase_prices (product_id, purchase_price, start_date)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(product_id)
    .bind(input.purchase_price)
    .bind(start)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(price))
}

pub async fn list_purchase_prices(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> DomaeResult<Json<Vec<ProductPurchasePrice>>> {
    let prices = sqlx::query_as::<_, ProductPurchasePrice>(
        "SELECT * FROM product_purchase_prices WHERE product_id = $1 ORDER BY start_date DESC",
    )
    .bind(product_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(prices))
}

#[derive(Deserialize)]
pub struct PriceAtQuery {
    pub date: Option<String>,
}

/// Price window covering the given date (today if omitted).
pub async fn get_purchase_price_at(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    Query(params): Query<PriceAtQuery>,
) -> DomaeResult<Json<ProductPurchasePrice>> {
    let at = params
        .date
        .as_deref()
        .and_then(parse_date_safe)
        .unwrap_or_else(kst_today);

    let price = sqlx::query_as::<_, ProductPurchasePrice>(
        "SELECT * FROM product_purchase_prices
         WHERE product_id = $1 AND start_date <= $2
         AND (end_date IS NULL OR end_date >= $2)
         ORDER BY start_date DESC LIMIT 1",
    )
    .bind(product_id)
    .bind(at)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("해당 날짜의 매입 단가가 없습니다.".into()))?;
    Ok(Json(price))
}
