use crate::db::{Brand, Product};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    pub brand_name: String,
    pub description: Option<String>,
}

pub async fn create_brand(
    State(state): State<AppState>,
    Json(input): Json<BrandInput>,
) -> DomaeResult<Json<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(
        "INSERT INTO brands (brand_name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(&input.brand_name)
    .bind(&input.description)
    .fetch_one(&state.pool)
    .await?;
    Ok(Json(brand))
}

pub async fn list_brands(State(state): State<AppState>) -> DomaeResult<Json<Vec<Brand>>> {
    let brands = sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY brand_name")
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(brands))
}

pub async fn update_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
    Json(input): Json<BrandInput>,
) -> DomaeResult<Json<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(
        "UPDATE brands SET brand_name = $1, description = $2, updated_at = NOW()
         WHERE id = $3 RETURNING *",
    )
    .bind(&input.brand_name)
    .bind(&input.description)
    .bind(brand_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("Brand not found".into()))?;
    Ok(Json(brand))
}

pub async fn delete_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM brands WHERE id = $1")
        .bind(brand_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Brand not found".into()));
    }
    Ok(Json(json!({ "detail": "Brand deleted" })))
}

pub async fn get_brand_products(
    State(state): State<AppState>,
    Path(brand_id): Path<i32>,
) -> DomaeResult<Json<Vec<Product>>> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM brands WHERE id = $1)")
        .bind(brand_id)
        .fetch_one(&state.pool)
        .await?;
    if !exists.0 {
        return Err(DomaeError::NotFound("Brand not found".into()));
    }

    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE brand_id = $1 ORDER BY product_name",
    )
    .bind(brand_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(products))
}
