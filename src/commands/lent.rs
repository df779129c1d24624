use crate::db::Lent;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::kst_now;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LentInput {
    pub client_id: i32,
    pub brand: String,
    pub serial_number: String,
    pub year: i32,
}

pub async fn create_lent(
    State(state): State<AppState>,
    Json(input): Json<LentInput>,
) -> DomaeResult<Json<Lent>> {
    let lent: Lent = sqlx::query_as(
        "INSERT INTO lents (client_id, brand, serial_number, year, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5) RETURNING *",
    )
    .bind(input.client_id)
    .bind(&input.brand)
    .bind(&input.serial_number)
    .bind(input.year)
    .bind(kst_now())
    .fetch_one(&state.pool)
    .await?;
    Ok(Json(lent))
}

pub async fn list_lents(State(state): State<AppState>) -> DomaeResult<Json<Vec<Lent>>> {
    let lents = sqlx::query_as::<_, Lent>("SELECT * FROM lents ORDER BY id")
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(lents))
}

pub async fn get_lent(
    State(state): State<AppState>,
    Path(lent_id): Path<i32>,
) -> DomaeResult<Json<Lent>> {
    let lent = sqlx::query_as::<_, Lent>("SELECT * FROM lents WHERE id = $1")
        .bind(lent_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Lent not found".into()))?;
    Ok(Json(lent))
}

pub async fn delete_lent(
    State(state): State<AppState>,
    Path(lent_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM lents WHERE id = $1")
        .bind(lent_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Lent not found".into()));
    }
    Ok(Json(json!({ "detail": "Lent deleted" })))
}
