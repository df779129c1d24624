use crate::error::DomaeResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(sqlx::FromRow, Serialize)]
struct ColumnName {
    column_name: String,
}

pub async fn debug_db_schema(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> DomaeResult<Json<Vec<String>>> {
    let rows: Vec<ColumnName> = sqlx::query_as(
        "SELECT column_name FROM information_schema.columns
         WHERE table_name = $1 ORDER BY ordinal_position",
    )
    .bind(table_name)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows.into_iter().map(|r| r.column_name).collect()))
}

pub async fn greet(Path(name): Path<String>) -> Json<String> {
    Json(format!("Hello, {}! You've been greeted from Domae Backend!", name))
}
