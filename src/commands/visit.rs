use crate::archive::ArchiveKind;
use crate::db::ClientVisit;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use super::utils::{kst_now, parse_datetime_safe};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientVisitInput {
    pub employee_id: i32,
    pub client_id: i32,
    pub visit_datetime: Option<String>,
    pub order_id: Option<i64>,
}

pub async fn create_client_visit(
    State(state): State<AppState>,
    Json(input): Json<ClientVisitInput>,
) -> DomaeResult<Json<ClientVisit>> {
    let visit_datetime = input
        .visit_datetime
        .as_deref()
        .and_then(parse_datetime_safe)
        .unwrap_or_else(kst_now);

    let visit: ClientVisit = sqlx::query_as(
        "INSERT INTO client_visits (employee_id, client_id, visit_datetime, order_id)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(input.employee_id)
    .bind(input.client_id)
    .bind(visit_datetime)
    .bind(input.order_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(visit))
}

pub async fn list_client_visits(
    State(state): State<AppState>,
) -> DomaeResult<Json<Vec<ClientVisit>>> {
    let visits = sqlx::query_as::<_, ClientVisit>(
        "SELECT * FROM client_visits ORDER BY visit_datetime DESC",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(visits))
}

pub async fn get_client_visit(
    State(state): State<AppState>,
    Path(visit_id): Path<i32>,
) -> DomaeResult<Json<ClientVisit>> {
    let visit = sqlx::query_as::<_, ClientVisit>("SELECT * FROM client_visits WHERE id = $1")
        .bind(visit_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Client visit not found".into()))?;
    Ok(Json(visit))
}

/// Visits of a given year, routed to the live or archive table.
pub async fn list_visits_by_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> DomaeResult<Json<Vec<ClientVisit>>> {
    let tables = state
        .archive
        .resolve(&state.pool, ArchiveKind::ClientVisits, year)
        .await?;

    let visits = sqlx::query_as::<_, ClientVisit>(&format!(
        "SELECT * FROM {} WHERE EXTRACT(YEAR FROM visit_datetime) = $1 ORDER BY visit_datetime DESC",
        tables.table
    ))
    .bind(year)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(visits))
}
