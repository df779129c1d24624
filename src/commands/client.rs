use crate::db::Client;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub client_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub outstanding_amount: i32,
}

#[derive(Deserialize)]
pub struct ClientListQuery {
    pub name: Option<String>,
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(input): Json<ClientInput>,
) -> DomaeResult<Json<Client>> {
    let client = sqlx::query_as::<_, Client>(
        "INSERT INTO clients (client_name, address, phone, outstanding_amount)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&input.client_name)
    .bind(&input.address)
    .bind(&input.phone)
    .bind(input.outstanding_amount)
    .fetch_one(&state.pool)
    .await?;
    Ok(Json(client))
}

pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientListQuery>,
) -> DomaeResult<Json<Vec<Client>>> {
    let clients = if let Some(name) = params.name.filter(|n| !n.trim().is_empty()) {
        sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE client_name ILIKE $1 ORDER BY client_name",
        )
        .bind(format!("%{}%", name.trim()))
        .fetch_all(&state.pool)
        .await?
    } else {
        sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY client_name")
            .fetch_all(&state.pool)
            .await?
    };
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> DomaeResult<Json<Client>> {
    let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(client_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Client not found".into()))?;
    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
    Json(input): Json<ClientInput>,
) -> DomaeResult<Json<Client>> {
    let client = sqlx::query_as::<_, Client>(
        "UPDATE clients SET
            client_name = $1, address = $2, phone = $3,
            outstanding_amount = $4, updated_at = NOW()
         WHERE id = $5 RETURNING *",
    )
    .bind(&input.client_name)
    .bind(&input.address)
    .bind(&input.phone)
    .bind(input.outstanding_amount)
    .bind(client_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("Client not found".into()))?;
    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(client_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Client not found".into()));
    }
    Ok(Json(json!({ "detail": "Client deleted" })))
}
