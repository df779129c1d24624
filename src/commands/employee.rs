use crate::db::{Client, Employee, EmployeeClient, EmployeeVehicle};
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::utils::parse_date_safe;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub name: String,
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub birthday: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct EmployeeListQuery {
    pub name: Option<String>,
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> DomaeResult<Json<Employee>> {
    let hashed = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;
    let birthday = input.birthday.as_deref().and_then(parse_date_safe);

    let employee: Employee = sqlx::query_as(
        "INSERT INTO employees (name, password_hash, phone, role, birthday, address)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(&input.name)
    .bind(&hashed)
    .bind(&input.phone)
    .bind(input.role.clone().unwrap_or_else(|| "sales".to_string()))
    .bind(birthday)
    .bind(&input.address)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(employee))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<EmployeeListQuery>,
) -> DomaeResult<Json<Vec<Employee>>> {
    let employees = if let Some(name) = params.name.filter(|n| !n.trim().is_empty()) {
        sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE name ILIKE $1 ORDER BY name",
        )
        .bind(format!("%{}%", name.trim()))
        .fetch_all(&state.pool)
        .await?
    } else {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY name")
            .fetch_all(&state.pool)
            .await?
    };
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
) -> DomaeResult<Json<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
        .bind(emp_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("Employee not found".into()))?;
    Ok(Json(employee))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> DomaeResult<Json<Employee>> {
    let hashed = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;
    let birthday = input.birthday.as_deref().and_then(parse_date_safe);

    let employee = sqlx::query_as::<_, Employee>(
        "UPDATE employees SET
            name = $1, password_hash = $2, phone = $3, role = $4,
            birthday = $5, address = $6, updated_at = NOW()
         WHERE id = $7 RETURNING *",
    )
    .bind(&input.name)
    .bind(&hashed)
    .bind(&input.phone)
    .bind(input.role.clone().unwrap_or_else(|| "sales".to_string()))
    .bind(birthday)
    .bind(&input.address)
    .bind(emp_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| DomaeError::NotFound("Employee not found".into()))?;

    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(emp_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Employee not found".into()));
    }
    Ok(Json(json!({ "detail": "Employee deleted" })))
}

/// Clients currently assigned to an employee (open assignments only).
pub async fn get_employee_clients(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
) -> DomaeResult<Json<Vec<Client>>> {
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM employees WHERE id = $1)")
        .bind(emp_id)
        .fetch_one(&state.pool)
        .await?;
    if !exists.0 {
        return Err(DomaeError::NotFound("Employee not found".into()));
    }

    let clients = sqlx::query_as::<_, Client>(
        "SELECT c.* FROM clients c
         JOIN employee_clients ec ON ec.client_id = c.id
         WHERE ec.employee_id = $1 AND ec.end_date IS NULL
         ORDER BY c.client_name",
    )
    .bind(emp_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(clients))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignClientInput {
    pub client_id: i32,
    pub start_date: Option<String>,
}

pub async fn assign_client(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
    Json(input): Json<AssignClientInput>,
) -> DomaeResult<Json<EmployeeClient>> {
    let start = input
        .start_date
        .as_deref()
        .and_then(parse_date_safe)
        .unwrap_or_else(super::utils::kst_today);

    let assignment = sqlx::query_as::<_, EmployeeClient>(
        "INSERT INTO employee_clients (employee_id, client_id, start_date)
         VALUES ($1, $2, $3)
         ON CONFLICT (employee_id, client_id)
         DO UPDATE SET start_date = EXCLUDED.start_date, end_date = NULL
         RETURNING *",
    )
    .bind(emp_id)
    .bind(input.client_id)
    .bind(start)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(assignment))
}

pub async fn release_client(
    State(state): State<AppState>,
    Path((emp_id, client_id)): Path<(i32, i32)>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query(
        "UPDATE employee_clients SET end_date = $1
         WHERE employee_id = $2 AND client_id = $3 AND end_date IS NULL",
    )
    .bind(super::utils::kst_today())
    .bind(emp_id)
    .bind(client_id)
    .execute(&state.pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Assignment not found".into()));
    }
    Ok(Json(json!({ "detail": "Assignment released" })))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
) -> DomaeResult<Json<Vec<EmployeeClient>>> {
    let assignments = sqlx::query_as::<_, EmployeeClient>(
        "SELECT * FROM employee_clients WHERE employee_id = $1 ORDER BY start_date DESC NULLS LAST",
    )
    .bind(emp_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(assignments))
}

#[derive(Deserialize)]
pub struct FcmTokenInput {
    pub token: String,
}

pub async fn save_fcm_token(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
    Json(input): Json<FcmTokenInput>,
) -> DomaeResult<Json<Value>> {
    let result = sqlx::query("UPDATE employees SET fcm_token = $1, updated_at = NOW() WHERE id = $2")
        .bind(&input.token)
        .bind(emp_id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DomaeError::NotFound("Employee not found".into()));
    }
    Ok(Json(json!({ "message": "FCM 토큰 저장 완료" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    pub vehicle_number: String,
    pub model: Option<String>,
    pub memo: Option<String>,
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
) -> DomaeResult<Json<EmployeeVehicle>> {
    let vehicle =
        sqlx::query_as::<_, EmployeeVehicle>("SELECT * FROM employee_vehicles WHERE employee_id = $1")
            .bind(emp_id)
            .fetch_optional(&state.pool)
            .await?
            .ok_or_else(|| DomaeError::NotFound("Vehicle not found".into()))?;
    Ok(Json(vehicle))
}

pub async fn upsert_vehicle(
    State(state): State<AppState>,
    Path(emp_id): Path<i32>,
    Json(input): Json<VehicleInput>,
) -> DomaeResult<Json<EmployeeVehicle>> {
    let vehicle = sqlx::query_as::<_, EmployeeVehicle>(
        "INSERT INTO employee_vehicles (employee_id, vehicle_number, model, memo)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (employee_id)
         DO UPDATE SET vehicle_number = EXCLUDED.vehicle_number,
                       model = EXCLUDED.model,
                       memo = EXCLUDED.memo,
                       updated_at = NOW()
         RETURNING *",
    )
    .bind(emp_id)
    .bind(&input.vehicle_number)
    .bind(&input.model)
    .bind(&input.memo)
    .fetch_one(&state.pool)
    .await?;
    Ok(Json(vehicle))
}
