use crate::db::CompanyInfo;
use crate::error::{DomaeError, DomaeResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

pub async fn get_company_info(State(state): State<AppState>) -> DomaeResult<Json<CompanyInfo>> {
    let company = sqlx::query_as::<_, CompanyInfo>("SELECT * FROM company_info ORDER BY id LIMIT 1")
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| DomaeError::NotFound("회사 정보가 없습니다.".into()))?;
    Ok(Json(company))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub company_name: String,
    pub ceo_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub business_number: Option<String>,
    pub bank_account: Option<String>,
}

/// Single-row table: update the existing profile or create the first one.
pub async fn save_company_info(
    State(state): State<AppState>,
    Json(input): Json<CompanyInput>,
) -> DomaeResult<Json<Value>> {
    let existing: Option<(i32,)> =
        sqlx::query_as("SELECT id FROM company_info ORDER BY id LIMIT 1")
            .fetch_optional(&state.pool)
            .await?;

    match existing {
        Some((id,)) => {
            sqlx::query(
                "UPDATE company_info SET
                    company_name = $1, ceo_name = $2, address = $3,
                    phone = $4, business_number = $5, bank_account = $6
                 WHERE id = $7",
            )
            .bind(&input.company_name)
            .bind(&input.ceo_name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.business_number)
            .bind(&input.bank_account)
            .bind(id)
            .execute(&state.pool)
            .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO company_info
                 (company_name, ceo_name, address, phone, business_number, bank_account)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(&input.company_name)
            .bind(&input.ceo_name)
            .bind(&input.address)
            .bind(&input.phone)
            .bind(&input.business_number)
            .bind(&input.bank_account)
            .execute(&state.pool)
            .await?;
        }
    }

    Ok(Json(json!({ "message": "회사 정보가 저장되었습니다." })))
}
