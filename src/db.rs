use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, Pool, Postgres};
use std::str::FromStr;

use crate::error::{DomaeError, DomaeResult};

pub type DbPool = Pool<Postgres>;

pub async fn init_pool_with_options(opts: PgConnectOptions) -> DomaeResult<DbPool> {
    // connect_lazy_with returns the pool immediately. It does not validate connection.
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .idle_timeout(std::time::Duration::from_secs(120))
        .max_lifetime(std::time::Duration::from_secs(300))
        .connect_lazy_with(opts))
}

pub async fn init_pool(database_url: &str) -> DomaeResult<DbPool> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| DomaeError::Internal(format!("Invalid DB URL: {}", e)))?
        .ssl_mode(PgSslMode::Disable);

    init_pool_with_options(opts).await
}

pub async fn init_database(pool: &DbPool) -> DomaeResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    let _ = ensure_seeds(pool).await;
    tracing::info!("Database ready");

    Ok(())
}

async fn ensure_seeds(pool: &DbPool) -> DomaeResult<()> {
    let admin_name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "관리자".to_string());

    let admin_exists: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM employees WHERE role = 'admin'")
            .fetch_one(pool)
            .await
            .unwrap_or((0,));
    if admin_exists.0 == 0 {
        if let Ok(hash) = bcrypt::hash("admin", bcrypt::DEFAULT_COST) {
            let _ = sqlx::query(
                "INSERT INTO employees (name, password_hash, role) VALUES ($1, $2, 'admin')",
            )
            .bind(&admin_name)
            .bind(hash)
            .execute(pool)
            .await;
        }
    }

    let company_exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM company_info")
        .fetch_one(pool)
        .await
        .unwrap_or((0,));
    if company_exists.0 == 0 {
        let _ = sqlx::query("INSERT INTO company_info (company_name) VALUES ($1)")
            .bind("도매 유통")
            .execute(pool)
            .await;
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub birthday: Option<NaiveDate>,
    pub address: Option<String>,
    #[sqlx(default)]
    pub fcm_token: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: i32,
    pub client_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub outstanding_amount: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct EmployeeClient {
    pub id: i32,
    pub employee_id: i32,
    pub client_id: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: i32,
    pub brand_name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub brand_id: i32,
    pub product_name: String,
    pub default_price: i32,
    pub incentive: i32,
    pub stock: i32,
    pub stock_reserved: i32,
    pub is_active: i32,
    pub box_quantity: i32,
    pub category: Option<String>,
    pub is_fixed_price: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ProductPurchasePrice {
    pub id: i32,
    pub product_id: i32,
    pub purchase_price: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i32,
    pub purchase_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub client_id: i32,
    pub employee_id: i32,
    pub order_date: NaiveDateTime,
    pub total_amount: i32,
    pub status: String,
    pub shipment_round: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i32,
    pub line_total: i32,
    pub incentive: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub client_id: i32,
    pub payment_date: NaiveDateTime,
    pub amount: i32,
    pub payment_method: String,
    pub note: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SalesRecord {
    pub id: i64,
    pub employee_id: Option<i32>,
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: i32,
    pub return_amount: i32,
    pub subsidy_amount: i32,
    pub total_amount: i32,
    pub sale_date: NaiveDate,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct ClientVisit {
    pub id: i32,
    pub employee_id: i32,
    pub client_id: i32,
    pub visit_datetime: NaiveDateTime,
    pub order_id: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct EmployeeInventory {
    pub id: i32,
    pub employee_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct EmployeeVehicle {
    pub id: i32,
    pub employee_id: i32,
    pub vehicle_number: String,
    pub model: Option<String>,
    pub memo: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Lent {
    pub id: i32,
    pub client_id: i32,
    pub brand: String,
    pub serial_number: String,
    pub year: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FranchiseOrder {
    pub id: i32,
    pub client_id: i32,
    pub employee_id: i32,
    pub order_date: NaiveDate,
    pub shipment_round: i32,
    pub is_transferred: bool,
    pub is_read: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FranchiseOrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Default)]
pub struct CompanyInfo {
    pub id: i32,
    pub company_name: String,
    pub ceo_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub business_number: Option<String>,
    pub bank_account: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MonthlySales {
    pub id: i32,
    pub client_id: i32,
    pub employee_id: Option<i32>,
    pub year: i32,
    pub month: i32,
    pub total_sales: i64,
    pub total_returns: i64,
    pub total_subsidy: i64,
    pub created_at: Option<NaiveDateTime>,
}
