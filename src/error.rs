#![allow(dead_code)]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomaeError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

pub type DomaeResult<T> = Result<T, DomaeError>;

impl IntoResponse for DomaeError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            DomaeError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                "요청한 데이터를 찾을 수 없습니다.".to_string(),
            ),
            DomaeError::Database(ref e) => {
                tracing::error!("Database Error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "데이터베이스 오류가 발생했습니다.".to_string(),
                )
            }
            DomaeError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            DomaeError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            DomaeError::Internal(msg) => {
                tracing::error!("Internal Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "서버 내부 오류가 발생했습니다.".to_string(),
                )
            }
            DomaeError::Io(e) => {
                tracing::error!("IO Error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "파일 시스템 오류가 발생했습니다.".to_string(),
                )
            }
            _ => {
                tracing::error!("Unhandled Error: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "알 수 없는 오류가 발생했습니다.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
