use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::models::guest::WorkshopChoice;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Workshop {activity} at {slot} is fully booked")]
    WorkshopFull { activity: String, slot: String },
    #[error("Guest is not booked into this workshop")]
    WrongWorkshop { chosen: Option<WorkshopChoice> },
    #[error("Invalid QR payload: {0}")]
    InvalidQr(&'static str),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" })),
                        )
                            .into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" }))).into_response()
            }
            AppError::WorkshopFull { activity, slot } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "workshop_full",
                    "activity": activity,
                    "slot": slot,
                })),
            )
                .into_response(),
            // Carries the guest's actual choice so door staff can redirect.
            AppError::WrongWorkshop { chosen } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "wrong_workshop",
                    "chosen": chosen,
                })),
            )
                .into_response(),
            AppError::InvalidQr(reason) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_qr",
                    "reason": reason,
                })),
            )
                .into_response(),
            AppError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal error" })),
            )
                .into_response(),
        }
    }
}
