use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{CreateGuestRequest, ImportGuestsRequest};
use crate::api::dtos::responses::QrIssueResponse;
use crate::api::extractors::admin::AdminAuth;
use crate::domain::models::guest::{Guest, NewGuestParams};
use crate::domain::services::qr;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

fn validate(payload: &CreateGuestRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Guest name must not be empty".into()));
    }
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Guest email must not be empty".into()));
    }
    Ok(())
}

pub async fn create_guest(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Json(payload): Json<CreateGuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate(&payload)?;

    let guest = Guest::new(NewGuestParams {
        name: payload.name,
        email: payload.email,
        company: payload.company,
        invite_type: payload.invite_type,
        category: payload.category,
    });
    let created = state.guest_repo.create(&guest).await?;

    info!(guest_id = %created.id, "Provisioned guest");
    Ok(Json(created))
}

pub async fn import_guests(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Json(payload): Json<ImportGuestsRequest>,
) -> Result<impl IntoResponse, AppError> {
    for row in &payload.guests {
        validate(row)?;
    }

    let mut created = Vec::with_capacity(payload.guests.len());
    for row in payload.guests {
        let guest = Guest::new(NewGuestParams {
            name: row.name,
            email: row.email,
            company: row.company,
            invite_type: row.invite_type,
            category: row.category,
        });
        created.push(state.guest_repo.create(&guest).await?);
    }

    info!(count = created.len(), "Imported guests");
    Ok(Json(json!({ "imported": created.len(), "guests": created })))
}

pub async fn list_guests(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AppError> {
    let guests = state.guest_repo.list().await?;
    Ok(Json(guests))
}

pub async fn get_guest(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = state
        .guest_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Guest not found".into()))?;

    let checkins = state.checkin_repo.list_events(&guest.id).await?;
    Ok(Json(json!({ "guest": guest, "checkins": checkins })))
}

/// Passes are derived, not stored: re-issuing here always reflects the
/// guest's current token.
pub async fn issue_qr(
    State(state): State<Arc<AppState>>,
    _auth: AdminAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = state
        .guest_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Guest not found".into()))?;

    let payload = qr::issue(&guest, &state.config.qr_secret, Utc::now());
    let qr_data = serde_json::to_string(&payload).map_err(|_| AppError::Internal)?;
    let image_url = qr::render_url(&payload).map_err(|_| AppError::Internal)?;

    Ok(Json(QrIssueResponse {
        payload,
        qr_data,
        image_url,
        border_color: guest.category.border_color(),
    }))
}
