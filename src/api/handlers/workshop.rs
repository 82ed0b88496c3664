use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::ScanRequest;
use crate::api::dtos::responses::{AvailabilityResponse, ScanResponse};
use crate::api::handlers::checkin::resolve_scan_token;
use crate::domain::models::guest::RsvpStatus;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn availability(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let entries = state.capacity_repo.availability().await?;
    Ok(Json(AvailabilityResponse::from_entries(entries)))
}

pub async fn scan_workshop(
    State(state): State<Arc<AppState>>,
    Path(activity): Path<String>,
    Json(payload): Json<ScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = resolve_scan_token(&state, &payload.code)?;

    let guest = state
        .guest_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid QR code".into()))?;

    // Entitlement is re-checked live against the guest record, never
    // trusted from the scanned payload.
    let choice = match (guest.rsvp_status, guest.workshop_choice()) {
        (RsvpStatus::Confirmed, Some(choice)) if choice.activity == activity => choice,
        (_, chosen) => return Err(AppError::WrongWorkshop { chosen }),
    };

    let outcome = state
        .checkin_repo
        .check_in_workshop(&guest.id, &choice.activity, &choice.slot)
        .await?;

    info!(
        guest_id = %guest.id,
        activity = %choice.activity,
        slot = %choice.slot,
        outcome = outcome.as_str(),
        "Workshop check-in scan"
    );

    Ok(Json(ScanResponse {
        status: outcome.as_str(),
        guest,
    }))
}
