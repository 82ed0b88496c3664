use axum::{extract::State, response::IntoResponse, Json};
use crate::api::dtos::requests::ScanRequest;
use crate::api::dtos::responses::ScanResponse;
use crate::domain::services::qr::{self, QrVerification};
use crate::error::AppError;
use crate::state::AppState;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Scanned QR passes carry a signed JSON payload; manual fallback at the
/// door is a bare token. Verification authenticates the token only; a
/// payload that fails verification is rejected outright, never mined for a
/// guest identity.
pub(crate) fn resolve_scan_token(state: &AppState, code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.starts_with('{') {
        let max_age = Duration::days(state.config.qr_max_age_days);
        match qr::verify(code, &state.config.qr_secret, max_age, Utc::now()) {
            QrVerification::Valid { token, .. } => Ok(token),
            rejected => Err(AppError::InvalidQr(rejected.reason())),
        }
    } else {
        Ok(code.to_string())
    }
}

pub async fn scan_main(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = resolve_scan_token(&state, &payload.code)?;

    let guest = state
        .guest_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid QR code".into()))?;

    let outcome = state.checkin_repo.check_in_main(&guest.id).await?;

    info!(guest_id = %guest.id, outcome = outcome.as_str(), "Main check-in scan");

    let guest = state
        .guest_repo
        .find_by_id(&guest.id)
        .await?
        .ok_or(AppError::Internal)?;

    Ok(Json(ScanResponse {
        status: outcome.as_str(),
        guest,
    }))
}
