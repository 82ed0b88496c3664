use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::SubmitRsvpRequest;
use crate::domain::models::guest::{Guest, RsvpStatus};
use crate::domain::services::qr;
use crate::domain::services::rsvp::{RsvpSubmission, RsvpUpdate};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

pub async fn get_guest(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let guest = state
        .guest_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid token".into()))?;

    Ok(Json(json!({ "guest": guest })))
}

pub async fn submit_rsvp(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(payload): Json<SubmitRsvpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let update = RsvpUpdate::from_submission(RsvpSubmission {
        name: payload.name,
        company: payload.company,
        dinner: payload.dinner,
        cocktail: payload.cocktail,
        dietary_flag: payload.dietary_flag,
        workshop_choice: payload.workshop,
    })?;

    let guest = state.guest_repo.apply_rsvp(&token, &update).await?;

    info!(
        guest_id = %guest.id,
        status = ?guest.rsvp_status,
        "RSVP submitted"
    );

    // Strictly after the commit. A failed email never unwinds the RSVP.
    if guest.rsvp_status == RsvpStatus::Confirmed {
        send_confirmation(&state, &guest).await;
    }

    Ok(Json(json!({ "success": true, "guest": guest })))
}

async fn send_confirmation(state: &AppState, guest: &Guest) {
    let payload = qr::issue(guest, &state.config.qr_secret, Utc::now());
    let image_url = match qr::render_url(&payload) {
        Ok(url) => url,
        Err(e) => {
            error!("Failed to serialize QR payload for guest {}: {}", guest.id, e);
            return;
        }
    };

    let mut ctx = tera::Context::new();
    ctx.insert("event_name", &state.config.event_name);
    ctx.insert("event_date", &state.config.event_date);
    ctx.insert("event_venue", &state.config.event_venue);
    ctx.insert("guest_name", &guest.name);
    ctx.insert("dinner", &guest.dinner);
    ctx.insert("cocktail", &guest.cocktail);
    ctx.insert("workshop_activity", &guest.workshop_activity);
    ctx.insert("workshop_slot", &guest.workshop_slot);
    ctx.insert("qr_image_url", &image_url);
    ctx.insert("qr_border_color", guest.category.border_color());
    ctx.insert(
        "rsvp_url",
        &format!("{}/{}", state.config.rsvp_base_url, guest.token),
    );

    let html = match state.templates.render("confirmation.html", &ctx) {
        Ok(html) => html,
        Err(e) => {
            error!("Failed to render confirmation template: {}", e);
            return;
        }
    };

    let subject = format!("Your entry pass - {}", state.config.event_name);
    if let Err(e) = state.email_service.send(&guest.email, &subject, &html).await {
        error!("Failed to send confirmation email to guest {}: {}", guest.id, e);
    }
}
