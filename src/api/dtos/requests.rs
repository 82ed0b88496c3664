use crate::domain::models::guest::{GuestCategory, InviteType, WorkshopChoice};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SubmitRsvpRequest {
    pub name: Option<String>,
    pub company: Option<String>,
    pub dinner: bool,
    pub cocktail: bool,
    #[serde(default)]
    pub dietary_flag: bool,
    pub workshop: Option<WorkshopChoice>,
}

/// `code` is whatever the station scanned: either the signed JSON payload
/// from a QR pass or a bare token typed in manually.
#[derive(Deserialize)]
pub struct ScanRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub invite_type: InviteType,
    pub category: GuestCategory,
}

#[derive(Deserialize)]
pub struct ImportGuestsRequest {
    pub guests: Vec<CreateGuestRequest>,
}
