use crate::domain::models::checkin::CapacityEntry;
use crate::domain::models::guest::Guest;
use crate::domain::services::qr::QrPayload;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
pub struct ScanResponse {
    pub status: &'static str,
    pub guest: Guest,
}

#[derive(Serialize)]
pub struct SlotAvailability {
    pub limit: i64,
    pub booked: i64,
    pub available: i64,
}

/// `{activity: {slot: {limit, booked, available}}}` for the RSVP form.
/// Advisory only; the commit-time reservation is the authority.
#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub workshops: BTreeMap<String, BTreeMap<String, SlotAvailability>>,
}

impl AvailabilityResponse {
    pub fn from_entries(entries: Vec<CapacityEntry>) -> Self {
        let mut workshops: BTreeMap<String, BTreeMap<String, SlotAvailability>> = BTreeMap::new();
        for entry in entries {
            workshops.entry(entry.activity.clone()).or_default().insert(
                entry.slot.clone(),
                SlotAvailability {
                    limit: entry.capacity_limit,
                    booked: entry.booked_count,
                    available: entry.available(),
                },
            );
        }
        Self { workshops }
    }
}

#[derive(Serialize)]
pub struct QrIssueResponse {
    pub payload: QrPayload,
    /// The exact string encoded into the QR image.
    pub qr_data: String,
    pub image_url: String,
    pub border_color: &'static str,
}
