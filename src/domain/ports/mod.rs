use crate::domain::models::{
    checkin::{CapacityEntry, CheckinEvent, CheckinOutcome},
    guest::Guest,
};
use crate::domain::services::rsvp::RsvpUpdate;
use crate::error::AppError;
use async_trait::async_trait;

/// Single source of truth for guest RSVP state. `apply_rsvp` is the only
/// RSVP mutation path and must commit the guest row together with any
/// capacity ledger movement in one transaction.
#[async_trait]
pub trait GuestRepository: Send + Sync {
    async fn create(&self, guest: &Guest) -> Result<Guest, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Guest>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Guest>, AppError>;
    async fn list(&self) -> Result<Vec<Guest>, AppError>;
    async fn apply_rsvp(&self, token: &str, update: &RsvpUpdate) -> Result<Guest, AppError>;
}

/// Advisory per-(activity, slot) seat counts for UI display. The
/// authoritative reserve/release happens inside `apply_rsvp`; nothing read
/// here may be used to gate a booking.
#[async_trait]
pub trait CapacityRepository: Send + Sync {
    async fn seed(&self, entries: &[CapacityEntry]) -> Result<(), AppError>;
    async fn availability(&self) -> Result<Vec<CapacityEntry>, AppError>;
}

/// At-most-once check-in per scope, with an append-only audit trail. Both
/// methods run their read-check-then-write as a single atomic statement so
/// two concurrent scans of the same pass cannot both commit a success.
#[async_trait]
pub trait CheckinRepository: Send + Sync {
    async fn check_in_main(&self, guest_id: &str) -> Result<CheckinOutcome, AppError>;
    async fn check_in_workshop(
        &self,
        guest_id: &str,
        activity: &str,
        slot: &str,
    ) -> Result<CheckinOutcome, AppError>;
    async fn list_events(&self, guest_id: &str) -> Result<Vec<CheckinEvent>, AppError>;
}

/// Best-effort side channel. Invoked strictly after the core commit; a
/// failure here is logged and never rolls back guest state.
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str)
        -> Result<(), AppError>;
}
