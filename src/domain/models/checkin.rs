use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const SCOPE_MAIN: &str = "main";
pub const SCOPE_WORKSHOP: &str = "workshop";

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_DUPLICATE: &str = "duplicate";

/// Result of a check-in attempt. `Duplicate` is a valid terminal outcome,
/// not an error: the guest is already in, and no state was mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinOutcome {
    Success,
    Duplicate,
}

impl CheckinOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinOutcome::Success => OUTCOME_SUCCESS,
            CheckinOutcome::Duplicate => OUTCOME_DUPLICATE,
        }
    }
}

/// Append-only audit record of a scan at the door or a workshop entrance.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CheckinEvent {
    pub id: String,
    pub guest_id: String,
    pub scope: String,
    pub activity: Option<String>,
    pub slot: Option<String>,
    pub outcome: String,
    pub scanned_at: DateTime<Utc>,
}

impl CheckinEvent {
    pub fn main(guest_id: &str, outcome: CheckinOutcome) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guest_id: guest_id.to_string(),
            scope: SCOPE_MAIN.to_string(),
            activity: None,
            slot: None,
            outcome: outcome.as_str().to_string(),
            scanned_at: Utc::now(),
        }
    }

    pub fn workshop(guest_id: &str, activity: &str, slot: &str, outcome: CheckinOutcome) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            guest_id: guest_id.to_string(),
            scope: SCOPE_WORKSHOP.to_string(),
            activity: Some(activity.to_string()),
            slot: Some(slot.to_string()),
            outcome: outcome.as_str().to_string(),
            scanned_at: Utc::now(),
        }
    }
}

/// One row of the capacity ledger: fixed limit plus the maintained count of
/// confirmed guests currently holding a seat.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CapacityEntry {
    pub activity: String,
    pub slot: String,
    pub capacity_limit: i64,
    pub booked_count: i64,
}

impl CapacityEntry {
    pub fn available(&self) -> i64 {
        (self.capacity_limit - self.booked_count).max(0)
    }
}
