use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "invite_type", rename_all = "lowercase")]
pub enum InviteType {
    Named,
    Company,
}

/// Used only for QR presentation (border color on the printed pass),
/// never for access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "guest_category", rename_all = "kebab-case")]
pub enum GuestCategory {
    TierA,
    TierB,
    TierC,
}

impl GuestCategory {
    pub fn border_color(&self) -> &'static str {
        match self {
            GuestCategory::TierA => "#0A599C",
            GuestCategory::TierB => "#d97706",
            GuestCategory::TierC => "#16a34a",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "rsvp_status", rename_all = "lowercase")]
pub enum RsvpStatus {
    Pending,
    Confirmed,
    Declined,
}

/// A workshop seat request: a specific activity at a specific time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopChoice {
    pub activity: String,
    pub slot: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Guest {
    pub id: String,
    pub token: String,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub invite_type: InviteType,
    pub category: GuestCategory,
    pub rsvp_status: RsvpStatus,
    pub dinner: bool,
    pub cocktail: bool,
    pub dietary_flag: bool,
    pub workshop_activity: Option<String>,
    pub workshop_slot: Option<String>,
    pub checked_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewGuestParams {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub invite_type: InviteType,
    pub category: GuestCategory,
}

impl Guest {
    pub fn new(params: NewGuestParams) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            token,
            name: params.name,
            company: params.company,
            email: params.email,
            invite_type: params.invite_type,
            category: params.category,
            rsvp_status: RsvpStatus::Pending,
            dinner: false,
            cocktail: false,
            dietary_flag: false,
            workshop_activity: None,
            workshop_slot: None,
            checked_in: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn workshop_choice(&self) -> Option<WorkshopChoice> {
        match (&self.workshop_activity, &self.workshop_slot) {
            (Some(activity), Some(slot)) => Some(WorkshopChoice {
                activity: activity.clone(),
                slot: slot.clone(),
            }),
            _ => None,
        }
    }
}
