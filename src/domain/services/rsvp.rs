use crate::domain::models::guest::{RsvpStatus, WorkshopChoice};
use crate::error::AppError;

/// Attendance of at least one of dinner/cocktail means the guest is coming.
/// Neither means a decline. Total over both flags so the inference lives in
/// exactly one place.
pub fn derive_status(dinner: bool, cocktail: bool) -> RsvpStatus {
    if dinner || cocktail {
        RsvpStatus::Confirmed
    } else {
        RsvpStatus::Declined
    }
}

/// Validated, ready-to-commit RSVP transition. Built once per submission and
/// handed to the repository, which applies guest row and capacity ledger in
/// one transaction.
#[derive(Debug, Clone)]
pub struct RsvpUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub status: RsvpStatus,
    pub dinner: bool,
    pub cocktail: bool,
    pub dietary_flag: bool,
    pub workshop_choice: Option<WorkshopChoice>,
}

pub struct RsvpSubmission {
    pub name: Option<String>,
    pub company: Option<String>,
    pub dinner: bool,
    pub cocktail: bool,
    pub dietary_flag: bool,
    pub workshop_choice: Option<WorkshopChoice>,
}

impl RsvpUpdate {
    /// A workshop seat can only be held by a confirmed guest; a declining
    /// submission drops any requested (or previously held) choice so the
    /// ledger releases it.
    pub fn from_submission(submission: RsvpSubmission) -> Result<Self, AppError> {
        let status = derive_status(submission.dinner, submission.cocktail);

        let workshop_choice = match (status, submission.workshop_choice) {
            (RsvpStatus::Confirmed, Some(choice)) => {
                if choice.activity.trim().is_empty() || choice.slot.trim().is_empty() {
                    return Err(AppError::Validation(
                        "Workshop choice requires both activity and slot".into(),
                    ));
                }
                Some(choice)
            }
            _ => None,
        };

        Ok(Self {
            name: submission.name.filter(|n| !n.trim().is_empty()),
            company: submission.company,
            status,
            dinner: submission.dinner,
            cocktail: submission.cocktail,
            dietary_flag: submission.dietary_flag,
            workshop_choice,
        })
    }
}
