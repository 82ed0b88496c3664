use crate::domain::models::checkin::CapacityEntry;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub qr_secret: String,
    pub qr_max_age_days: i64,
    pub admin_api_token: String,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub event_name: String,
    pub event_date: String,
    pub event_venue: String,
    pub rsvp_base_url: String,
    /// Comma-separated `activity:slot=limit` entries seeding the ledger.
    pub workshop_capacity: String,
}

const DEFAULT_WORKSHOP_CAPACITY: &str = "leather:1630=12,leather:1700=12,leather:1730=12,leather:1800=12,\
     perfume:1630=12,perfume:1700=12,perfume:1730=12,perfume:1800=12";

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            qr_secret: env::var("QR_SECRET").expect("QR_SECRET must be set"),
            qr_max_age_days: env::var("QR_MAX_AGE_DAYS").unwrap_or_else(|_| "30".to_string()).parse().expect("QR_MAX_AGE_DAYS must be a number"),
            admin_api_token: env::var("ADMIN_API_TOKEN").expect("ADMIN_API_TOKEN must be set"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            event_name: env::var("EVENT_NAME").unwrap_or_else(|_| "Annual Gala".to_string()),
            event_date: env::var("EVENT_DATE").unwrap_or_else(|_| "TBA".to_string()),
            event_venue: env::var("EVENT_VENUE").unwrap_or_else(|_| "TBA".to_string()),
            rsvp_base_url: env::var("RSVP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/rsvp".to_string()),
            workshop_capacity: env::var("WORKSHOP_CAPACITY").unwrap_or_else(|_| DEFAULT_WORKSHOP_CAPACITY.to_string()),
        }
    }

    /// Parses `activity:slot=limit` entries. Malformed config is a startup
    /// failure, not something to limp past.
    pub fn workshop_capacities(&self) -> Vec<CapacityEntry> {
        self.workshop_capacity
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (key, limit) = entry
                    .split_once('=')
                    .unwrap_or_else(|| panic!("WORKSHOP_CAPACITY entry missing '=': {}", entry));
                let (activity, slot) = key
                    .split_once(':')
                    .unwrap_or_else(|| panic!("WORKSHOP_CAPACITY entry missing ':': {}", entry));
                CapacityEntry {
                    activity: activity.trim().to_string(),
                    slot: slot.trim().to_string(),
                    capacity_limit: limit
                        .trim()
                        .parse()
                        .unwrap_or_else(|_| panic!("WORKSHOP_CAPACITY limit not a number: {}", entry)),
                    booked_count: 0,
                }
            })
            .collect()
    }
}
