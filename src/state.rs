use crate::config::Config;
use crate::domain::ports::{CapacityRepository, CheckinRepository, EmailService, GuestRepository};
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub guest_repo: Arc<dyn GuestRepository>,
    pub capacity_repo: Arc<dyn CapacityRepository>,
    pub checkin_repo: Arc<dyn CheckinRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
