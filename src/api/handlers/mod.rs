pub mod admin_guests;
pub mod checkin;
pub mod health;
pub mod rsvp;
pub mod workshop;
