pub mod checkin;
pub mod guest;
