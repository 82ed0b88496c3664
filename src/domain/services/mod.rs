pub mod qr;
pub mod rsvp;
