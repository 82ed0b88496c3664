pub mod postgres_capacity_repo;
pub mod postgres_checkin_repo;
pub mod postgres_guest_repo;
pub mod sqlite_capacity_repo;
pub mod sqlite_checkin_repo;
pub mod sqlite_guest_repo;
