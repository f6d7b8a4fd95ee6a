pub mod availability;
pub mod user;
