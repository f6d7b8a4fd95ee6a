//! Domain types and rules for SlotSync.
//!
//! Everything here is transport and storage agnostic: handlers in
//! `slotsync-api` and the Postgres store in `slotsync-db` both depend on the
//! capability traits in [`services`].

pub mod errors;
pub mod models;
pub mod overlap;
pub mod services;
pub mod time;
