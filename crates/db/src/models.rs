use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotsync_core::models::{availability::AvailabilitySlot, user::User};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilitySlot {
    pub id: i64,
    pub user_id: i32,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbAvailabilitySlot> for AvailabilitySlot {
    fn from(row: DbAvailabilitySlot) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}
