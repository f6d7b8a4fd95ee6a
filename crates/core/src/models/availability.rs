//! Availability records and the shapes they take at the HTTP boundary.
//!
//! All timestamps are UTC epoch milliseconds. Nothing in this module applies a
//! timezone; presentation is left to the client.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{TimeError, TimeResult},
    time::parse_epoch_millis,
};

/// A persisted availability window for one user on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: i64,
    pub user_id: i32,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
}

/// A validated slot that has not been written to a store yet.
///
/// Construction through [`NewAvailabilitySlot::new`] guarantees
/// `start_time < end_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAvailabilitySlot {
    pub user_id: i32,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
}

impl NewAvailabilitySlot {
    pub fn new(user_id: i32, date: i64, start_time: i64, end_time: i64) -> TimeResult<Self> {
        if start_time >= end_time {
            return Err(TimeError::Validation(format!(
                "startTime ({start_time}) must be before endTime ({end_time})"
            )));
        }

        Ok(Self {
            user_id,
            date,
            start_time,
            end_time,
        })
    }
}

/// Read projection of an [`AvailabilitySlot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub id: i64,
    pub user_id: i32,
    pub date: i64,
    pub start_time: i64,
    pub end_time: i64,
}

impl From<AvailabilitySlot> for AvailabilityDto {
    fn from(slot: AvailabilitySlot) -> Self {
        Self {
            id: slot.id,
            user_id: slot.user_id,
            date: slot.date,
            start_time: slot.start_time,
            end_time: slot.end_time,
        }
    }
}

/// Request body of `POST /availability/userSubmitAvailability/{userId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAvailabilitySubmission {
    /// Optional echo of the path user id; must match it when present.
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub availability_list: Vec<SubmittedSlot>,
}

/// An epoch-millisecond value as sent by clients: a JSON integer or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpochMillisInput {
    Millis(i64),
    Text(String),
}

impl EpochMillisInput {
    pub fn to_millis(&self, field: &str) -> TimeResult<i64> {
        match self {
            EpochMillisInput::Millis(millis) => Ok(*millis),
            EpochMillisInput::Text(raw) => parse_epoch_millis(field, raw),
        }
    }
}

impl From<i64> for EpochMillisInput {
    fn from(millis: i64) -> Self {
        EpochMillisInput::Millis(millis)
    }
}

impl From<&str> for EpochMillisInput {
    fn from(raw: &str) -> Self {
        EpochMillisInput::Text(raw.to_string())
    }
}

/// One entry of a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSlot {
    pub date: EpochMillisInput,
    pub start_time: EpochMillisInput,
    pub end_time: EpochMillisInput,
}

impl SubmittedSlot {
    pub fn into_new_slot(self, user_id: i32) -> TimeResult<NewAvailabilitySlot> {
        let date = self.date.to_millis("date")?;
        let start_time = self.start_time.to_millis("startTime")?;
        let end_time = self.end_time.to_millis("endTime")?;

        NewAvailabilitySlot::new(user_id, date, start_time, end_time)
    }
}

impl UserAvailabilitySubmission {
    /// Validates every entry against `path_user_id`.
    ///
    /// Either every slot converts or none are returned, so a caller never
    /// writes a partially valid submission.
    pub fn into_new_slots(self, path_user_id: i32) -> TimeResult<Vec<NewAvailabilitySlot>> {
        if let Some(body_user_id) = self.user_id {
            if body_user_id != path_user_id {
                return Err(TimeError::Validation(format!(
                    "body userId {body_user_id} does not match path userId {path_user_id}"
                )));
            }
        }

        self.availability_list
            .into_iter()
            .map(|slot| slot.into_new_slot(path_user_id))
            .collect()
    }
}

/// A half-open time range `[start_time, end_time)` in UTC epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub start_time: i64,
    pub end_time: i64,
}

impl Interval {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }
}
