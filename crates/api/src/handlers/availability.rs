//! # Availability Handlers
//!
//! Request/response marshalling for the three availability endpoints:
//!
//! - `GET  /availability/user/{id}`
//! - `POST /availability/userSubmitAvailability/{userId}`
//! - `GET  /availability/userAvailability/getOverlappingAvailability/user1/{userId1}/userId2/{userId2}?date=`
//!
//! Every handler parses its path and query values explicitly, so malformed
//! input becomes a `400` instead of a server error. Every referenced user must
//! exist before any store access happens. Timestamps are UTC epoch
//! milliseconds in and out; no timezone is applied here.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use slotsync_core::{
    errors::TimeError,
    models::availability::{AvailabilityDto, Interval, UserAvailabilitySubmission},
    time::{parse_epoch_millis, resolve_reference_instant},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{ApiState, middleware::error_handling::AppError};

/// Query parameters for the overlap endpoint
#[derive(Debug, Deserialize)]
pub struct OverlapQuery {
    /// Reference instant in epoch milliseconds; `"0"` or any non-positive
    /// value means "now"
    #[serde(default = "default_date")]
    pub date: String,
}

fn default_date() -> String {
    "0".to_string()
}

fn parse_user_id(field: &str, raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>().map_err(|_| {
        AppError(TimeError::Validation(format!("{field} must be an integer, got {raw:?}")))
    })
}

/// Rejects the request unless `user_id` resolves in the user directory.
async fn require_user(state: &ApiState, user_id: i32) -> Result<(), AppError> {
    match state.users.get_user_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => {
            warn!(user_id, "Rejecting request for unknown user");
            Err(AppError(TimeError::UnknownUser(user_id)))
        }
    }
}

/// Returns every availability slot recorded for a user.
///
/// # Errors
///
/// * `TimeError::Validation` - `id` is not an integer
/// * `TimeError::UnknownUser` - no such user
/// * `TimeError::Database` - store failure
#[axum::debug_handler]
pub async fn get_availability_by_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AvailabilityDto>>, AppError> {
    let user_id = parse_user_id("id", &id)?;
    require_user(&state, user_id).await?;

    let slots = state.availability.get_user_availability(user_id).await?;
    debug!(user_id, count = slots.len(), "Fetched availability");

    Ok(Json(slots.into_iter().map(AvailabilityDto::from).collect()))
}

/// Records a batch of availability slots for a user.
///
/// The user is checked first, then the body is decoded and every entry is
/// parsed and validated. Nothing is written unless all entries are valid.
///
/// # Errors
///
/// * `TimeError::Validation` - malformed `userId`, undecodable body, malformed entry,
///   `startTime >= endTime`, or a body `userId` that differs from the path
/// * `TimeError::UnknownUser` - no such user
/// * `TimeError::Database` - store failure
#[axum::debug_handler]
pub async fn submit_availability(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<UserAvailabilitySubmission>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let user_id = parse_user_id("userId", &user_id)?;
    require_user(&state, user_id).await?;

    // Body rejections only surface once the user is known to exist
    let Json(payload) = payload.map_err(|rejection| {
        debug!(user_id, "Rejecting undecodable submission: {}", rejection.body_text());
        AppError(TimeError::Validation(rejection.body_text()))
    })?;

    let slots = payload.into_new_slots(user_id)?;
    let created = state.availability.submit_availability(slots).await?;
    info!(user_id, count = created.len(), "Availability submitted");

    Ok(StatusCode::OK)
}

/// Computes where two users are both available on the day of `date`.
///
/// # Errors
///
/// * `TimeError::Validation` - malformed user id or `date`
/// * `TimeError::UnknownUser` - either user is unknown
/// * `TimeError::Database` - store failure
#[axum::debug_handler]
pub async fn get_overlapping_availability(
    State(state): State<Arc<ApiState>>,
    Path((user_id1, user_id2)): Path<(String, String)>,
    Query(query): Query<OverlapQuery>,
) -> Result<Json<Vec<Interval>>, AppError> {
    let user_id1 = parse_user_id("userId1", &user_id1)?;
    let user_id2 = parse_user_id("userId2", &user_id2)?;
    let requested = parse_epoch_millis("date", &query.date)?;

    require_user(&state, user_id1).await?;
    require_user(&state, user_id2).await?;

    let reference = resolve_reference_instant(requested);
    let overlaps = state
        .availability
        .get_overlapping_availability(user_id1, user_id2, reference)
        .await?;

    Ok(Json(overlaps))
}
