//! # Overlap computation
//!
//! Given two users' slots and a reference instant, the overlap is every
//! strictly positive intersection between a slot of the first user and a
//! slot of the second, restricted to slots recorded on the reference instant's
//! UTC calendar day.
//!
//! Intervals are not merged. Each qualifying pair contributes exactly one
//! interval, so the output can contain duplicates or overlapping entries when
//! a user has overlapping slots of their own.

use chrono::NaiveDate;

use crate::{
    errors::{TimeError, TimeResult},
    models::availability::{AvailabilitySlot, Interval},
    time::utc_day,
};

/// Slots whose `date` falls on `day` (UTC).
pub fn slots_on_day(slots: &[AvailabilitySlot], day: NaiveDate) -> Vec<&AvailabilitySlot> {
    slots
        .iter()
        .filter(|slot| utc_day(slot.date) == Some(day))
        .collect()
}

/// Intersection of two slots, if it has a positive duration.
pub fn intersect(a: &AvailabilitySlot, b: &AvailabilitySlot) -> Option<Interval> {
    let start = a.start_time.max(b.start_time);
    let end = a.end_time.min(b.end_time);

    (start < end).then(|| Interval::new(start, end))
}

/// Pairwise intersections, sorted by start then end.
pub fn pairwise_overlaps(first: &[&AvailabilitySlot], second: &[&AvailabilitySlot]) -> Vec<Interval> {
    let mut overlaps: Vec<Interval> = first
        .iter()
        .flat_map(|a| second.iter().filter_map(move |b| intersect(a, b)))
        .collect();

    // Interval's derived Ord compares start_time, then end_time.
    overlaps.sort();
    overlaps
}

/// Overlapping availability of two users on the UTC day containing `reference`.
pub fn overlapping_availability(
    first: &[AvailabilitySlot],
    second: &[AvailabilitySlot],
    reference: i64,
) -> TimeResult<Vec<Interval>> {
    let day = utc_day(reference).ok_or_else(|| {
        TimeError::Validation(format!("date {reference} is outside the supported range"))
    })?;

    Ok(pairwise_overlaps(&slots_on_day(first, day), &slots_on_day(second, day)))
}
