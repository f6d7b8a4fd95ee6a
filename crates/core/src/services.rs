//! # Capability interfaces
//!
//! The HTTP layer never talks to a database directly. It is handed a
//! [`UserDirectory`] and an [`AvailabilityService`] at construction, which lets
//! tests substitute fakes and lets deployments swap the storage backend.

use async_trait::async_trait;
use eyre::Result;
use tracing::debug;

use crate::{
    errors::TimeResult,
    models::{
        availability::{AvailabilitySlot, Interval, NewAvailabilitySlot},
        user::User,
    },
    overlap::overlapping_availability,
};

/// Resolves user ids to user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>>;
}

/// Persistence for availability slots.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn create_availability(&self, slot: NewAvailabilitySlot) -> Result<AvailabilitySlot>;

    /// Persists several slots.
    ///
    /// The default writes them one by one and stops at the first failure,
    /// leaving earlier writes in place. Stores that can do better (the
    /// Postgres store uses a transaction) should override it.
    async fn create_availability_batch(
        &self,
        slots: Vec<NewAvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>> {
        let mut created = Vec::with_capacity(slots.len());
        for slot in slots {
            created.push(self.create_availability(slot).await?);
        }
        Ok(created)
    }

    /// All slots for `user_id`, ordered by date, then start time.
    async fn get_user_availability(&self, user_id: i32) -> Result<Vec<AvailabilitySlot>>;
}

/// Availability operations exposed to the HTTP layer.
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    async fn get_user_availability(&self, user_id: i32) -> TimeResult<Vec<AvailabilitySlot>>;

    async fn submit_availability(
        &self,
        slots: Vec<NewAvailabilitySlot>,
    ) -> TimeResult<Vec<AvailabilitySlot>>;

    /// Intervals where both users are available on the UTC day of `reference`.
    async fn get_overlapping_availability(
        &self,
        user_id1: i32,
        user_id2: i32,
        reference: i64,
    ) -> TimeResult<Vec<Interval>>;
}

/// [`AvailabilityService`] backed by any [`AvailabilityStore`].
pub struct StoreAvailabilityService<S> {
    store: S,
}

impl<S: AvailabilityStore> StoreAvailabilityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: AvailabilityStore> AvailabilityService for StoreAvailabilityService<S> {
    async fn get_user_availability(&self, user_id: i32) -> TimeResult<Vec<AvailabilitySlot>> {
        Ok(self.store.get_user_availability(user_id).await?)
    }

    async fn submit_availability(
        &self,
        slots: Vec<NewAvailabilitySlot>,
    ) -> TimeResult<Vec<AvailabilitySlot>> {
        if slots.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = slots.len(), "Persisting availability batch");
        Ok(self.store.create_availability_batch(slots).await?)
    }

    async fn get_overlapping_availability(
        &self,
        user_id1: i32,
        user_id2: i32,
        reference: i64,
    ) -> TimeResult<Vec<Interval>> {
        let first = self.store.get_user_availability(user_id1).await?;
        let second = self.store.get_user_availability(user_id2).await?;

        let overlaps = overlapping_availability(&first, &second, reference)?;
        debug!(
            user_id1,
            user_id2,
            reference,
            found = overlaps.len(),
            "Computed overlapping availability"
        );

        Ok(overlaps)
    }
}
