use async_trait::async_trait;
use mockall::mock;
use slotsync_core::{
    models::{
        availability::{AvailabilitySlot, NewAvailabilitySlot},
        user::User,
    },
    services::{AvailabilityStore, UserDirectory},
};

// Mock repositories for testing
mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserDirectory for UserRepo {
        async fn get_user_by_id(&self, id: i32) -> eyre::Result<Option<User>>;
    }
}

mock! {
    pub AvailabilityRepo {}

    #[async_trait]
    impl AvailabilityStore for AvailabilityRepo {
        async fn create_availability(
            &self,
            slot: NewAvailabilitySlot,
        ) -> eyre::Result<AvailabilitySlot>;

        async fn create_availability_batch(
            &self,
            slots: Vec<NewAvailabilitySlot>,
        ) -> eyre::Result<Vec<AvailabilitySlot>>;

        async fn get_user_availability(
            &self,
            user_id: i32,
        ) -> eyre::Result<Vec<AvailabilitySlot>>;
    }
}
