use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/availability/user/:id",
            get(handlers::availability::get_availability_by_user),
        )
        .route(
            "/availability/userSubmitAvailability/:user_id",
            post(handlers::availability::submit_availability),
        )
        .route(
            "/availability/userAvailability/getOverlappingAvailability/user1/:user_id1/userId2/:user_id2",
            get(handlers::availability::get_overlapping_availability),
        )
}
