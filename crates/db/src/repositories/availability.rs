use crate::models::DbAvailabilitySlot;
use async_trait::async_trait;
use eyre::Result;
use slotsync_core::{
    models::availability::{AvailabilitySlot, NewAvailabilitySlot},
    services::AvailabilityStore,
};
use sqlx::{PgConnection, Pool, Postgres};

async fn insert_availability(
    conn: &mut PgConnection,
    slot: &NewAvailabilitySlot,
) -> Result<DbAvailabilitySlot> {
    let row = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        INSERT INTO user_availability (user_id, date, start_time, end_time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, date, start_time, end_time, created_at
        "#,
    )
    .bind(slot.user_id)
    .bind(slot.date)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .fetch_one(conn)
    .await?;

    Ok(row)
}

pub async fn create_availability(
    pool: &Pool<Postgres>,
    slot: &NewAvailabilitySlot,
) -> Result<DbAvailabilitySlot> {
    let mut conn = pool.acquire().await?;
    let row = insert_availability(&mut conn, slot).await?;

    tracing::debug!("Availability created: id={}, user_id={}", row.id, row.user_id);
    Ok(row)
}

/// Inserts every slot in one transaction. Nothing is written if any insert fails.
pub async fn create_availability_batch(
    pool: &Pool<Postgres>,
    slots: &[NewAvailabilitySlot],
) -> Result<Vec<DbAvailabilitySlot>> {
    let mut tx = pool.begin().await?;

    let mut rows = Vec::with_capacity(slots.len());
    for slot in slots {
        rows.push(insert_availability(&mut tx, slot).await?);
    }

    tx.commit().await?;

    tracing::debug!("Availability batch committed: {} rows", rows.len());
    Ok(rows)
}

pub async fn get_availability_by_user_id(
    pool: &Pool<Postgres>,
    user_id: i32,
) -> Result<Vec<DbAvailabilitySlot>> {
    let rows = sqlx::query_as::<_, DbAvailabilitySlot>(
        r#"
        SELECT id, user_id, date, start_time, end_time, created_at
        FROM user_availability
        WHERE user_id = $1
        ORDER BY date ASC, start_time ASC, end_time ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// [`AvailabilityStore`] over the `user_availability` table.
#[derive(Clone)]
pub struct PgAvailabilityStore {
    pool: Pool<Postgres>,
}

impl PgAvailabilityStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityStore for PgAvailabilityStore {
    async fn create_availability(&self, slot: NewAvailabilitySlot) -> Result<AvailabilitySlot> {
        Ok(create_availability(&self.pool, &slot).await?.into())
    }

    async fn create_availability_batch(
        &self,
        slots: Vec<NewAvailabilitySlot>,
    ) -> Result<Vec<AvailabilitySlot>> {
        let rows = create_availability_batch(&self.pool, &slots).await?;
        Ok(rows.into_iter().map(AvailabilitySlot::from).collect())
    }

    async fn get_user_availability(&self, user_id: i32) -> Result<Vec<AvailabilitySlot>> {
        let rows = get_availability_by_user_id(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(AvailabilitySlot::from).collect())
    }
}
