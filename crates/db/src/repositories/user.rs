use crate::models::DbUser;
use async_trait::async_trait;
use eyre::Result;
use slotsync_core::{models::user::User, services::UserDirectory};
use sqlx::{Pool, Postgres};

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i32) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if user.is_none() {
        tracing::debug!("User not found: id={}", id);
    }

    Ok(user)
}

/// [`UserDirectory`] over the `users` table.
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: Pool<Postgres>,
}

impl PgUserDirectory {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        Ok(get_user_by_id(&self.pool, id).await?.map(User::from))
    }
}
