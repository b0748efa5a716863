//! Game repository

use crate::domain::entities::Game;
use crate::repository::GameStore;
use gamebot_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct PgGameStore {
    pool: PgPool,
}

impl PgGameStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GameStore for PgGameStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn find(&self, id: Uuid) -> Result<Option<Game>> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, name, client_id, client_secret, aliases, created_at, updated_at
            FROM games WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Game>> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, name, client_id, client_secret, aliases, created_at, updated_at
            FROM games WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
