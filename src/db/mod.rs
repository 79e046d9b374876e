pub mod session_repo;
pub mod social_repo;
pub mod transaction_repo;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::TransactionAmount;
use crate::store::{PrincipalResolver, SocialStore, TransactionStore};

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

/// Postgres-backed implementation of every store trait.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SocialStore for PgStore {
    async fn list_post_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        social_repo::list_post_ids(&self.pool, user_id).await
    }

    async fn count_comments(&self, user_id: &str) -> anyhow::Result<u64> {
        social_repo::count_comments(&self.pool, user_id).await.map(to_count)
    }

    async fn count_reactions_by_user(&self, user_id: &str) -> anyhow::Result<u64> {
        social_repo::count_reactions_by_user(&self.pool, user_id)
            .await
            .map(to_count)
    }

    async fn count_shares(&self, user_id: &str) -> anyhow::Result<u64> {
        social_repo::count_shares(&self.pool, user_id).await.map(to_count)
    }

    async fn count_accepted_friendships(&self, user_id: &str) -> anyhow::Result<u64> {
        social_repo::count_accepted_friendships(&self.pool, user_id)
            .await
            .map(to_count)
    }

    async fn count_reactions_on_post(&self, post_id: &str) -> anyhow::Result<u64> {
        social_repo::count_reactions_on_post(&self.pool, post_id)
            .await
            .map(to_count)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for PgStore {
    async fn successful_incoming(
        &self,
        address: &str,
        principal: &str,
    ) -> anyhow::Result<Vec<TransactionAmount>> {
        transaction_repo::get_successful_incoming(&self.pool, address, principal).await
    }
}

#[async_trait]
impl PrincipalResolver for PgStore {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<String>> {
        session_repo::resolve_user_id(&self.pool, token).await
    }
}
