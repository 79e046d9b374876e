//! Read-only query surface the aggregators depend on.
//!
//! Postgres implements all of these through [`crate::db::PgStore`]; tests
//! swap in in-memory stores.

use async_trait::async_trait;

use crate::models::TransactionAmount;

/// Owner-scoped counts over the social tables.
#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Ids of every post owned by `user_id`.
    async fn list_post_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>>;

    async fn count_comments(&self, user_id: &str) -> anyhow::Result<u64>;

    /// Reactions made by `user_id`, on anyone's posts.
    async fn count_reactions_by_user(&self, user_id: &str) -> anyhow::Result<u64>;

    async fn count_shares(&self, user_id: &str) -> anyhow::Result<u64>;

    /// Accepted friendship rows where `user_id` is either endpoint.
    async fn count_accepted_friendships(&self, user_id: &str) -> anyhow::Result<u64>;

    /// Reactions received by a single post.
    async fn count_reactions_on_post(&self, post_id: &str) -> anyhow::Result<u64>;

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Successful transactions sent to `address` and owned by `principal`.
    async fn successful_incoming(
        &self,
        address: &str,
        principal: &str,
    ) -> anyhow::Result<Vec<TransactionAmount>>;
}

/// Maps a bearer session token to the authenticated user id.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> anyhow::Result<Option<String>>;
}
