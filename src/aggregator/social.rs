use futures_util::stream::{self, StreamExt, TryStreamExt};

use super::fetch::{best_effort, timed_query, FetchError, FetchSettings, Fetched};
use super::reward;
use crate::models::{SocialCounts, UserStats};
use crate::store::SocialStore;

/// Gather every count the reward schedule needs.
///
/// The five owner-scoped queries are independent and run together; the
/// per-post reaction counts need the post list first. Any failure aborts the
/// whole gather.
pub async fn gather_counts(
    store: &dyn SocialStore,
    user_id: &str,
    settings: &FetchSettings,
) -> Result<SocialCounts, FetchError> {
    let timeout = settings.query_timeout;

    let (post_ids, comments_count, reactions_count, friends_count, shares_count) = tokio::try_join!(
        timed_query("posts", timeout, store.list_post_ids(user_id)),
        timed_query("comments", timeout, store.count_comments(user_id)),
        timed_query("reactions", timeout, store.count_reactions_by_user(user_id)),
        timed_query("friendships", timeout, store.count_accepted_friendships(user_id)),
        timed_query("shared_posts", timeout, store.count_shares(user_id)),
    )?;

    // One round trip per post; see DESIGN.md on batching.
    // Collected first: a borrowing map closure makes the stream non-Send.
    let per_post: Vec<_> = post_ids
        .iter()
        .map(|post_id| timed_query("post_reactions", timeout, store.count_reactions_on_post(post_id)))
        .collect();
    let reactions_per_post: Vec<u64> = stream::iter(per_post)
        .buffered(settings.post_reaction_concurrency.max(1))
        .try_collect()
        .await?;

    tracing::debug!(
        user_id,
        posts = post_ids.len(),
        comments = comments_count,
        friends = friends_count,
        "Social counts gathered"
    );

    Ok(SocialCounts {
        posts_count: post_ids.len() as u64,
        comments_count,
        reactions_count,
        friends_count,
        shares_count,
        reactions_per_post,
    })
}

/// Honor-board stats for `user_id`, zeroed on any failure.
pub async fn fetch_user_stats(
    store: &dyn SocialStore,
    user_id: &str,
    settings: &FetchSettings,
) -> Fetched<UserStats> {
    best_effort("user_stats", async {
        let counts = gather_counts(store, user_id, settings).await?;
        Ok::<_, FetchError>(reward::user_stats(&counts))
    })
    .await
}
