use crate::models::{SocialCounts, UserStats};

/// Flat bonus every user starts with.
pub const BASE_BONUS: u64 = 50_000;
pub const POST_POINTS: u64 = 10_000;
pub const COMMENT_POINTS: u64 = 5_000;
pub const FRIEND_POINTS: u64 = 50_000;
pub const SHARE_POINTS: u64 = 20_000;

/// Reactions a post needs before it earns anything.
pub const POPULAR_POST_THRESHOLD: u64 = 3;
pub const POPULAR_POST_BONUS: u64 = 30_000;
/// Per reaction beyond the threshold.
pub const EXTRA_REACTION_POINTS: u64 = 1_000;

/// Bonus for one post given the reactions it received. No partial credit
/// below the threshold, no cap above it.
pub fn post_reaction_bonus(reactions: u64) -> u64 {
    if reactions < POPULAR_POST_THRESHOLD {
        return 0;
    }
    POPULAR_POST_BONUS.saturating_add(
        (reactions - POPULAR_POST_THRESHOLD).saturating_mul(EXTRA_REACTION_POINTS),
    )
}

/// Total reward under the fixed point schedule.
pub fn compute_reward(counts: &SocialCounts) -> u64 {
    let flat = [
        (counts.posts_count, POST_POINTS),
        (counts.comments_count, COMMENT_POINTS),
        (counts.friends_count, FRIEND_POINTS),
        (counts.shares_count, SHARE_POINTS),
    ]
    .iter()
    .fold(BASE_BONUS, |acc, (count, points)| {
        acc.saturating_add(count.saturating_mul(*points))
    });

    counts
        .reactions_per_post
        .iter()
        .fold(flat, |acc, &r| acc.saturating_add(post_reaction_bonus(r)))
}

pub fn user_stats(counts: &SocialCounts) -> UserStats {
    UserStats {
        posts_count: counts.posts_count,
        comments_count: counts.comments_count,
        reactions_count: counts.reactions_count,
        friends_count: counts.friends_count,
        shares_count: counts.shares_count,
        total_reward: compute_reward(counts),
    }
}
