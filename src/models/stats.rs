use serde::{Deserialize, Serialize};

/// Honor-board counters for one user plus the reward derived from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub posts_count: u64,
    pub comments_count: u64,
    pub reactions_count: u64,
    pub friends_count: u64,
    pub shares_count: u64,
    pub total_reward: u64,
}

/// Raw counts gathered from the store before the reward is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialCounts {
    pub posts_count: u64,
    pub comments_count: u64,
    pub reactions_count: u64,
    pub friends_count: u64,
    pub shares_count: u64,
    /// Reactions received, one entry per post owned by the user.
    pub reactions_per_post: Vec<u64>,
}
