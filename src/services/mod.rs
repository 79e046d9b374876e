pub mod rewards_watcher;
pub mod transaction_listener;

pub use rewards_watcher::{watch_rewards, RewardsSlot, RewardsSubscription};
pub use transaction_listener::{run_transaction_listener, TRANSACTIONS_CHANNEL};
