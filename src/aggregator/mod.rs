pub mod fetch;
pub mod latest;
pub mod reward;
pub mod social;
pub mod wallet;

pub use fetch::{best_effort, timed_query, FetchError, FetchSettings, Fetched};
pub use latest::{Latest, ViewSlot};
pub use social::{fetch_user_stats, gather_counts};
pub use wallet::{aggregate_totals, fetch_wallet_rewards};
