pub mod balance;
pub mod stats;
pub mod token;
pub mod transaction;

pub use balance::{format_fixed, MultiChainBalance, TokenTotals, TokenTotalsView};
pub use stats::{SocialCounts, UserStats};
pub use token::{TokenSymbol, SYMBOL_ALIASES};
pub use transaction::{RewardTransaction, TransactionAmount, TransactionInserted};
