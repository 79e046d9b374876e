use std::str::FromStr;

use rust_decimal::Decimal;

use super::fetch::{best_effort, timed_query, FetchError, FetchSettings, Fetched};
use crate::models::{TokenSymbol, TokenTotals, TokenTotalsView, TransactionAmount};
use crate::store::TransactionStore;

/// Parse a stored amount. Plain and scientific notation are accepted.
pub fn parse_amount(raw: &str) -> Result<Decimal, FetchError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| FetchError::MalformedAmount {
            amount: raw.to_string(),
        })
}

/// Sum amounts into the four buckets. Rows with an unknown symbol are
/// skipped. A malformed amount on a known symbol, or a bucket overflow,
/// fails the whole reduction.
pub fn aggregate_totals(rows: &[TransactionAmount]) -> Result<TokenTotals, FetchError> {
    let mut totals = TokenTotals::default();

    for row in rows {
        let Some(symbol) = TokenSymbol::normalize(&row.token_symbol) else {
            tracing::debug!(symbol = %row.token_symbol, "Skipping unrecognized token symbol");
            continue;
        };
        totals
            .checked_add(symbol, parse_amount(&row.amount)?)
            .ok_or(FetchError::Overflow { symbol })?;
    }

    Ok(totals)
}

/// Reward transaction totals for `address` as seen by `principal`.
///
/// Without an address or principal nothing is queried and the result is
/// `Empty`.
pub async fn fetch_wallet_rewards(
    store: &dyn TransactionStore,
    address: Option<&str>,
    principal: Option<&str>,
    settings: &FetchSettings,
) -> Fetched<TokenTotalsView> {
    let (Some(address), Some(principal)) = (address.filter(|a| !a.is_empty()), principal) else {
        return Fetched::empty();
    };

    best_effort("wallet_rewards", async {
        let rows = timed_query(
            "transactions",
            settings.query_timeout,
            store.successful_incoming(address, principal),
        )
        .await?;

        tracing::debug!(address, rows = rows.len(), "Reward transactions fetched");
        Ok::<_, FetchError>(aggregate_totals(&rows)?.to_view())
    })
    .await
}
