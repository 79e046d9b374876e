use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::token::TokenSymbol;

// ---------------------------------------------------------------------------
// TokenTotals — accumulation buckets
// ---------------------------------------------------------------------------

/// Per-token running sums. All four buckets always exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenTotals {
    pub camly: Decimal,
    pub bnb: Decimal,
    pub usdt: Decimal,
    pub btc: Decimal,
}

impl TokenTotals {
    /// Add to a bucket. Returns `None`, leaving the bucket unchanged, when
    /// the sum leaves the `Decimal` range.
    pub fn checked_add(&mut self, symbol: TokenSymbol, amount: Decimal) -> Option<Decimal> {
        let bucket = self.bucket_mut(symbol);
        *bucket = bucket.checked_add(amount)?;
        Some(*bucket)
    }

    pub fn get(&self, symbol: TokenSymbol) -> Decimal {
        match symbol {
            TokenSymbol::Camly => self.camly,
            TokenSymbol::Bnb => self.bnb,
            TokenSymbol::Usdt => self.usdt,
            TokenSymbol::Btc => self.btc,
        }
    }

    fn bucket_mut(&mut self, symbol: TokenSymbol) -> &mut Decimal {
        match symbol {
            TokenSymbol::Camly => &mut self.camly,
            TokenSymbol::Bnb => &mut self.bnb,
            TokenSymbol::Usdt => &mut self.usdt,
            TokenSymbol::Btc => &mut self.btc,
        }
    }

    /// Render each bucket at its display precision.
    pub fn to_view(&self) -> TokenTotalsView {
        let render = |symbol: TokenSymbol| format_fixed(self.get(symbol), symbol.display_dp());
        TokenTotalsView {
            camly: render(TokenSymbol::Camly),
            bnb: render(TokenSymbol::Bnb),
            usdt: render(TokenSymbol::Usdt),
            btc: render(TokenSymbol::Btc),
        }
    }
}

/// Display form of [`TokenTotals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTotalsView {
    pub camly: String,
    pub bnb: String,
    pub usdt: String,
    pub btc: String,
}

impl Default for TokenTotalsView {
    fn default() -> Self {
        TokenTotals::default().to_view()
    }
}

impl From<TokenTotals> for TokenTotalsView {
    fn from(totals: TokenTotals) -> Self {
        totals.to_view()
    }
}

// ---------------------------------------------------------------------------
// MultiChainBalance — live on-chain holdings
// ---------------------------------------------------------------------------

/// Live balances for one address. Each field is a display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiChainBalance {
    pub bnb: String,
    pub usdt: String,
    pub camly: String,
    /// BTCB held on BSC.
    pub btc: String,
    /// Native Bitcoin network balance.
    pub btc_network: String,
}

impl Default for MultiChainBalance {
    fn default() -> Self {
        Self {
            bnb: "0".into(),
            usdt: "0".into(),
            camly: "0".into(),
            btc: "0".into(),
            btc_network: "0".into(),
        }
    }
}

/// Round half away from zero and pad to exactly `dp` places.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_fixed_pads_zeros() {
        assert_eq!(format_fixed(Decimal::from(4), 4), "4.0000");
        assert_eq!(format_fixed(Decimal::ZERO, 2), "0.00");
        assert_eq!(format_fixed(Decimal::ZERO, 8), "0.00000000");
    }

    #[test]
    fn test_format_fixed_rounds_half_up() {
        let v = Decimal::from_str("1.005").unwrap();
        assert_eq!(format_fixed(v, 2), "1.01");
        let v = Decimal::from_str("0.123456789").unwrap();
        assert_eq!(format_fixed(v, 8), "0.12345679");
    }

    #[test]
    fn test_default_view_is_zeroed_at_display_precision() {
        let view = TokenTotalsView::default();
        assert_eq!(view.camly, "0.00");
        assert_eq!(view.bnb, "0.0000");
        assert_eq!(view.usdt, "0.00");
        assert_eq!(view.btc, "0.00000000");
    }

    #[test]
    fn test_add_routes_to_bucket() {
        let mut totals = TokenTotals::default();
        totals.checked_add(TokenSymbol::Btc, Decimal::new(5, 1));
        totals.checked_add(TokenSymbol::Btc, Decimal::new(25, 2));
        assert_eq!(totals.btc, Decimal::new(75, 2));
        assert_eq!(totals.camly, Decimal::ZERO);
    }

    #[test]
    fn test_checked_add_overflow_leaves_bucket() {
        let mut totals = TokenTotals::default();
        assert_eq!(totals.checked_add(TokenSymbol::Bnb, Decimal::MAX), Some(Decimal::MAX));
        assert_eq!(totals.checked_add(TokenSymbol::Bnb, Decimal::ONE), None);
        assert_eq!(totals.bnb, Decimal::MAX);
    }
}
