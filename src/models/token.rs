use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TokenSymbol
// ---------------------------------------------------------------------------

/// Reward buckets shown on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    Camly,
    Bnb,
    Usdt,
    Btc,
}

/// Upper-cased symbol spellings and the bucket each one lands in.
/// Adding an alias is a row here, nothing else.
pub const SYMBOL_ALIASES: &[(&str, TokenSymbol)] = &[
    ("CAMLY", TokenSymbol::Camly),
    ("C", TokenSymbol::Camly),
    ("BNB", TokenSymbol::Bnb),
    ("USDT", TokenSymbol::Usdt),
    ("BTC", TokenSymbol::Btc),
    ("BTCB", TokenSymbol::Btc),
];

impl TokenSymbol {
    pub const ALL: [TokenSymbol; 4] = [
        TokenSymbol::Camly,
        TokenSymbol::Bnb,
        TokenSymbol::Usdt,
        TokenSymbol::Btc,
    ];

    /// Case-insensitive lookup through [`SYMBOL_ALIASES`].
    pub fn normalize(raw: &str) -> Option<Self> {
        let upper = raw.to_uppercase();
        SYMBOL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == upper)
            .map(|(_, symbol)| *symbol)
    }

    /// Decimal places used when the total is rendered.
    pub fn display_dp(self) -> u32 {
        match self {
            TokenSymbol::Camly | TokenSymbol::Usdt => 2,
            TokenSymbol::Bnb => 4,
            TokenSymbol::Btc => 8,
        }
    }
}

impl fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSymbol::Camly => write!(f, "CAMLY"),
            TokenSymbol::Bnb => write!(f, "BNB"),
            TokenSymbol::Usdt => write!(f, "USDT"),
            TokenSymbol::Btc => write!(f, "BTC"),
        }
    }
}
