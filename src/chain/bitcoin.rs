use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::ChainError;

/// Satoshis per bitcoin, as a decimal scale.
pub const BTC_DECIMALS: u32 = 8;

#[derive(Debug, Deserialize)]
struct AddressBalance {
    balance: Option<i64>,
}

/// BlockCypher address-balance lookups.
#[derive(Debug, Clone)]
pub struct BlockCypherClient {
    http: Client,
    base_url: String,
}

impl BlockCypherClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Confirmed balance in satoshis.
    pub async fn balance_sats(&self, address: &str) -> Result<i64, ChainError> {
        let url = format!("{}/addrs/{}/balance", self.base_url, address);
        let body: AddressBalance = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.balance
            .ok_or_else(|| ChainError::Unexpected("balance missing from response".into()))
    }

    pub async fn balance_btc(&self, address: &str) -> Result<Decimal, ChainError> {
        Ok(sats_to_btc(self.balance_sats(address).await?))
    }
}

pub fn sats_to_btc(sats: i64) -> Decimal {
    Decimal::new(sats, BTC_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sats_to_btc() {
        assert_eq!(sats_to_btc(100_000_000), Decimal::ONE);
        assert_eq!(sats_to_btc(1).to_string(), "0.00000001");
        assert_eq!(sats_to_btc(0), Decimal::ZERO);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BlockCypherClient::new(Client::new(), "https://api.blockcypher.com/v1/btc/main/");
        assert_eq!(client.base_url, "https://api.blockcypher.com/v1/btc/main");
    }
}
