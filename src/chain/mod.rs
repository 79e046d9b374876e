pub mod bitcoin;
pub mod evm;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{format_fixed, MultiChainBalance};

pub use bitcoin::BlockCypherClient;
pub use evm::EvmClient;

const ZERO_BALANCE: &str = "0";

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Live balances for a wallet across the supported chains.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn balances(&self, evm_address: &str, btc_address: &str) -> MultiChainBalance;
}

/// BEP-20 contracts read on BSC. CAMLY is skipped when unset.
#[derive(Debug, Clone)]
pub struct TokenContracts {
    pub usdt: String,
    pub camly: Option<String>,
    pub btcb: String,
}

/// BSC over JSON-RPC plus the Bitcoin network over BlockCypher.
#[derive(Debug, Clone)]
pub struct ChainBalances {
    bsc: EvmClient,
    bitcoin: BlockCypherClient,
    contracts: TokenContracts,
    timeout: Duration,
}

impl ChainBalances {
    pub fn new(
        bsc: EvmClient,
        bitcoin: BlockCypherClient,
        contracts: TokenContracts,
        timeout: Duration,
    ) -> Self {
        Self {
            bsc,
            bitcoin,
            contracts,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig, http: reqwest::Client) -> Self {
        Self::new(
            EvmClient::new(http.clone(), config.bsc_rpc_url.clone()),
            BlockCypherClient::new(http, config.blockcypher_api_url.clone()),
            TokenContracts {
                usdt: config.usdt_contract.clone(),
                camly: config.camly_contract.clone(),
                btcb: config.btcb_contract.clone(),
            },
            config.query_timeout(),
        )
    }

    async fn bep20(&self, contract: Option<&str>, owner: &str) -> Result<String, ChainError> {
        let Some(contract) = contract else {
            return Ok(ZERO_BALANCE.into());
        };
        let raw = self.bsc.erc20_balance(contract, owner).await?;
        evm::format_units(raw, evm::BSC_DECIMALS)
    }

    async fn bnb(&self, owner: &str) -> Result<String, ChainError> {
        let raw = self.bsc.native_balance(owner).await?;
        evm::format_units(raw, evm::BSC_DECIMALS)
    }
}

#[async_trait]
impl BalanceSource for ChainBalances {
    async fn balances(&self, evm_address: &str, btc_address: &str) -> MultiChainBalance {
        let (bnb, usdt, camly, btcb, btc_network) = tokio::join!(
            settle("bnb", self.timeout, self.bnb(evm_address)),
            settle("usdt", self.timeout, self.bep20(Some(&self.contracts.usdt), evm_address)),
            settle("camly", self.timeout, self.bep20(self.contracts.camly.as_deref(), evm_address)),
            settle("btcb", self.timeout, self.bep20(Some(&self.contracts.btcb), evm_address)),
            settle("btc_network", self.timeout, self.bitcoin.balance_btc(btc_address)),
        );

        let zero = || ZERO_BALANCE.to_string();
        MultiChainBalance {
            bnb: bnb.unwrap_or_else(zero),
            usdt: usdt.unwrap_or_else(zero),
            camly: camly.unwrap_or_else(zero),
            btc: btcb.unwrap_or_else(zero),
            btc_network: format_fixed(btc_network.unwrap_or(Decimal::ZERO), bitcoin::BTC_DECIMALS),
        }
    }
}

/// Resolve one balance, `None` on error or timeout. Failures stay independent.
async fn settle<T, F>(asset: &'static str, timeout: Duration, fut: F) -> Option<T>
where
    F: Future<Output = Result<T, ChainError>>,
{
    let result = match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ChainError::Timeout(timeout)),
    };

    match result {
        Ok(balance) => Some(balance),
        Err(e) => {
            metrics::counter!("balance_lookup_failures_total", "asset" => asset).increment(1);
            tracing::warn!(asset, error = %e, "Balance lookup failed");
            None
        }
    }
}
