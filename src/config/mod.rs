use std::env;
use std::time::Duration;

const DEFAULT_BSC_RPC_URL: &str = "https://bsc-dataseed.binance.org";
const DEFAULT_BLOCKCYPHER_API_URL: &str = "https://api.blockcypher.com/v1/btc/main";

/// BEP-20 USDT on BSC.
const DEFAULT_USDT_CONTRACT: &str = "0x55d398326f99059fF775485246999027B3197955";
/// BTCB on BSC.
const DEFAULT_BTCB_CONTRACT: &str = "0x7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // On-chain balance sources
    pub bsc_rpc_url: String,
    pub blockcypher_api_url: String,
    pub usdt_contract: String,
    /// No default: the CAMLY contract must be configured explicitly.
    pub camly_contract: Option<String>,
    pub btcb_contract: String,

    // Aggregation
    pub query_timeout_ms: u64,
    pub post_reaction_concurrency: usize,
    pub refresh_debounce_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            bsc_rpc_url: env::var("BSC_RPC_URL").unwrap_or_else(|_| DEFAULT_BSC_RPC_URL.into()),
            blockcypher_api_url: env::var("BLOCKCYPHER_API_URL")
                .unwrap_or_else(|_| DEFAULT_BLOCKCYPHER_API_URL.into()),
            usdt_contract: env::var("USDT_CONTRACT")
                .unwrap_or_else(|_| DEFAULT_USDT_CONTRACT.into()),
            camly_contract: env::var("CAMLY_CONTRACT").ok().filter(|s| !s.is_empty()),
            btcb_contract: env::var("BTCB_CONTRACT")
                .unwrap_or_else(|_| DEFAULT_BTCB_CONTRACT.into()),

            query_timeout_ms: env::var("QUERY_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .unwrap_or(5_000),
            post_reaction_concurrency: env::var("POST_REACTION_CONCURRENCY")
                .unwrap_or_else(|_| "8".into())
                .parse()
                .unwrap_or(8),
            refresh_debounce_ms: env::var("REFRESH_DEBOUNCE_MS")
                .unwrap_or_else(|_| "250".into())
                .parse()
                .unwrap_or(250),
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}
