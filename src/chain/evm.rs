use std::str::FromStr;

use alloy::primitives::{hex, utils, Address, U256};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ChainError;

/// `balanceOf(address)` selector.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// BNB and the BEP-20 tokens shown on the board all use 18 decimals.
pub const BSC_DECIMALS: u8 = 18;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Minimal JSON-RPC client for balance reads on an EVM chain.
#[derive(Debug, Clone)]
pub struct EvmClient {
    http: Client,
    rpc_url: String,
}

impl EvmClient {
    pub fn new(http: Client, rpc_url: impl Into<String>) -> Self {
        Self {
            http,
            rpc_url: rpc_url.into(),
        }
    }

    /// Native coin balance in wei.
    pub async fn native_balance(&self, owner: &str) -> Result<U256, ChainError> {
        let owner = parse_address(owner)?;
        let result = self
            .call("eth_getBalance", json!([owner.to_string(), "latest"]))
            .await?;
        parse_quantity(&result)
    }

    /// ERC-20 `balanceOf(owner)` in the token's smallest unit.
    pub async fn erc20_balance(&self, contract: &str, owner: &str) -> Result<U256, ChainError> {
        let contract = parse_address(contract)?;
        let owner = parse_address(owner)?;
        let result = self
            .call(
                "eth_call",
                json!([
                    { "to": contract.to_string(), "data": balance_of_calldata(&owner) },
                    "latest"
                ]),
            )
            .await?;
        parse_quantity(&result)
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<String, ChainError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let resp: RpcResponse = self
            .http
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        resp.result
            .ok_or_else(|| ChainError::Unexpected(format!("{method} returned no result")))
    }
}

pub fn parse_address(raw: &str) -> Result<Address, ChainError> {
    Address::from_str(raw.trim()).map_err(|_| ChainError::InvalidAddress(raw.to_string()))
}

/// ABI-encode `balanceOf(owner)`: selector plus the address left-padded to 32 bytes.
pub fn balance_of_calldata(owner: &Address) -> String {
    format!("0x{BALANCE_OF_SELECTOR}{:0>64}", hex::encode(owner.as_slice()))
}

/// Decode a hex quantity or a 32-byte word returned by `eth_call`.
pub fn parse_quantity(raw: &str) -> Result<U256, ChainError> {
    let digits = raw.trim_start_matches("0x");
    if digits.is_empty() {
        return Err(ChainError::Unexpected("empty return data".into()));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Unexpected(format!("bad quantity {raw}: {e}")))
}

/// Scale an integer amount down by `decimals`, trimming trailing zeros.
/// Full 256-bit range.
pub fn format_units(value: U256, decimals: u8) -> Result<String, ChainError> {
    let formatted = utils::format_units(value, decimals)
        .map_err(|e| ChainError::Unexpected(format!("cannot format {value}: {e}")))?;
    Ok(trim_fraction(&formatted))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, frac)) => match frac.trim_end_matches('0') {
            "" => whole.to_string(),
            frac => format!("{whole}.{frac}"),
        },
        None => formatted.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_of_calldata_layout() {
        let owner = parse_address("0x7130d2A12B9BCbFAe4f2634d864A1Ee1Ce3Ead9c").unwrap();
        let data = balance_of_calldata(&owner);
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x70a08231000000000000000000000000"));
        assert!(data.ends_with("7130d2a12b9bcbfae4f2634d864a1ee1ce3ead9c"));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(parse_quantity("0x1bc16d674ec80000").unwrap(), U256::from(2_000_000_000_000_000_000u128));
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_format_units_eighteen_decimals() {
        let one_and_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_units(one_and_half, BSC_DECIMALS).unwrap(), "1.5");
        assert_eq!(format_units(U256::ZERO, BSC_DECIMALS).unwrap(), "0");
        assert_eq!(format_units(U256::from(7u8), BSC_DECIMALS).unwrap(), "0.000000000000000007");
    }

    #[test]
    fn test_format_units_large_supply() {
        // 100 billion tokens does not fit a 96-bit decimal mantissa.
        let hundred_billion = U256::from(100_000_000_000u64) * U256::from(10u64).pow(U256::from(18u8));
        assert_eq!(format_units(hundred_billion, BSC_DECIMALS).unwrap(), "100000000000");

        assert_eq!(
            format_units(U256::MAX, BSC_DECIMALS).unwrap(),
            "115792089237316195423570985008687907853269984665640564039457.584007913129639935"
        );
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!(parse_address("not-an-address"), Err(ChainError::InvalidAddress(_))));
    }
}
