use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::ApiResponse;
use crate::aggregator::{fetch_wallet_rewards, FetchError, Fetched};
use crate::api::auth::Principal;
use crate::errors::AppError;
use crate::models::{MultiChainBalance, TokenTotalsView};
use crate::AppState;

/// Reward totals for `address` as seen by the request's principal.
pub(crate) async fn rewards_for(
    state: &AppState,
    address: Option<&str>,
    principal: &Principal,
) -> Fetched<TokenTotalsView> {
    if let Principal::Unresolved(reason) = principal {
        return Fetched::failed(FetchError::Principal(reason.clone()));
    }
    fetch_wallet_rewards(
        state.transactions.as_ref(),
        address,
        principal.user_id(),
        &state.settings,
    )
    .await
}

pub async fn rewards(
    State(state): State<AppState>,
    Path(address): Path<String>,
    principal: Principal,
) -> Json<ApiResponse<Fetched<TokenTotalsView>>> {
    let rewards = rewards_for(&state, Some(&address), &principal).await;
    Json(ApiResponse::fetched(rewards))
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Bitcoin-network address; defaults to the path address.
    pub btc_address: Option<String>,
}

pub async fn balances(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<ApiResponse<MultiChainBalance>>, AppError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AppError::BadRequest("address must not be blank".into()));
    }

    let btc_address = query.btc_address.as_deref().unwrap_or(address);
    let balances = state.balances.balances(address, btc_address).await;
    Ok(Json(ApiResponse::ok(balances)))
}
